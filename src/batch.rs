//! Seeding many independent events.
//!
//! Each event gets its own [`SeedingSession`](crate::SeedingSession); with the
//! `parallel` feature the events are spread over the rayon pool and every
//! worker reuses one session across the events it picks up.

use crate::diagnostics::{SeedAuditLog, SeedAuditRecord, SeedingReport};
use crate::finder::{EventInput, SeedFinder};
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Seeds every event and returns the reports in input order.
pub fn find_seeds_parallel(finder: &SeedFinder, events: &[EventInput]) -> Vec<SeedingReport> {
    debug!("find_seeds_parallel events={}", events.len());
    #[cfg(feature = "parallel")]
    {
        events
            .par_iter()
            .map_init(
                || finder.new_session(),
                |session, event| finder.run_event(session, event),
            )
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut session = finder.new_session();
        events
            .iter()
            .map(|event| finder.run_event(&mut session, event))
            .collect()
    }
}

/// Same as [`find_seeds_parallel`], also recording every returned seed in
/// `audit`. The session's store is read before the worker moves on, so the
/// records see the point coordinates of their own event.
pub fn find_seeds_audited(
    finder: &SeedFinder,
    events: &[EventInput],
    audit: &SeedAuditLog,
) -> Vec<SeedingReport> {
    let run = |session: &mut crate::SeedingSession, event: &EventInput| {
        let report = finder.run_event(session, event);
        for seed in &report.seeds {
            if let Some(record) =
                SeedAuditRecord::from_seed(event.event_number, seed, session.space_points(), None)
            {
                audit.record(record);
            }
        }
        report
    };
    #[cfg(feature = "parallel")]
    {
        events
            .par_iter()
            .map_init(|| finder.new_session(), |session, event| run(session, event))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        let mut session = finder.new_session();
        events.iter().map(|event| run(&mut session, event)).collect()
    }
}
