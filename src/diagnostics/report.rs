use super::summary::SessionSummary;
use super::timing::TimingBreakdown;
use crate::types::Seed;
use serde::{Deserialize, Serialize};

/// Result of [`SeedFinder::run_event`](crate::SeedFinder::run_event).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedingReport {
    pub event_number: u64,
    pub seeds: Vec<Seed>,
    pub summary: SessionSummary,
    pub timings: TimingBreakdown,
}

impl SeedingReport {
    /// One-line description for logs and demo output.
    pub fn describe(&self) -> String {
        let s = &self.summary;
        let best = self
            .seeds
            .iter()
            .map(|seed| seed.quality)
            .fold(None, |acc: Option<f32>, q| Some(acc.map_or(q, |a| a.min(q))));
        format!(
            "event={} pass={:?} stored={} binned={} seeds={} calls={} best={} total_ms={:.3}",
            self.event_number,
            s.pass,
            s.stored,
            s.binned,
            self.seeds.len(),
            s.production_calls,
            best.map(|q| format!("{q:.3}")).unwrap_or_else(|| "-".to_string()),
            self.timings.total_ms,
        )
    }
}
