#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod finder;
pub mod types;

// Building blocks of the search. Public so tools can inspect binning and
// cut helpers, but considered internals.
pub mod angle;
pub mod batch;
pub mod binning;
pub mod conditions;
pub mod io;
pub mod neighbours;
pub mod ranking;
pub mod search;
pub mod space_point;

// --- High-level re-exports -------------------------------------------------

// Main entry points: finder, per-thread session, and results.
pub use crate::finder::{SeedFinder, SeedFinderParams, SeedingPass, SeedingSession};
pub use crate::types::{RawSpacePoint, Seed, SeedType, SpacePointId};

// Event-level inputs.
pub use crate::conditions::{BeamConditions, MagneticField};

// Reports and errors.
pub use crate::diagnostics::{SeedingReport, SessionSummary};
pub use crate::error::SeedingError;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use si_seed_finder::prelude::*;
/// use nalgebra::Vector3;
///
/// # fn main() {
/// let finder = SeedFinder::new(SeedFinderParams::default());
/// let mut session = finder.new_session();
///
/// finder.new_event(
///     &mut session,
///     &BeamConditions::default(),
///     MagneticField::default(),
///     SeedingPass::Pixel,
/// );
/// for (i, r) in [40.0, 80.0, 120.0].into_iter().enumerate() {
///     let sp = RawSpacePoint::pixel(Vector3::new(r, 0.0, 0.0), [0.01, 0.01], i as u64, i as u64);
///     finder.add_space_point(&mut session, &sp);
/// }
/// finder.find_3sp(&mut session, &[]);
/// for seed in finder.seeds(&mut session) {
///     println!("{:?} quality={:.3}", seed.points(), seed.quality);
/// }
/// # }
/// ```
pub mod prelude {
    pub use crate::conditions::{BeamConditions, MagneticField};
    pub use crate::types::{RawSpacePoint, Seed};
    pub use crate::{SeedFinder, SeedFinderParams, SeedingPass, SeedingSession};
}
