//! Diagnostics data model exposed by the seed finder and the demo binary.
//!
//! `SeedingReport` is the main entry point returned by
//! [`SeedFinder::run_event`](crate::SeedFinder::run_event): the seeds of one
//! event together with the session counters (`SessionSummary`) and a stage
//! timing trace. `SeedAuditLog` collects per-seed records for offline
//! validation.

pub mod audit;
pub mod report;
pub mod summary;
pub mod timing;

pub use audit::{AuditPoint, SeedAuditLog, SeedAuditRecord, TrackSummary};
pub use report::SeedingReport;
pub use summary::SessionSummary;
pub use timing::{SeedingStage, StageTiming, TimingBreakdown};
