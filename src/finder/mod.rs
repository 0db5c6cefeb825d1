//! Triplet seed finder for silicon trackers.
//!
//! Overview
//! - Space points of one event are moved into the beam frame, filtered by
//!   pass, radius and (optionally) a coarse pseudorapidity cut, and sorted
//!   into fixed-width radial bins.
//! - `find_3sp` re-bins them into a (φ, z) grid, radius ordered inside each
//!   cell, and derives the radius window of central points from the first and
//!   last occupied radial bins.
//! - The search walks φ bins in ascending order and z regions in the pass
//!   order. For every central point it links tops and bottoms from the
//!   neighbouring cells, fits each bottom/top pair in the conformal frame and
//!   ranks the surviving triplets per central point.
//! - Seeds are pulled one at a time. A search that fills its output buffer
//!   pauses after the current φ bin and resumes when the buffer is drained.
//!
//! Modules
//! - [`params`] – configuration types (cuts, binning, per-subsystem windows,
//!   scoring).
//! - [`policy`] – passes and the resolved per-subsystem search policy.
//! - `session` – per-thread working set ([`SeedingSession`]).
//! - `pipeline` – the [`SeedFinder`] implementation.
//! - `event` – self-contained event description used by batch runs.
//!
//! Key Ideas
//! - The finder is immutable after construction; sessions carry all mutable
//!   state, so events run in parallel with one session per thread.
//! - Each point remembers the best seed score it took part in. A seed is
//!   written only when it improves at least one of its points, which thins
//!   out near-duplicate triplets without a global pass.

mod event;
pub mod params;
mod pipeline;
pub mod policy;
mod session;

pub use event::EventInput;
pub use params::{
    BinningParams, CutParams, PixelPolicyParams, ScoringMode, ScoringParams, SeedFinderParams,
    StripPolicyParams, VertexParams,
};
pub use pipeline::{SeedFinder, Seeds};
pub use policy::{MeanSlope, SeedingPass, SubsystemPolicy};
pub use session::{SearchCursor, SearchStatus, SeedingSession};
