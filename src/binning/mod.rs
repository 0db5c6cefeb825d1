//! Spatial binning of the event.
//!
//! Overview
//! - Points are first sorted into fixed-width radial bins as they arrive.
//! - Before the search, radial bins are walked from the innermost outwards and
//!   every point is placed into an (azimuth × z-region) cell, so each cell
//!   lists its points in radius order.
//! - The azimuthal bin width is chosen per subsystem so that a track at the
//!   minimum momentum crosses at most one bin boundary between neighbouring
//!   layers.
//!
//! Modules
//! - [`radial`] – fixed-width radial bins (`RadialBins`).
//! - [`zregion`] – the eleven longitudinal regions and their traversal orders.
//! - [`phi`] – azimuthal bin-count policy (`PhiBinning`).
//! - [`grid`] – the (φ, z) cell array filled from the radial bins (`PhiZGrid`).

pub mod grid;
pub mod phi;
pub mod radial;
pub mod zregion;

pub use grid::{FillOutcome, PhiZGrid};
pub use phi::{azimuthal_step, PhiBinning, MAX_PHI_BINS};
pub use radial::RadialBins;
pub use zregion::{z_region, CENTRAL_Z_REGION, Z_REGIONS};
