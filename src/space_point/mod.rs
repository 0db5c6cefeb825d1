//! Per-event space-point arena.
//!
//! Modules
//! - [`point`] – the beam-frame record the search reads (`SeedPoint`).
//! - [`store`] – append-only arena reused across events (`SpacePointStore`).

pub mod point;
pub mod store;

pub use point::{SeedPoint, INITIAL_POINT_QUALITY};
pub use store::{EtaPrefilter, SpacePointStore};
