use crate::finder::SeedingPass;
use serde::{Deserialize, Serialize};

/// Counters describing one event of a seeding session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub pass: SeedingPass,
    /// Raw points handed to `add_space_point`.
    pub offered: usize,
    /// Points accepted into the store.
    pub stored: usize,
    /// Points placed into the (φ, z) grid by the last fill.
    pub binned: usize,
    pub occupied_cells: usize,
    pub azimuthal_bins: usize,
    /// Central radius window of the last fill (mm).
    pub central_window: Option<(f32, f32)>,
    pub production_calls: usize,
    pub pauses: usize,
    /// Seeds kept by production.
    pub seeds_produced: usize,
    /// Mixed seeds dropped at the end of their φ bin because every one of
    /// their points already had a better seed.
    pub seeds_vetoed: usize,
    /// Seeds handed out by `next`.
    pub seeds_returned: usize,
}
