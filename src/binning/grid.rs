use super::phi::{PhiBinning, MAX_PHI_BINS};
use super::radial::RadialBins;
use super::zregion::{z_region, Z_REGIONS};
use crate::space_point::SpacePointStore;
use crate::types::SpacePointId;

/// Points beyond this |z| (mm) sit on the endcap disks.
const ENDCAP_Z: f32 = 1490.0;

/// Summary of one fill of the (φ, z) grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillOutcome {
    /// First and last non-empty radial bins, inner to outer.
    pub radial_range: Option<(usize, usize)>,
    /// Whether any point lies on the endcap disks.
    pub saw_endcap: bool,
    pub binned: usize,
}

/// Cell array indexed by `phi_bin * Z_REGIONS + z_region`.
#[derive(Clone, Debug)]
pub struct PhiZGrid {
    cells: Vec<Vec<SpacePointId>>,
    occupied: Vec<usize>,
    binned: usize,
}

impl Default for PhiZGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PhiZGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![Vec::new(); MAX_PHI_BINS * Z_REGIONS],
            occupied: Vec::new(),
            binned: 0,
        }
    }

    #[inline]
    pub fn cell_index(phi_bin: usize, z_region: usize) -> usize {
        phi_bin * Z_REGIONS + z_region
    }

    #[inline]
    pub fn cell(&self, idx: usize) -> &[SpacePointId] {
        &self.cells[idx]
    }

    #[inline]
    pub fn is_occupied(&self, idx: usize) -> bool {
        !self.cells[idx].is_empty()
    }

    pub fn occupied_cells(&self) -> &[usize] {
        &self.occupied
    }

    pub fn binned_count(&self) -> usize {
        self.binned
    }

    pub fn clear(&mut self) {
        for &idx in &self.occupied {
            self.cells[idx].clear();
        }
        self.occupied.clear();
        self.binned = 0;
    }

    fn push(&mut self, idx: usize, id: SpacePointId) {
        let cell = &mut self.cells[idx];
        if cell.is_empty() {
            self.occupied.push(idx);
        }
        cell.push(id);
        self.binned += 1;
    }

    /// Rebuilds the grid from `radial`, walking radial bins inner to outer so
    /// every cell ends up radius-ordered.
    pub fn fill_from(
        &mut self,
        radial: &RadialBins,
        store: &SpacePointStore,
        phi: &PhiBinning,
    ) -> FillOutcome {
        self.clear();
        let mut outcome = FillOutcome::default();
        for r_bin in 0..radial.len() {
            let ids = radial.bin(r_bin);
            if ids.is_empty() {
                continue;
            }
            outcome.radial_range = Some(match outcome.radial_range {
                Some((first, _)) => (first, r_bin),
                None => (r_bin, r_bin),
            });
            for &id in ids {
                let point = &store[id];
                if point.z.abs() > ENDCAP_Z {
                    outcome.saw_endcap = true;
                }
                self.push(Self::cell_index(phi.bin(point.phi), z_region(point.z)), id);
            }
        }
        outcome.binned = self.binned;
        outcome
    }
}
