//! Static neighbour maps of the (φ, z) grid.
//!
//! For every cell the map lists the cells whose points may act as bottom or
//! top partners of a central point in that cell. The list always starts with
//! the cell itself followed by its two azimuthal neighbours (wrapping at 0 and
//! the last bin); longitudinal neighbours are added on the side facing the
//! interaction region for bottoms and away from it for tops.

use crate::binning::{PhiZGrid, CENTRAL_Z_REGION, Z_REGIONS};
use crate::types::Subsystem;

#[derive(Clone, Debug)]
pub struct NeighbourMap {
    max_phi_bin: usize,
    bottom: Vec<Vec<usize>>,
    top: Vec<Vec<usize>>,
}

impl NeighbourMap {
    /// Builds the maps for `max_phi_bin + 1` azimuthal bins. Strip maps reach
    /// two regions across the barrel/endcap transitions (regions 3 and 7).
    pub fn build(max_phi_bin: usize, layout: Subsystem) -> Self {
        let cells = (max_phi_bin + 1) * Z_REGIONS;
        let mut bottom = vec![Vec::new(); cells];
        let mut top = vec![Vec::new(); cells];

        for phi in 0..=max_phi_bin {
            let below = if phi == 0 { max_phi_bin } else { phi - 1 };
            let above = if phi == max_phi_bin { 0 } else { phi + 1 };

            for z in 0..Z_REGIONS {
                let same = PhiZGrid::cell_index(phi, z);
                let lower = PhiZGrid::cell_index(below, z);
                let higher = PhiZGrid::cell_index(above, z);
                let column = [same, lower, higher];

                let b = &mut bottom[same];
                let t = &mut top[same];
                b.extend(column);
                t.extend(column);

                if z == CENTRAL_Z_REGION {
                    t.extend(column.map(|c| c + 1));
                    t.extend(column.map(|c| c - 1));
                } else if z > CENTRAL_Z_REGION {
                    b.extend(column.map(|c| c - 1));
                    if z < Z_REGIONS - 1 {
                        t.extend(column.map(|c| c + 1));
                    }
                } else {
                    b.extend(column.map(|c| c + 1));
                    if z > 0 {
                        t.extend(column.map(|c| c - 1));
                    }
                }

                if layout == Subsystem::Strip {
                    if z == 3 {
                        b.extend(column.map(|c| c + 2));
                    } else if z == 7 {
                        b.extend(column.map(|c| c - 2));
                    }
                }
            }
        }

        Self {
            max_phi_bin,
            bottom,
            top,
        }
    }

    #[inline]
    pub fn bottom(&self, cell: usize) -> &[usize] {
        &self.bottom[cell]
    }

    #[inline]
    pub fn top(&self, cell: usize) -> &[usize] {
        &self.top[cell]
    }

    pub fn max_phi_bin(&self) -> usize {
        self.max_phi_bin
    }
}
