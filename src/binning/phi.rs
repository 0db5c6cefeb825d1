use crate::angle::wrap_two_pi;
use std::f32::consts::TAU;

/// Hard upper bound on the number of azimuthal bins.
pub const MAX_PHI_BINS: usize = 200;

const MIN_PHI_BINS: f32 = 10.0;

/// Azimuthal binning: bin count and inverse bin width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhiBinning {
    max_phi_bin: usize,
    inv_bin_size: f32,
}

impl PhiBinning {
    /// Clamps a requested inverse bin width to 10..=200 bins around the
    /// circle, then rounds so the bins tile [0, 2π) exactly.
    pub fn from_inverse_bin_size(requested: f32) -> Self {
        let lo = MIN_PHI_BINS / TAU;
        let hi = MAX_PHI_BINS as f32 / TAU;
        let inv = if requested.is_finite() {
            requested.clamp(lo, hi)
        } else {
            hi
        };
        let max_phi_bin = ((TAU * inv) as usize).min(MAX_PHI_BINS - 1);
        Self {
            max_phi_bin,
            inv_bin_size: (max_phi_bin + 1) as f32 / TAU,
        }
    }

    /// Bin width set to a third of the worst-case azimuthal sweep of a track
    /// between `r_min` and `r_max`.
    pub fn optimised(pt_min: f32, max_d0: f32, r_min: f32, r_max: f32) -> Self {
        let step = azimuthal_step(pt_min, max_d0, r_min, r_max) / 3.0;
        Self::from_inverse_bin_size(1.0 / step)
    }

    /// Momentum-scaled width used before the geometric estimate existed.
    pub fn legacy(pt_min: f32) -> Self {
        Self::from_inverse_bin_size(pt_min.min(400.0) / 60.0)
    }

    #[inline]
    pub fn bin(&self, phi: f32) -> usize {
        let raw = (wrap_two_pi(phi) * self.inv_bin_size) as isize;
        if raw < 0 {
            self.max_phi_bin
        } else if raw as usize > self.max_phi_bin {
            0
        } else {
            raw as usize
        }
    }

    pub fn max_phi_bin(&self) -> usize {
        self.max_phi_bin
    }

    pub fn bin_count(&self) -> usize {
        self.max_phi_bin + 1
    }

    pub fn inverse_bin_size(&self) -> f32 {
        self.inv_bin_size
    }
}

/// Largest azimuthal distance (rad) a track of momentum `pt_min` (MeV, in a
/// 2 T field) with impact up to `max_d0` can cover between radii `r_min` and
/// `r_max`: the sum of the impact-parameter and the curvature contributions.
pub fn azimuthal_step(pt_min: f32, max_d0: f32, r_min: f32, r_max: f32) -> f32 {
    let radius_at_pt_min = pt_min / 0.6;
    let worst_d0 = max_d0.min(r_min);
    let from_impact = ((worst_d0 / r_min).asin() - (worst_d0 / r_max).asin()).abs();
    let from_curvature = ((r_max / (2.0 * radius_at_pt_min)).min(1.0).asin()
        - (r_min / (2.0 * radius_at_pt_min)).min(1.0).asin())
    .abs();
    from_impact + from_curvature
}
