//! Scalar cut helpers shared by the link and triplet stages.
//!
//! The triplet fit works in the conformal frame of the central point:
//! `u = x / (x² + y²)`, `v = y / (x² + y²)`, with x pointing away from the
//! beam line. A circle through the central point becomes the line
//! `v = A u + B`, with `(1 + A²) / B²` the squared helix diameter.
//!
//! The fit runs in single precision, so a track lying exactly on either
//! bound comes out a few ulps to either side of it. Both bounds carry a
//! small slack that keeps such tracks accepted.

/// Relative slack on the squared-curvature bound.
pub const PT_BOUND_SLACK: f32 = 1.0e-4;

/// Absolute slack on the impact bound (mm).
pub const IMPACT_BOUND_SLACK: f32 = 1.0e-3;

/// Whether the fitted line describes a helix softer than the momentum bound:
/// `B² > ipt2k (1 + A²)`. Equality passes.
#[inline]
pub fn exceeds_pt_curvature(b_sq: f32, one_plus_a_sq: f32, ipt2k: f32) -> bool {
    b_sq > ipt2k * one_plus_a_sq * (1.0 + PT_BOUND_SLACK)
}

/// Transverse impact-parameter estimate `|(A - B R) R|` for a central point
/// at radius `r`.
#[inline]
pub fn impact_estimate(a: f32, b: f32, r: f32) -> f32 {
    ((a - b * r) * r).abs()
}

/// Impact acceptance; the bound itself is accepted.
#[inline]
pub fn within_impact(d0: f32, max_impact: f32) -> bool {
    d0 <= max_impact + IMPACT_BOUND_SLACK
}

/// Curvature pre-cut of a single link. When the link alone cannot be made
/// to pass within `max_impact` of the beam line with a straight track, the
/// softest circle through the beam-line edge and the link is checked against
/// the momentum bound. Returns `true` when the link is rejected.
#[inline]
pub fn link_fails_curvature(
    x: f32,
    y: f32,
    u: f32,
    v: f32,
    central_radius: f32,
    max_impact: f32,
    ipt2k: f32,
) -> bool {
    if (central_radius * y).abs() <= max_impact * x.abs() {
        return false;
    }
    let edge = max_impact / (central_radius * central_radius);
    let v0 = if x * y < 0.0 { edge } else { -edge };
    let a = (v - v0) / (u + 1.0 / central_radius);
    let b = v0 + a / central_radius;
    exceeds_pt_curvature(b * b, 1.0 + a * a, ipt2k)
}

/// Longitudinal acceptance of a link's extrapolation to the beam line.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexWindow {
    pub z_min: f32,
    pub z_max: f32,
    /// Sorted vertex positions; empty means only the window applies.
    pub vertices: Vec<f32>,
    pub dz_ver: f32,
    pub dzdr_ver: f32,
}

impl VertexWindow {
    pub fn new(z_min: f32, z_max: f32, dz_ver: f32, dzdr_ver: f32) -> Self {
        Self {
            z_min,
            z_max,
            vertices: Vec::new(),
            dz_ver,
            dzdr_ver,
        }
    }

    /// `z0` must fall inside the window and, when vertices are known, lie
    /// within `(dz_ver + dzdr_ver r) sqrt(1 + tz²)` of the closest one.
    pub fn is_compatible(&self, z0: f32, r: f32, tz: f32) -> bool {
        if z0 < self.z_min || z0 > self.z_max {
            return false;
        }
        if self.vertices.is_empty() {
            return true;
        }
        let closest = self
            .vertices
            .iter()
            .map(|v| (v - z0).abs())
            .fold(f32::INFINITY, f32::min);
        closest < (self.dz_ver + self.dzdr_ver * r) * (1.0 + tz * tz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pt_bound_accepts_equality() {
        // A = 0, B = 0.5: squared curvature equals the bound exactly.
        assert!(!exceeds_pt_curvature(0.25, 1.0, 0.25));
        assert!(exceeds_pt_curvature(0.2501, 1.0, 0.25));
        assert!(!exceeds_pt_curvature(0.4, 2.0, 0.25));
        // A few ulps above the bound still pass.
        assert!(!exceeds_pt_curvature(0.25 * (1.0 + 1.0e-6), 1.0, 0.25));
    }

    #[test]
    fn impact_bound_is_inclusive() {
        let d0 = impact_estimate(0.5, 0.0, 2.0);
        assert_eq!(d0, 1.0);
        assert!(within_impact(d0, 1.0));
        assert!(!within_impact(d0, 0.99));
        assert_eq!(impact_estimate(0.0, 0.0, 75.0), 0.0);
        // Rounding residue of an exact zero-impact fit.
        assert!(within_impact(5.0e-7, 0.0));
        assert!(!within_impact(0.01, 0.0));
    }

    #[test]
    fn radial_link_never_fails_precut() {
        // Straight outward link (y = 0).
        let (x, y) = (40.0, 0.0);
        let d = x * x + y * y;
        assert!(!link_fails_curvature(x, y, x / d, y / d, 50.0, 2.0, 1.0e-6));
        assert!(!link_fails_curvature(-x, y, -x / d, y / d, 50.0, 2.0, 1.0e-6));
    }

    #[test]
    fn sharply_bent_link_fails_precut() {
        // Top 40 mm out but 30 mm sideways from a central point at 50 mm:
        // needs a helix far below a 1 GeV bound.
        let (x, y) = (40.0f32, 30.0f32);
        let d = x * x + y * y;
        let k = 2.0 / (300.0 * 0.002);
        let ipt2k = (1.0 / 1000.0f32).powi(2) / (k * k);
        assert!(link_fails_curvature(x, y, x / d, y / d, 50.0, 2.0, ipt2k));
    }

    #[test]
    fn vertex_window_and_list() {
        let mut w = VertexWindow::new(-100.0, 100.0, 5.0, 0.0);
        assert!(w.is_compatible(99.0, 50.0, 0.0));
        assert!(!w.is_compatible(101.0, 50.0, 0.0));
        w.vertices = vec![-20.0, 30.0];
        assert!(w.is_compatible(33.0, 50.0, 0.0));
        assert!(!w.is_compatible(10.0, 50.0, 0.0));
        // Slope widens the tolerance: 5 * sqrt(1 + 3²) ≈ 15.8.
        assert!(!w.is_compatible(-6.0, 50.0, 0.0));
        assert!(w.is_compatible(-6.0, 50.0, 3.0));
    }
}
