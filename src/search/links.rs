use super::cuts::{link_fails_curvature, VertexWindow};
use crate::conditions::EventConstants;
use crate::finder::SubsystemPolicy;
use crate::space_point::SeedPoint;
use crate::types::SpacePointId;

/// Which side of the central point a partner sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Bottom,
    Top,
}

/// A central point paired with one bottom or top partner, in the central
/// point's conformal frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Link {
    pub point: SpacePointId,
    pub u: f32,
    pub v: f32,
    /// Inverse transverse distance to the central point.
    pub inv_dist: f32,
    /// Outward dz over transverse distance.
    pub tz: f32,
    /// Outward dz over radial separation.
    pub dzdr: f32,
    /// Squared slope error from the two position measurements.
    pub er: f32,
    /// Three-dimensional distance to the central point.
    pub dist3: f32,
}

/// Per-central-point state of the link stage.
#[derive(Clone, Debug)]
pub struct LinkBuilder<'a> {
    central: &'a SeedPoint,
    ax: f32,
    ay: f32,
    policy: &'a SubsystemPolicy,
    window: &'a VertexWindow,
    ipt2k: f32,
    dzdr_max: f32,
}

impl<'a> LinkBuilder<'a> {
    pub fn new(
        central: &'a SeedPoint,
        policy: &'a SubsystemPolicy,
        window: &'a VertexWindow,
        constants: &EventConstants,
        dzdr_max: f32,
    ) -> Self {
        let inv_r = 1.0 / central.radius;
        Self {
            central,
            ax: central.x * inv_r,
            ay: central.y * inv_r,
            policy,
            window,
            ipt2k: constants.ipt2k,
            dzdr_max,
        }
    }

    /// Radial separation from the central point, positive outward for tops
    /// and inward for bottoms.
    #[inline]
    pub fn radial_gap(&self, candidate: &SeedPoint, side: Side) -> f32 {
        match side {
            Side::Top => candidate.radius - self.central.radius,
            Side::Bottom => self.central.radius - candidate.radius,
        }
    }

    /// Builds the link to `candidate`, or `None` when one of the link cuts
    /// rejects it. The caller has already applied the radial window.
    pub fn link(&self, id: SpacePointId, candidate: &SeedPoint, side: Side) -> Option<Link> {
        let c = self.central;
        let dr = self.radial_gap(candidate, side);
        let dz = match side {
            Side::Top => candidate.z - c.z,
            Side::Bottom => c.z - candidate.z,
        };
        if let Some(dz_max) = self.policy.dz_max {
            if dz.abs() > dz_max {
                return None;
            }
        }
        let dzdr = dz / dr;
        let z0 = c.z - c.radius * dzdr;
        if !self.window.is_compatible(z0, c.radius, dzdr) {
            return None;
        }

        let dx = candidate.x - c.x;
        let dy = candidate.y - c.y;
        let x = dx * self.ax + dy * self.ay;
        let y = dy * self.ax - dx * self.ay;
        let dxy = x * x + y * y;
        if dxy <= 0.0 {
            return None;
        }
        let r2 = 1.0 / dxy;
        let u = x * r2;
        let v = y * r2;

        if self.policy.link_precuts
            && link_fails_curvature(x, y, u, v, c.radius, self.policy.max_impact, self.ipt2k)
        {
            return None;
        }

        let inv_dist = r2.sqrt();
        let tz = dz * inv_dist;
        if self.policy.link_precuts && tz.abs() > self.dzdr_max {
            return None;
        }

        Some(Link {
            point: id,
            u,
            v,
            inv_dist,
            tz,
            dzdr,
            er: ((c.cov_z + candidate.cov_z) + tz * tz * (c.cov_r + candidate.cov_r)) * r2,
            dist3: (dxy + dz * dz).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{BeamFrame, MagneticField};
    use crate::finder::SeedFinderParams;
    use crate::types::RawSpacePoint;
    use nalgebra::Vector3;

    fn point(x: f64, y: f64, z: f64) -> SeedPoint {
        let raw = RawSpacePoint::pixel(Vector3::new(x, y, z), [0.0, 0.0], 0, 0);
        SeedPoint::from_raw(&raw, 0, &BeamFrame::default())
    }

    fn setup() -> (SubsystemPolicy, VertexWindow, EventConstants) {
        let params = SeedFinderParams::default().normalized();
        let policy = SubsystemPolicy::pixel(&params);
        let window = VertexWindow::new(-250.0, 250.0, 5.0, 0.02);
        let ipt = 1.0 / params.cuts.pt_min;
        let constants = EventConstants::new(MagneticField::default(), ipt * ipt, 1.0);
        (policy, window, constants)
    }

    #[test]
    fn radial_links_have_zero_v() {
        let (policy, window, constants) = setup();
        let central = point(70.0, 0.0, 7.0);
        let builder = LinkBuilder::new(&central, &policy, &window, &constants, 7.0);

        let top = builder
            .link(SpacePointId(2), &point(110.0, 0.0, 11.0), Side::Top)
            .unwrap();
        assert!((top.u - 1.0 / 40.0).abs() < 1e-6);
        assert!(top.v.abs() < 1e-9);
        assert!((top.tz - 0.1).abs() < 1e-5);
        assert!((top.dzdr - 0.1).abs() < 1e-5);

        let bottom = builder
            .link(SpacePointId(0), &point(30.0, 0.0, 3.0), Side::Bottom)
            .unwrap();
        assert!((bottom.u + 1.0 / 40.0).abs() < 1e-6);
        assert!((bottom.tz - 0.1).abs() < 1e-5);
    }

    #[test]
    fn default_link_points_at_the_first_slot() {
        let link = Link::default();
        assert_eq!(link.point, SpacePointId(0));
        assert_eq!(link.inv_dist, 0.0);
    }

    #[test]
    fn link_outside_vertex_window_is_rejected() {
        let (policy, window, constants) = setup();
        let central = point(70.0, 0.0, 0.0);
        let builder = LinkBuilder::new(&central, &policy, &window, &constants, 7.0);
        // z0 = 0 - 70 * (-400 / 40) = 700 > 250.
        assert!(builder
            .link(SpacePointId(1), &point(110.0, 0.0, -400.0), Side::Top)
            .is_none());
    }

    #[test]
    fn steep_link_fails_slope_cut() {
        let (policy, mut window, constants) = setup();
        window.z_min = -1.0e6;
        window.z_max = 1.0e6;
        let central = point(70.0, 0.0, 0.0);
        let builder = LinkBuilder::new(&central, &policy, &window, &constants, 7.0);
        // tz = 400 / 40 = 10 > 7.
        assert!(builder
            .link(SpacePointId(1), &point(110.0, 0.0, 400.0), Side::Top)
            .is_none());
    }
}
