use super::params::SeedFinderParams;
use crate::binning::zregion::{PIXEL_Z_ORDER, STRIP_Z_ORDER};
use crate::binning::Z_REGIONS;
use crate::types::Subsystem;
use serde::{Deserialize, Serialize};

/// Which points an event admits and which subsystem policy searches them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingPass {
    /// Pixel points only, pixel policy.
    #[default]
    Pixel,
    /// Strip points only, strip policy.
    Strip,
    /// Pixel and strip points together under the strip policy; the only pass
    /// that can build mixed-subsystem seeds.
    Combined,
}

impl SeedingPass {
    pub fn admits(self, subsystem: Subsystem) -> bool {
        match self {
            SeedingPass::Pixel => subsystem == Subsystem::Pixel,
            SeedingPass::Strip => subsystem == Subsystem::Strip,
            SeedingPass::Combined => true,
        }
    }

    /// Binning and neighbour layout used by the pass.
    pub fn layout(self) -> Subsystem {
        match self {
            SeedingPass::Pixel => Subsystem::Pixel,
            SeedingPass::Strip | SeedingPass::Combined => Subsystem::Strip,
        }
    }
}

/// How the bottom and top slopes combine in the scattering term.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeanSlope {
    /// `tz_bottom * tz_top`
    Geometric,
    /// `((tz_bottom + tz_top) / 2)²`
    Arithmetic,
}

/// Search windows of one pass, resolved from [`SeedFinderParams`].
#[derive(Clone, Debug, PartialEq)]
pub struct SubsystemPolicy {
    pub layout: Subsystem,
    pub max_impact: f32,
    pub dr_min: f32,
    pub dr_max: f32,
    pub dr_max_top: Option<f32>,
    pub dz_max: Option<f32>,
    pub z_max_central: f32,
    pub confirmation_radius: f32,
    pub min_top_links: usize,
    /// Apply the curvature and dz/dr pre-cuts while linking.
    pub link_precuts: bool,
    pub mean_slope: MeanSlope,
    pub z_order: [usize; Z_REGIONS],
    /// Offsets (mm) of the central radius window from the first and last
    /// occupied radial bins, in the barrel and with large-impact endcaps.
    pub central_margins: (f32, f32),
    pub central_margins_wide: (f32, f32),
    pub max_seeds_per_point: usize,
    pub keep_confirmed: bool,
}

impl SubsystemPolicy {
    pub fn pixel(params: &SeedFinderParams) -> Self {
        let p = &params.pixel;
        Self {
            layout: Subsystem::Pixel,
            max_impact: params.cuts.max_impact,
            dr_min: p.dr_min,
            dr_max: p.dr_max,
            dr_max_top: p.dr_max_top,
            dz_max: p.dz_max,
            z_max_central: p.z_max_central,
            confirmation_radius: p.confirmation_radius,
            min_top_links: p.min_top_links,
            link_precuts: true,
            mean_slope: MeanSlope::Geometric,
            z_order: PIXEL_Z_ORDER,
            central_margins: (10.0, 10.0),
            central_margins_wide: (10.0, 10.0),
            max_seeds_per_point: p.max_seeds_per_point,
            keep_confirmed: p.keep_confirmed,
        }
    }

    pub fn strip(params: &SeedFinderParams) -> Self {
        let s = &params.strip;
        Self {
            layout: Subsystem::Strip,
            max_impact: params.cuts.max_impact_sss,
            dr_min: s.dr_min,
            dr_max: s.dr_max,
            dr_max_top: Some(s.dr_max),
            dz_max: Some(s.dz_max),
            z_max_central: s.z_max_central,
            confirmation_radius: f32::INFINITY,
            min_top_links: 1,
            link_precuts: false,
            mean_slope: MeanSlope::Arithmetic,
            z_order: STRIP_Z_ORDER,
            central_margins: (30.0, 150.0),
            central_margins_wide: (10.0, 10.0),
            max_seeds_per_point: s.max_seeds_per_point,
            keep_confirmed: s.keep_confirmed,
        }
    }

    /// Partners (top links for a central point, curvature candidates for a
    /// bottom point) a point at `radius` needs before it is scored.
    #[inline]
    pub fn required_partners(&self, radius: f32) -> usize {
        if radius > self.confirmation_radius {
            1
        } else {
            self.min_top_links.max(1)
        }
    }

    /// Radius window of central points given the lower edges (mm) of the
    /// first and last occupied radial bins.
    pub fn central_window(
        &self,
        first_edge: f32,
        last_edge: f32,
        endcap: bool,
        large_impact: bool,
    ) -> (f32, f32) {
        let (lo, hi) = if endcap && large_impact {
            self.central_margins_wide
        } else {
            self.central_margins
        };
        (first_edge + lo, last_edge - hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_admit_their_subsystems() {
        assert!(SeedingPass::Pixel.admits(Subsystem::Pixel));
        assert!(!SeedingPass::Pixel.admits(Subsystem::Strip));
        assert!(!SeedingPass::Strip.admits(Subsystem::Pixel));
        assert!(SeedingPass::Combined.admits(Subsystem::Pixel));
        assert_eq!(SeedingPass::Combined.layout(), Subsystem::Strip);
    }

    #[test]
    fn pixel_partner_requirement_relaxes_outside_confirmation_radius() {
        let policy = SubsystemPolicy::pixel(&SeedFinderParams::default());
        assert_eq!(policy.required_partners(60.0), 2);
        assert_eq!(policy.required_partners(140.0), 2);
        assert_eq!(policy.required_partners(141.0), 1);
        let strip = SubsystemPolicy::strip(&SeedFinderParams::default());
        assert_eq!(strip.required_partners(500.0), 1);
    }

    #[test]
    fn strip_window_widens_for_large_impact_endcaps() {
        let strip = SubsystemPolicy::strip(&SeedFinderParams::default());
        assert_eq!(strip.central_window(400.0, 1000.0, false, true), (430.0, 850.0));
        assert_eq!(strip.central_window(400.0, 1000.0, true, false), (430.0, 850.0));
        assert_eq!(strip.central_window(400.0, 1000.0, true, true), (410.0, 990.0));
        let pixel = SubsystemPolicy::pixel(&SeedFinderParams::default());
        assert_eq!(pixel.central_window(30.0, 110.0, true, true), (40.0, 100.0));
    }
}
