//! Parameter types configuring the seed finder.
//!
//! Groups the global kinematic cuts, the binning policy, the per-subsystem
//! search windows, and the scoring knobs used when ranking triplets.
//!
//! Defaults follow a silicon tracker with a pixel detector inside ~320 mm and
//! a strip detector outside ~400 mm. Every group deserializes with
//! `#[serde(default)]` so run configurations only need to list overrides.
//! Call [`SeedFinderParams::normalized`] (done by `SeedFinder::new`) before
//! use.

use serde::{Deserialize, Serialize};

/// Multiple-scattering coefficient of the slope-compatibility test.
pub const DEFAULT_SCATTERING_COEFFICIENT: f32 = 134.0 * 0.05 * 9.0;

/// Smallest minimum transverse momentum accepted (MeV).
const PT_MIN_FLOOR: f32 = 100.0;

/// Seed-finder wide parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedFinderParams {
    pub cuts: CutParams,
    pub binning: BinningParams,
    pub pixel: PixelPolicyParams,
    pub strip: StripPolicyParams,
    pub scoring: ScoringParams,
    pub vertex: VertexParams,
    /// Output capacity per production call; a search pauses once this many
    /// seeds are buffered and resumes when they are consumed.
    pub max_seeds: usize,
    /// Large-impact-parameter running: widens the strip central window in the
    /// endcaps. Score blending is driven by `cuts.max_impact` instead.
    pub large_impact: bool,
}

impl Default for SeedFinderParams {
    fn default() -> Self {
        Self {
            cuts: CutParams::default(),
            binning: BinningParams::default(),
            pixel: PixelPolicyParams::default(),
            strip: StripPolicyParams::default(),
            scoring: ScoringParams::default(),
            vertex: VertexParams::default(),
            max_seeds: 50_000,
            large_impact: false,
        }
    }
}

impl SeedFinderParams {
    /// Applies the guards every derived quantity relies on:
    /// - `pt_min` is taken by magnitude and floored at 100 MeV;
    /// - the strip impact window is never tighter than the pixel one;
    /// - an `eta_min` within 0.1 of zero makes the acceptance symmetric;
    /// - `max_seeds` is at least one.
    pub fn normalized(mut self) -> Self {
        let cuts = &mut self.cuts;
        cuts.pt_min = cuts.pt_min.abs().max(PT_MIN_FLOOR);
        if cuts.max_impact_sss < cuts.max_impact {
            cuts.max_impact_sss = cuts.max_impact;
        }
        if cuts.eta_min.abs() < 0.1 {
            cuts.eta_min = -cuts.eta_max;
        }
        if cuts.z_min > cuts.z_max {
            std::mem::swap(&mut cuts.z_min, &mut cuts.z_max);
        }
        if self.binning.bin_size_r.is_nan() || self.binning.bin_size_r <= 0.0 {
            self.binning.bin_size_r = BinningParams::default().bin_size_r;
        }
        self.max_seeds = self.max_seeds.max(1);
        self.pixel.max_seeds_per_point = self.pixel.max_seeds_per_point.max(1);
        self.strip.max_seeds_per_point = self.strip.max_seeds_per_point.max(1);
        self
    }
}

/// Global kinematic and acceptance cuts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutParams {
    /// Minimum transverse momentum (MeV).
    pub pt_min: f32,
    pub eta_min: f32,
    pub eta_max: f32,
    /// Maximum transverse impact parameter for pixel-pass seeds (mm).
    pub max_impact: f32,
    /// Maximum transverse impact parameter for strip-pass seeds (mm).
    pub max_impact_sss: f32,
    /// Longitudinal vertex window (mm).
    pub z_min: f32,
    pub z_max: f32,
    /// Radial acceptance of incoming points (mm).
    pub r_min: f32,
    pub r_max: f32,
    pub scattering_coefficient: f32,
}

impl Default for CutParams {
    fn default() -> Self {
        Self {
            pt_min: 500.0,
            eta_min: 0.0,
            eta_max: 2.7,
            max_impact: 2.0,
            max_impact_sss: 20.0,
            z_min: -250.0,
            z_max: 250.0,
            r_min: 0.0,
            r_max: 1100.0,
            scattering_coefficient: DEFAULT_SCATTERING_COEFFICIENT,
        }
    }
}

/// Spatial binning policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinningParams {
    /// Radial bin width (mm).
    pub bin_size_r: f32,
    /// Derive the azimuthal width from the worst-case track sweep; when off,
    /// scale it with `pt_min` only.
    pub optimise_phi_binning: bool,
    /// Radial span used for the pixel azimuthal estimate (mm).
    pub pixel_sweep_r_min: f32,
    pub pixel_sweep_r_max: f32,
}

impl Default for BinningParams {
    fn default() -> Self {
        Self {
            bin_size_r: 2.0,
            optimise_phi_binning: true,
            pixel_sweep_r_min: 40.0,
            pixel_sweep_r_max: 320.0,
        }
    }
}

/// Search windows and scoring offsets of the pixel pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelPolicyParams {
    /// Radial separation window of a link (mm). `dr_max_top: None` leaves
    /// tops unbounded.
    pub dr_min: f32,
    pub dr_max: f32,
    pub dr_max_top: Option<f32>,
    /// Optional bound on |Δz| of a link (mm).
    pub dz_max: Option<f32>,
    /// Central points beyond this |z| (mm) are skipped.
    pub z_max_central: f32,
    /// Central points at or inside this radius need `min_top_links` tops
    /// (and bottoms need more than one curvature candidate); outside it one
    /// is enough.
    pub confirmation_radius: f32,
    pub min_top_links: usize,
    pub max_seeds_per_point: usize,
    /// Keep confirmed seeds beyond `max_seeds_per_point` (up to
    /// `ScoringParams::confirmed_capacity`).
    pub keep_confirmed: bool,
    /// Score offset for seeds with a pixel top (negative favours them).
    pub score_bonus: f32,
    /// d0 tightening per unit of slope penalty for unconfirmed seeds.
    pub unconfirmed_d0_slope: f32,
}

impl Default for PixelPolicyParams {
    fn default() -> Self {
        Self {
            dr_min: 6.0,
            dr_max: 140.0,
            dr_max_top: None,
            dz_max: None,
            z_max_central: 2700.0,
            confirmation_radius: 140.0,
            min_top_links: 2,
            max_seeds_per_point: 5,
            keep_confirmed: true,
            score_bonus: -200.0,
            unconfirmed_d0_slope: 0.0,
        }
    }
}

/// Search windows and scoring offsets of the strip pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripPolicyParams {
    /// Radial span used for the strip azimuthal estimate (mm).
    pub sweep_r_min: f32,
    pub sweep_r_max: f32,
    pub dr_min: f32,
    pub dr_max: f32,
    /// Bound on |Δz| of a link (mm).
    pub dz_max: f32,
    pub z_max_central: f32,
    pub max_seeds_per_point: usize,
    pub keep_confirmed: bool,
    /// Score offset for seeds with a strip bottom.
    pub score_bonus: f32,
    pub unconfirmed_d0_slope: f32,
}

impl Default for StripPolicyParams {
    fn default() -> Self {
        Self {
            sweep_r_min: 400.0,
            sweep_r_max: 1000.0,
            dr_min: 20.0,
            dr_max: 3000.0,
            dz_max: 900.0,
            z_max_central: 2700.0,
            max_seeds_per_point: 5,
            keep_confirmed: true,
            score_bonus: -400.0,
            unconfirmed_d0_slope: 1.0,
        }
    }
}

/// How the triplets sharing a bottom/central pair are scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Subsystem bonuses, a bonus for a confirming top on another surface,
    /// and d0 gating of unconfirmed seeds.
    SeedConfirmation,
    /// Reward the number of distinct layers among curvature-compatible tops.
    LayerCount,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub mode: ScoringMode,
    /// Score offset when a second compatible top confirms the seed.
    pub confirmation_bonus: f32,
    /// Minimum radial gap (mm) between a top and its confirming partner.
    pub dr_min_confirmation: f32,
    /// Two tops are curvature-compatible within this distance (1/mm).
    pub curvature_tolerance: f32,
    /// Seeds scoring above this are dropped.
    pub max_score: f32,
    /// Per-point ranking capacity when confirmed seeds are kept.
    pub confirmed_capacity: usize,
    /// Layer-count mode: tops closer than this in 3D distance to the central
    /// point share a layer (mm).
    pub layer_separation: f32,
    pub layer_bonus: f32,
    pub multi_layer_bonus: f32,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            mode: ScoringMode::SeedConfirmation,
            confirmation_bonus: -200.0,
            dr_min_confirmation: 5.0,
            curvature_tolerance: 3.0e-5,
            max_score: 100.0,
            confirmed_capacity: 50,
            layer_separation: 20.0,
            layer_bonus: 100.0,
            multi_layer_bonus: 100_000.0,
        }
    }
}

/// Vertex compatibility window used when a vertex list is supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexParams {
    /// Constant and radius-scaled tolerance around each vertex (mm, mm/mm).
    pub dz_ver: f32,
    pub dzdr_ver: f32,
    /// Margin added around the vertex span when narrowing the z window (mm).
    pub window_margin: f32,
}

impl Default for VertexParams {
    fn default() -> Self {
        Self {
            dz_ver: 5.0,
            dzdr_ver: 0.02,
            window_margin: 20.0,
        }
    }
}
