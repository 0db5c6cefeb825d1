//! Scoring of the triplets sharing one bottom/central pair.
//!
//! Every accepted top of a pair is a [`CurvatureCandidate`]. Candidates are
//! sorted by curvature so that tops describing the same helix sit next to
//! each other; a second compatible top on another surface confirms a seed.

use super::bounded::SeedRanking;
use crate::angle::dzdr_to_eta;
use crate::finder::{ScoringMode, SeedFinderParams};
use crate::search::cuts::within_impact;
use crate::search::Link;
use crate::space_point::{SeedPoint, SpacePointStore};
use crate::types::{SeedEstimate, SpacePointId, Subsystem};

/// Triplet accepted by the compatibility cuts, waiting to be scored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvatureCandidate {
    /// Signed curvature `B / sqrt(1 + A²)`.
    pub curvature: f32,
    /// Index of the top link.
    pub top: usize,
    pub d0: f32,
    /// Straight-line deviation in r-z.
    pub penalty: f32,
}

/// Seed record held by the ranking until the central point is finished.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedCandidate {
    pub bottom: SpacePointId,
    pub central: SpacePointId,
    pub top: SpacePointId,
    pub bottom_subsystem: Subsystem,
    pub top_subsystem: Subsystem,
    pub z_vertex: f32,
    pub estimate: SeedEstimate,
}

/// Score below which a seed counts as confirmed. A seed only gets there by
/// collecting the confirmation bonus on top of its subsystem bonus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfirmationThresholds {
    pub pixel: f32,
    pub strip: f32,
}

impl ConfirmationThresholds {
    pub fn from_bonuses(pixel_bonus: f32, strip_bonus: f32) -> Self {
        Self {
            pixel: pixel_bonus - 1.0,
            strip: strip_bonus - 1.0,
        }
    }

    /// Strip bottom: strip threshold. Pixel bottom and top: pixel threshold.
    /// Mixed seeds are confirmed by any negative score.
    pub fn is_confirmed_by(&self, bottom: Subsystem, top: Subsystem, quality: f32) -> bool {
        match (bottom, top) {
            (Subsystem::Strip, _) => quality < self.strip,
            (Subsystem::Pixel, Subsystem::Pixel) => quality < self.pixel,
            (Subsystem::Pixel, Subsystem::Strip) => quality < 0.0,
        }
    }

    pub fn is_confirmed(&self, candidate: &SeedCandidate, quality: f32) -> bool {
        self.is_confirmed_by(candidate.bottom_subsystem, candidate.top_subsystem, quality)
    }
}

/// Bottom/central pair the candidates were built from.
#[derive(Clone, Copy, Debug)]
pub struct PairContext<'a> {
    pub store: &'a SpacePointStore,
    pub central: SpacePointId,
    pub bottom: &'a Link,
    pub tops: &'a [Link],
    pub z_vertex: f32,
    /// Curvature factor `K` of the event.
    pub k: f32,
}

impl PairContext<'_> {
    fn top_point(&self, candidate: &CurvatureCandidate) -> &SeedPoint {
        &self.store[self.tops[candidate.top].point]
    }
}

/// Pixel impact window (mm) above which seed scores blend in a direction term.
pub const DIRECTION_BLEND_MIN_IMPACT: f32 = 50.0;

/// Scoring knobs resolved from [`SeedFinderParams`].
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreRules {
    pub mode: ScoringMode,
    pub thresholds: ConfirmationThresholds,
    pub pixel_bonus: f32,
    pub strip_bonus: f32,
    pub confirmation_bonus: f32,
    pub dr_min_confirmation: f32,
    pub curvature_tolerance: f32,
    pub max_score: f32,
    pub pixel_max_impact: f32,
    pub strip_max_impact: f32,
    pub pixel_d0_slope: f32,
    pub strip_d0_slope: f32,
    /// Blend a direction term into seed scores; on when the pixel impact
    /// window exceeds [`DIRECTION_BLEND_MIN_IMPACT`].
    pub blend_direction: bool,
    pub layer_separation: f32,
    pub layer_bonus: f32,
    pub multi_layer_bonus: f32,
}

impl ScoreRules {
    pub fn from_params(params: &SeedFinderParams) -> Self {
        let s = &params.scoring;
        Self {
            mode: s.mode,
            thresholds: ConfirmationThresholds::from_bonuses(
                params.pixel.score_bonus,
                params.strip.score_bonus,
            ),
            pixel_bonus: params.pixel.score_bonus,
            strip_bonus: params.strip.score_bonus,
            confirmation_bonus: s.confirmation_bonus,
            dr_min_confirmation: s.dr_min_confirmation,
            curvature_tolerance: s.curvature_tolerance,
            max_score: s.max_score,
            pixel_max_impact: params.cuts.max_impact,
            strip_max_impact: params.cuts.max_impact_sss,
            pixel_d0_slope: params.pixel.unconfirmed_d0_slope,
            strip_d0_slope: params.strip.unconfirmed_d0_slope,
            blend_direction: params.cuts.max_impact > DIRECTION_BLEND_MIN_IMPACT,
            layer_separation: s.layer_separation,
            layer_bonus: s.layer_bonus,
            multi_layer_bonus: s.multi_layer_bonus,
        }
    }

    /// Scores every candidate of one bottom/central pair and offers the
    /// survivors to `ranking`. Sorts `candidates` by curvature.
    pub fn score_pair(
        &self,
        ctx: &PairContext<'_>,
        candidates: &mut [CurvatureCandidate],
        ranking: &mut SeedRanking,
    ) {
        candidates.sort_by(|a, b| a.curvature.total_cmp(&b.curvature));
        match self.mode {
            ScoringMode::SeedConfirmation => self.score_with_confirmation(ctx, candidates, ranking),
            ScoringMode::LayerCount => self.score_by_layers(ctx, candidates, ranking),
        }
    }

    fn score_with_confirmation(
        &self,
        ctx: &PairContext<'_>,
        candidates: &[CurvatureCandidate],
        ranking: &mut SeedRanking,
    ) {
        let bottom = &ctx.store[ctx.bottom.point];
        let central = &ctx.store[ctx.central];
        let bottom_pixel = bottom.is_pixel();
        let mut window_start = 0;

        for (i, cand) in candidates.iter().enumerate() {
            let top = ctx.top_point(cand);
            let top_pixel = top.is_pixel();
            let mut quality = cand.d0 + cand.penalty;
            if self.blend_direction {
                quality = blend_direction_term(quality, cand.d0, bottom, top);
            }

            if !bottom_pixel {
                quality += self.strip_bonus;
            } else if top_pixel {
                quality += self.pixel_bonus;
            }

            let lo = cand.curvature - self.curvature_tolerance;
            let hi = cand.curvature + self.curvature_tolerance;
            for (j, other) in candidates.iter().enumerate().skip(window_start) {
                if j == i {
                    continue;
                }
                if other.curvature < lo {
                    window_start = j + 1;
                    continue;
                }
                if other.curvature > hi {
                    break;
                }
                let other_top = ctx.top_point(other);
                if other_top.surface == top.surface {
                    continue;
                }
                if (other_top.radius - top.radius).abs() < self.dr_min_confirmation {
                    continue;
                }
                quality += self.confirmation_bonus;
                break;
            }

            if quality > self.max_score {
                continue;
            }

            // Mixed seeds live on their confirmation and must beat the
            // points' current qualities.
            if bottom_pixel != top_pixel
                && (quality > 0.0
                    || (quality > bottom.quality()
                        && quality > central.quality()
                        && quality > top.quality()))
            {
                continue;
            }

            if !self
                .thresholds
                .is_confirmed_by(bottom.subsystem, top.subsystem, quality)
            {
                let max_d0 = if bottom_pixel {
                    self.pixel_max_impact - self.pixel_d0_slope * cand.penalty
                } else {
                    self.strip_max_impact - self.strip_d0_slope * cand.penalty
                };
                if !within_impact(cand.d0, max_d0) {
                    continue;
                }
            }

            ranking.offer(self.candidate(ctx, cand, bottom, top), quality);
        }
    }

    fn score_by_layers(
        &self,
        ctx: &PairContext<'_>,
        candidates: &[CurvatureCandidate],
        ranking: &mut SeedRanking,
    ) {
        let bottom = &ctx.store[ctx.bottom.point];
        let mut window_start = 0;

        for (i, cand) in candidates.iter().enumerate() {
            let mut layers = [0.0f32; 4];
            layers[0] = ctx.tops[cand.top].dist3;
            let mut count = 1;

            let lo = cand.curvature - self.curvature_tolerance;
            let hi = cand.curvature + self.curvature_tolerance;
            for (j, other) in candidates.iter().enumerate().skip(window_start) {
                if j == i {
                    continue;
                }
                if other.curvature < lo {
                    window_start = j + 1;
                    continue;
                }
                if other.curvature > hi {
                    break;
                }
                let distance = ctx.tops[other.top].dist3;
                let new_layer = layers[..count]
                    .iter()
                    .all(|&seen| (distance - seen).abs() >= self.layer_separation);
                if new_layer {
                    layers[count] = distance;
                    count += 1;
                    if count == layers.len() {
                        break;
                    }
                }
            }

            let mut quality = cand.d0 - count as f32 * self.layer_bonus;
            if count > 2 {
                quality -= self.multi_layer_bonus;
            }
            let top = ctx.top_point(cand);
            ranking.offer(self.candidate(ctx, cand, bottom, top), quality);
        }
    }

    fn candidate(
        &self,
        ctx: &PairContext<'_>,
        cand: &CurvatureCandidate,
        bottom: &SeedPoint,
        top: &SeedPoint,
    ) -> SeedCandidate {
        let top_link = &ctx.tops[cand.top];
        let pt = 1.0 / (ctx.k * cand.curvature.abs().max(f32::MIN_POSITIVE));
        SeedCandidate {
            bottom: ctx.bottom.point,
            central: ctx.central,
            top: top_link.point,
            bottom_subsystem: bottom.subsystem,
            top_subsystem: top.subsystem,
            z_vertex: ctx.z_vertex,
            estimate: SeedEstimate {
                d0: cand.d0,
                curvature: cand.curvature,
                pt,
                eta: dzdr_to_eta(ctx.bottom.tz),
                dzdr_bottom: ctx.bottom.dzdr,
                dzdr_top: top_link.dzdr,
            },
        }
    }
}

/// Large-impact running: mixes the seed score with how far the seed
/// direction is from the direction to its point of closest approach.
fn blend_direction_term(quality: f32, d0: f32, bottom: &SeedPoint, top: &SeedPoint) -> f32 {
    let dr = top.radius - bottom.radius;
    let dz = top.z - bottom.z;
    let (z_closest, theta_seed) = if dr.abs() > 1e-8 {
        (bottom.z - (bottom.radius - quality) * (dz / dr), dr.atan2(dz))
    } else {
        (bottom.z, 0.0)
    };
    let eta_seed = pseudorapidity(theta_seed);
    let theta_closest = if d0 > 0.0 { d0.atan2(z_closest) } else { 0.0 };
    let eta_closest = pseudorapidity(theta_closest);

    let f = (quality / 200.0).min(0.5);
    quality * (1.0 - f) / 300.0 + f * (eta_seed - eta_closest).abs() / 2.5
}

#[inline]
fn pseudorapidity(theta: f32) -> f32 {
    if theta > 0.0 {
        -(0.5 * theta).tan().ln()
    } else {
        0.0
    }
}
