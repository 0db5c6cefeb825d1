//! Triplet search over one (φ, z) cell.
//!
//! Every point of the cell inside the central radius window acts as a central
//! point. Tops and bottoms are gathered from the neighbouring cells, each link
//! is fitted in the central point's conformal frame, and every bottom/top
//! combination passing the slope, momentum and impact cuts becomes a
//! curvature candidate. Candidates are scored per bottom point; the best seeds
//! of the central point are written out once all its bottoms are done.

use super::cuts::{exceeds_pt_curvature, impact_estimate, within_impact, VertexWindow};
use super::links::{Link, LinkBuilder, Side};
use crate::binning::PhiZGrid;
use crate::conditions::EventConstants;
use crate::finder::{MeanSlope, ScoringMode, SubsystemPolicy};
use crate::neighbours::NeighbourMap;
use crate::ranking::{CurvatureCandidate, PairContext, ScoreRules, SeedRanking};
use crate::space_point::{SeedPoint, SpacePointStore};
use crate::types::{Seed, SeedType, SpacePointId};

/// Candidates kept per bottom point before scoring.
pub const MAX_CANDIDATES_PER_BOTTOM: usize = 500;

/// Buffers reused across central points and cells.
#[derive(Debug, Default)]
pub struct TripletScratch {
    tops: Vec<Link>,
    bottoms: Vec<Link>,
    candidates: Vec<CurvatureCandidate>,
    /// Occupied neighbour cells with the index of their first viable point.
    top_cells: Vec<(usize, usize)>,
    bottom_cells: Vec<(usize, usize)>,
    ranking: SeedRanking,
}

/// Read-only configuration of one search pass.
#[derive(Clone, Debug)]
pub struct CellSearch<'a> {
    pub grid: &'a PhiZGrid,
    pub map: &'a NeighbourMap,
    pub policy: &'a SubsystemPolicy,
    pub rules: &'a ScoreRules,
    pub window: &'a VertexWindow,
    pub constants: EventConstants,
    pub dzdr_max: f32,
    /// Central points need `lo < r <= hi`.
    pub central_window: (f32, f32),
    pub confirmed_capacity: usize,
}

impl CellSearch<'_> {
    /// Searches every central point of `cell`; returns the number of seeds
    /// appended to `out`.
    pub fn run(
        &self,
        cell: usize,
        store: &mut SpacePointStore,
        scratch: &mut TripletScratch,
        out: &mut Vec<Seed>,
    ) -> usize {
        let centrals = self.grid.cell(cell);
        let (rt_min, rt_max) = self.central_window;
        let Some(first) = centrals.iter().position(|&id| store[id].radius > rt_min) else {
            return 0;
        };

        scratch.top_cells.clear();
        scratch.top_cells.extend(
            self.map
                .top(cell)
                .iter()
                .filter(|&&c| self.grid.is_occupied(c))
                .map(|&c| (c, 0)),
        );
        scratch.bottom_cells.clear();
        scratch.bottom_cells.extend(
            self.map
                .bottom(cell)
                .iter()
                .filter(|&&c| self.grid.is_occupied(c))
                .map(|&c| (c, 0)),
        );
        // Tops in the central cell start past the first central point.
        if let Some(own) = scratch.top_cells.iter_mut().find(|(c, _)| *c == cell) {
            own.1 = first + 1;
        }

        let mut emitted = 0;
        for &central_id in &centrals[first..] {
            let central = &store[central_id];
            if central.radius > rt_max {
                break;
            }
            if central.z.abs() > self.policy.z_max_central {
                continue;
            }
            if self.score_central(central_id, store, scratch) {
                emitted += flush(&scratch.ranking, store, out);
            }
        }
        emitted
    }

    /// Links, fits and ranks everything around one central point. Returns
    /// whether the ranking holds anything to flush.
    fn score_central(
        &self,
        central_id: SpacePointId,
        store: &SpacePointStore,
        scratch: &mut TripletScratch,
    ) -> bool {
        let central = &store[central_id];
        let policy = self.policy;
        let builder = LinkBuilder::new(central, policy, self.window, &self.constants, self.dzdr_max);

        scratch.tops.clear();
        for (cell, start) in scratch.top_cells.iter_mut() {
            let ids = self.grid.cell(*cell);
            while *start < ids.len()
                && builder.radial_gap(&store[ids[*start]], Side::Top) < policy.dr_min
            {
                *start += 1;
            }
            for &id in &ids[*start..] {
                let point = &store[id];
                let gap = builder.radial_gap(point, Side::Top);
                if policy.dr_max_top.is_some_and(|max| gap > max) {
                    break;
                }
                if gap < policy.dr_min {
                    continue;
                }
                if let Some(link) = builder.link(id, point, Side::Top) {
                    scratch.tops.push(link);
                }
            }
        }
        if scratch.tops.len() < policy.required_partners(central.radius) {
            return false;
        }

        scratch.bottoms.clear();
        for (cell, start) in scratch.bottom_cells.iter_mut() {
            let ids = self.grid.cell(*cell);
            while *start < ids.len()
                && builder.radial_gap(&store[ids[*start]], Side::Bottom) > policy.dr_max
            {
                *start += 1;
            }
            for &id in &ids[*start..] {
                let point = &store[id];
                if builder.radial_gap(point, Side::Bottom) < policy.dr_min {
                    break;
                }
                if let Some(link) = builder.link(id, point, Side::Bottom) {
                    scratch.bottoms.push(link);
                }
            }
        }
        if scratch.bottoms.is_empty() {
            return false;
        }

        let keep_confirmed = (policy.keep_confirmed
            && self.rules.mode == ScoringMode::SeedConfirmation)
            .then_some(self.rules.thresholds);
        scratch.ranking.reset(
            policy.max_seeds_per_point,
            self.confirmed_capacity,
            keep_confirmed,
        );

        for b in 0..scratch.bottoms.len() {
            let bottom = scratch.bottoms[b];
            self.collect_candidates(&bottom, central, &scratch.tops, &mut scratch.candidates);
            if scratch.candidates.len() < policy.required_partners(store[bottom.point].radius) {
                continue;
            }
            let ctx = PairContext {
                store,
                central: central_id,
                bottom: &bottom,
                tops: &scratch.tops,
                z_vertex: central.z - central.radius * bottom.tz,
                k: self.constants.k,
            };
            self.rules
                .score_pair(&ctx, &mut scratch.candidates, &mut scratch.ranking);
        }
        !scratch.ranking.is_empty()
    }

    /// Fits every top against `bottom` and keeps the combinations passing
    /// the slope-compatibility, momentum and impact cuts.
    fn collect_candidates(
        &self,
        bottom: &Link,
        central: &SeedPoint,
        tops: &[Link],
        out: &mut Vec<CurvatureCandidate>,
    ) {
        out.clear();
        let k = &self.constants;
        let tzb = bottom.tz;
        let rb2r = bottom.inv_dist * central.cov_r;
        let rb2z = bottom.inv_dist * central.cov_z;
        let tzb2 = 1.0 + tzb * tzb;
        let s_tzb2 = tzb2.sqrt();
        let scatter_at_pt = tzb2 * k.cofk;
        let scatter_min_pt = tzb2 * k.ipt2c;

        for (t, top) in tops.iter().enumerate() {
            let mean = match self.policy.mean_slope {
                MeanSlope::Geometric => tzb * top.tz,
                MeanSlope::Arithmetic => {
                    let m = 0.5 * (tzb + top.tz);
                    m * m
                }
            };
            let sigma = bottom.er
                + top.er
                + 2.0 * rb2z * top.inv_dist
                + 2.0 * rb2r * top.inv_dist * mean;
            let remaining = (tzb - top.tz) * (tzb - top.tz) - sigma;
            if remaining - scatter_min_pt > 0.0 {
                continue;
            }

            let du = top.u - bottom.u;
            if du == 0.0 {
                continue;
            }
            let a = (top.v - bottom.v) / du;
            let one_plus_a_sq = 1.0 + a * a;
            let b = bottom.v - a * bottom.u;
            let b_sq = b * b;
            if exceeds_pt_curvature(b_sq, one_plus_a_sq, k.ipt2k) {
                continue;
            }
            if remaining * one_plus_a_sq > b_sq * scatter_at_pt {
                continue;
            }

            let d0 = impact_estimate(a, b, central.radius);
            if !within_impact(d0, self.policy.max_impact) {
                continue;
            }
            let closest = bottom.inv_dist.min(top.inv_dist);
            out.push(CurvatureCandidate {
                curvature: b / one_plus_a_sq.sqrt(),
                top: t,
                d0,
                penalty: ((tzb - top.tz) / (closest * s_tzb2)).abs(),
            });
            if out.len() == MAX_CANDIDATES_PER_BOTTOM {
                break;
            }
        }
    }
}

/// Writes out the ranked seeds of a central point, best first. A seed is
/// kept only if it improves the quality of at least one of its points.
fn flush(ranking: &SeedRanking, store: &mut SpacePointStore, out: &mut Vec<Seed>) -> usize {
    let mut emitted = 0;
    for entry in ranking.entries() {
        let c = &entry.candidate;
        let mut improved = false;
        for id in [c.bottom, c.central, c.top] {
            improved |= store.get_mut(id).improve_quality(entry.quality);
        }
        if !improved {
            continue;
        }
        out.push(Seed {
            bottom: c.bottom,
            central: c.central,
            top: c.top,
            z_vertex: c.z_vertex,
            quality: entry.quality,
            seed_type: SeedType::classify(
                c.bottom_subsystem,
                store[c.central].subsystem,
                c.top_subsystem,
            ),
            estimate: c.estimate,
        });
        emitted += 1;
    }
    emitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::{z_region, PhiBinning, RadialBins};
    use crate::conditions::{BeamFrame, MagneticField};
    use crate::finder::SeedFinderParams;
    use crate::types::{RawSpacePoint, Subsystem};
    use nalgebra::Vector3;

    struct Fixture {
        store: SpacePointStore,
        grid: PhiZGrid,
        phi: PhiBinning,
        map: NeighbourMap,
        policy: SubsystemPolicy,
        rules: ScoreRules,
        window: VertexWindow,
        constants: EventConstants,
    }

    impl Fixture {
        fn new(params: &SeedFinderParams, radii: &[f64]) -> Self {
            let frame = BeamFrame::default();
            let mut store = SpacePointStore::new();
            let mut radial = RadialBins::new(2.0, 1100.0);
            for (i, &r) in radii.iter().enumerate() {
                let raw = RawSpacePoint::pixel(Vector3::new(r, 0.0, 0.0), [0.0, 0.0], i as u64, i as u64);
                let id = store.add(&raw, i, &frame, None).unwrap();
                radial.insert(id, store[id].radius);
            }
            let phi = PhiBinning::legacy(params.cuts.pt_min);
            let mut grid = PhiZGrid::new();
            grid.fill_from(&radial, &store, &phi);
            let field = MagneticField::default();
            let inv = 1.0 / params.cuts.pt_min;
            Self {
                store,
                grid,
                map: NeighbourMap::build(phi.max_phi_bin(), Subsystem::Pixel),
                phi,
                policy: SubsystemPolicy::pixel(params),
                rules: ScoreRules::from_params(params),
                window: VertexWindow::new(-250.0, 250.0, 5.0, 0.02),
                constants: EventConstants::new(field, inv * inv, params.cuts.scattering_coefficient),
            }
        }

        fn run(&mut self, central_window: (f32, f32)) -> Vec<Seed> {
            let search = CellSearch {
                grid: &self.grid,
                map: &self.map,
                policy: &self.policy,
                rules: &self.rules,
                window: &self.window,
                constants: self.constants,
                dzdr_max: 7.4,
                central_window,
                confirmed_capacity: 50,
            };
            let cell = PhiZGrid::cell_index(self.phi.bin(0.0), z_region(0.0));
            let mut scratch = TripletScratch::default();
            let mut out = Vec::new();
            let n = search.run(cell, &mut self.store, &mut scratch, &mut out);
            assert_eq!(n, out.len());
            out
        }
    }

    #[test]
    fn central_needs_enough_top_links() {
        let params = SeedFinderParams::default();
        assert_eq!(params.pixel.min_top_links, 2);
        let mut single = Fixture::new(&params, &[30.0, 70.0, 110.0]);
        assert!(single.run((40.0, 100.0)).is_empty());

        let mut double = Fixture::new(&params, &[30.0, 70.0, 110.0, 130.0]);
        let seeds = double.run((40.0, 100.0));
        assert!(!seeds.is_empty());
        assert!(seeds.iter().all(|s| s.central == SpacePointId(1)));
        // Both tops confirm each other.
        assert!(seeds[0].quality < params.pixel.score_bonus - 1.0);
    }

    #[test]
    fn central_window_is_open_below_and_closed_above() {
        let mut params = SeedFinderParams::default();
        params.pixel.min_top_links = 1;
        let mut fx = Fixture::new(&params, &[30.0, 70.0, 110.0]);
        assert!(fx.run((70.0, 100.0)).is_empty());

        let mut fx = Fixture::new(&params, &[30.0, 70.0, 110.0]);
        assert_eq!(fx.run((69.0, 70.0)).len(), 1);
    }

    #[test]
    fn flushed_seeds_lower_point_qualities() {
        let mut params = SeedFinderParams::default();
        params.pixel.min_top_links = 1;
        let mut fx = Fixture::new(&params, &[30.0, 70.0, 110.0]);
        let seeds = fx.run((40.0, 100.0));
        assert_eq!(seeds.len(), 1);
        for id in seeds[0].points() {
            assert_eq!(fx.store[id].quality(), seeds[0].quality);
        }
        // A second pass over the same cell produces the same seed again:
        // equal quality still counts as an improvement.
        assert_eq!(fx.run((40.0, 100.0)).len(), 1);
    }
}
