mod common;

use common::init_logging;
use common::synthetic_event::{circle_through_origin, displaced_circle, pixel};
use si_seed_finder::finder::SearchStatus;
use si_seed_finder::{
    BeamConditions, MagneticField, Seed, SeedFinder, SeedFinderParams, SeedType, SeedingPass,
    SpacePointId,
};

fn params(max_impact: f32) -> SeedFinderParams {
    let mut params = SeedFinderParams::default();
    params.cuts.pt_min = 200.0;
    params.cuts.max_impact = max_impact;
    params.pixel.min_top_links = 1;
    params.pixel.score_bonus = 0.0;
    params
}

fn run(finder: &SeedFinder, points: &[si_seed_finder::RawSpacePoint]) -> Vec<Seed> {
    let mut session = finder.new_session();
    finder.new_event(
        &mut session,
        &BeamConditions::default(),
        MagneticField::Solenoid { bz_kilotesla: 0.002 },
        SeedingPass::Pixel,
    );
    assert_eq!(finder.add_space_points(&mut session, points), points.len());
    finder.find_3sp(&mut session, &[]);
    let seeds: Vec<Seed> = finder.seeds(&mut session).collect();
    assert_eq!(session.status(), SearchStatus::Finished);
    seeds
}

#[test]
fn helix_through_origin_gives_one_seed_scored_by_impact() {
    init_logging();
    let finder = SeedFinder::new(params(2.0));
    let points = circle_through_origin(400.0, &[30.0, 70.0, 110.0], 0);
    let seeds = run(&finder, &points);

    assert_eq!(seeds.len(), 1, "seeds: {seeds:?}");
    let seed = seeds[0];
    assert_eq!(
        seed.points(),
        [SpacePointId(0), SpacePointId(1), SpacePointId(2)]
    );
    assert_eq!(seed.seed_type, SeedType::Ppp);
    assert!(seed.quality.abs() < 1e-3, "quality={}", seed.quality);
    assert!(seed.estimate.d0 < 1e-3);
    // R = 400 mm in 2 T is about 240 MeV.
    assert!((seed.estimate.pt - 240.0).abs() < 1.0, "pt={}", seed.estimate.pt);
}

#[test]
fn helix_below_momentum_threshold_is_rejected() {
    init_logging();
    let mut p = params(2.0);
    p.cuts.pt_min = 300.0;
    let finder = SeedFinder::new(p);
    let points = circle_through_origin(400.0, &[30.0, 70.0, 110.0], 0);
    assert!(run(&finder, &points).is_empty());
}

#[test]
fn helix_exactly_at_momentum_threshold_is_kept() {
    init_logging();
    // R = 400 mm in 2 T is 240 MeV.
    let points = circle_through_origin(400.0, &[30.0, 70.0, 110.0], 0);
    for (pt_min, expected) in [(239.0, 1), (240.0, 1), (240.5, 0)] {
        let mut p = params(2.0);
        p.cuts.pt_min = pt_min;
        let seeds = run(&SeedFinder::new(p), &points);
        assert_eq!(seeds.len(), expected, "pt_min={pt_min} seeds={seeds:?}");
    }
}

#[test]
fn zero_impact_window_keeps_exact_track_and_drops_steep_point() {
    init_logging();
    let mut p = params(0.0);
    p.cuts.eta_max = 1.0;
    let finder = SeedFinder::new(p);
    // sinh(1) ≈ 1.18; the extra point leaves the central one at dz/dr ≈ 1.5.
    let mut points = circle_through_origin(400.0, &[30.0, 70.0, 110.0], 0);
    points.push(pixel(110.0, 15.0, 60.0, 3));
    let seeds = run(&finder, &points);

    assert_eq!(seeds.len(), 1, "seeds: {seeds:?}");
    assert_eq!(
        seeds[0].points(),
        [SpacePointId(0), SpacePointId(1), SpacePointId(2)]
    );
    assert!(seeds[0].estimate.d0 < 1e-4, "d0={}", seeds[0].estimate.d0);
}

#[test]
fn impact_bound_is_applied_to_the_fitted_triplet() {
    init_logging();
    // Nearly straight track (6 GeV) missing the beam line by 1 mm.
    let points = displaced_circle(10_000.0, 1.0, &[30.0, 70.0, 110.0], 0);
    for (max_impact, expected) in [(0.95, 0), (1.0, 1), (1.05, 1)] {
        let seeds = run(&SeedFinder::new(params(max_impact)), &points);
        assert_eq!(seeds.len(), expected, "max_impact={max_impact} seeds={seeds:?}");
        if let Some(seed) = seeds.first() {
            assert!((seed.estimate.d0 - 1.0).abs() < 1e-3, "d0={}", seed.estimate.d0);
            assert!((seed.quality - seed.estimate.d0).abs() < 1e-3);
        }
    }
}

#[test]
fn seeds_per_central_point_are_bounded() {
    init_logging();
    let mut p = params(2.0);
    p.pixel.max_seeds_per_point = 3;
    p.pixel.keep_confirmed = false;
    let finder = SeedFinder::new(p);

    let mut points = vec![pixel(30.0, 0.0, 0.0, 0), pixel(70.0, 0.0, 0.0, 1)];
    for i in 0..10 {
        points.push(pixel(110.0 + 5.0 * i as f64, 0.0, 0.0, 2 + i));
    }
    let seeds = run(&finder, &points);
    assert!(!seeds.is_empty());

    let mut per_central = std::collections::HashMap::new();
    for seed in &seeds {
        *per_central.entry(seed.central).or_insert(0usize) += 1;
    }
    assert!(per_central.values().all(|&n| n <= 3), "{per_central:?}");
    assert_eq!(per_central.get(&SpacePointId(1)), Some(&3));

    // Confirmed seeds: two tops on different surfaces and radii agree.
    let first = seeds
        .iter()
        .find(|s| s.central == SpacePointId(1))
        .expect("central at 70 mm seeds");
    assert!(first.quality < -1.0, "quality={}", first.quality);
}

#[test]
fn empty_and_sparse_events_finish_without_seeds() {
    init_logging();
    let finder = SeedFinder::new(params(2.0));
    assert!(run(&finder, &[]).is_empty());
    assert!(run(&finder, &[pixel(30.0, 0.0, 0.0, 0), pixel(70.0, 0.0, 0.0, 1)]).is_empty());
}
