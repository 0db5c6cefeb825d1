//! Seed finder driving one event end-to-end.
//!
//! The [`SeedFinder`] exposes a pull API: open an event, feed space points,
//! start the search and drain seeds one at a time. Internally it bins the
//! points, walks the (φ, z) grid in the pass order, runs the per-cell triplet
//! search and hands out the ranked seeds. When the output buffer reaches
//! `max_seeds` the search pauses after the current φ bin and resumes
//! transparently once the buffered seeds have been consumed.
//!
//! Typical usage:
//! ```no_run
//! use si_seed_finder::{BeamConditions, MagneticField, RawSpacePoint, SeedFinder};
//! use si_seed_finder::{SeedFinderParams, SeedingPass};
//!
//! # fn example(points: Vec<RawSpacePoint>) {
//! let finder = SeedFinder::new(SeedFinderParams::default());
//! let mut session = finder.new_session();
//! finder.new_event(
//!     &mut session,
//!     &BeamConditions::default(),
//!     MagneticField::default(),
//!     SeedingPass::Pixel,
//! );
//! finder.add_space_points(&mut session, &points);
//! finder.find_3sp(&mut session, &[]);
//! while let Some(seed) = finder.next(&mut session) {
//!     println!("z0={:.1} quality={:.2}", seed.z_vertex, seed.quality);
//! }
//! # }
//! ```
use super::event::EventInput;
use super::params::SeedFinderParams;
use super::policy::{SeedingPass, SubsystemPolicy};
use super::session::{SearchCursor, SearchStatus, SeedingSession};
use crate::angle::eta_to_dzdr;
use crate::binning::{PhiBinning, PhiZGrid};
use crate::conditions::{BeamConditions, BeamFrame, EventConstants, MagneticField};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{SeedingReport, SeedingStage, TimingBreakdown};
use crate::neighbours::NeighbourMap;
use crate::ranking::ScoreRules;
use crate::search::CellSearch;
use crate::space_point::{EtaPrefilter, SpacePointStore};
use crate::types::{RawSpacePoint, Seed, SpacePointId, Subsystem};
use log::{debug, warn};
use std::time::Instant;

/// Fewest binned points a search needs to form a triplet.
const MIN_POINTS_FOR_SEARCH: usize = 3;

/// Binning and search policy of one pass, fixed for the finder's lifetime.
#[derive(Clone, Debug)]
struct PassSetup {
    phi: PhiBinning,
    map: NeighbourMap,
    policy: SubsystemPolicy,
}

impl PassSetup {
    fn new(phi: PhiBinning, policy: SubsystemPolicy) -> Self {
        let map = NeighbourMap::build(phi.max_phi_bin(), policy.layout);
        Self { phi, map, policy }
    }
}

/// Triplet seed finder. Immutable once built; all per-event state lives in
/// a [`SeedingSession`].
#[derive(Clone, Debug)]
pub struct SeedFinder {
    params: SeedFinderParams,
    inv_pt_min_sq: f32,
    dzdr_min: f32,
    dzdr_max: f32,
    rules: ScoreRules,
    pixel: PassSetup,
    strip: PassSetup,
}

impl SeedFinder {
    /// Create a finder; `params` are normalized first.
    pub fn new(params: SeedFinderParams) -> Self {
        let params = params.normalized();
        let cuts = &params.cuts;
        let binning = &params.binning;

        let (pixel_phi, strip_phi) = if binning.optimise_phi_binning {
            (
                PhiBinning::optimised(
                    cuts.pt_min,
                    cuts.max_impact,
                    binning.pixel_sweep_r_min,
                    binning.pixel_sweep_r_max,
                ),
                PhiBinning::optimised(
                    cuts.pt_min,
                    cuts.max_impact_sss,
                    params.strip.sweep_r_min,
                    params.strip.sweep_r_max,
                ),
            )
        } else {
            (PhiBinning::legacy(cuts.pt_min), PhiBinning::legacy(cuts.pt_min))
        };
        let pixel = PassSetup::new(pixel_phi, SubsystemPolicy::pixel(&params));
        let strip = PassSetup::new(strip_phi, SubsystemPolicy::strip(&params));

        let inv_pt_min = 1.0 / cuts.pt_min;
        let dzdr_min = eta_to_dzdr(cuts.eta_min as f64) as f32;
        let dzdr_max = eta_to_dzdr(cuts.eta_max as f64) as f32;
        if dzdr_max <= dzdr_min {
            warn!(
                "SeedFinder: empty pseudorapidity acceptance eta=[{}, {}]",
                cuts.eta_min, cuts.eta_max
            );
        }
        debug!(
            "SeedFinder::new pt_min={} max_impact={}/{} phi_bins pixel={} strip={} max_seeds={}",
            cuts.pt_min,
            cuts.max_impact,
            cuts.max_impact_sss,
            pixel.phi.bin_count(),
            strip.phi.bin_count(),
            params.max_seeds
        );

        Self {
            rules: ScoreRules::from_params(&params),
            inv_pt_min_sq: inv_pt_min * inv_pt_min,
            dzdr_min,
            dzdr_max,
            pixel,
            strip,
            params,
        }
    }

    /// Normalized parameters in use.
    pub fn params(&self) -> &SeedFinderParams {
        &self.params
    }

    /// Fresh working set sized for this finder.
    pub fn new_session(&self) -> SeedingSession {
        SeedingSession::new(&self.params, self.inv_pt_min_sq)
    }

    pub fn policy(&self, pass: SeedingPass) -> &SubsystemPolicy {
        &self.setup(pass).policy
    }

    pub fn phi_binning(&self, pass: SeedingPass) -> &PhiBinning {
        &self.setup(pass).phi
    }

    pub fn neighbour_map(&self, pass: SeedingPass) -> &NeighbourMap {
        &self.setup(pass).map
    }

    fn setup(&self, pass: SeedingPass) -> &PassSetup {
        match pass.layout() {
            Subsystem::Pixel => &self.pixel,
            Subsystem::Strip => &self.strip,
        }
    }

    /// Opens a new event: clears the session, fixes the beam frame and the
    /// momentum constants, and selects the points the pass admits.
    pub fn new_event(
        &self,
        session: &mut SeedingSession,
        beam: &BeamConditions,
        field: MagneticField,
        pass: SeedingPass,
    ) {
        let cuts = &self.params.cuts;
        session.reset_event(pass);
        session.frame = BeamFrame::from_conditions(beam);
        session.constants =
            EventConstants::new(field, self.inv_pt_min_sq, cuts.scattering_coefficient);
        session.prefilter = (self.dzdr_min > 1.0).then_some(EtaPrefilter {
            z_max: cuts.z_max,
            dzdr_min: self.dzdr_min,
        });
        session.window.z_min = cuts.z_min;
        session.window.z_max = cuts.z_max;
        debug!(
            "SeedFinder::new_event pass={:?} K={:.6} prefilter={}",
            pass,
            session.constants.k,
            session.prefilter.is_some()
        );
    }

    /// Adds one point to the current event. Returns its id, or `None` when
    /// the pass, the radius range or the pseudorapidity pre-filter rejects it.
    pub fn add_space_point(
        &self,
        session: &mut SeedingSession,
        raw: &RawSpacePoint,
    ) -> Option<SpacePointId> {
        let source = session.summary.offered;
        session.summary.offered += 1;
        if !session.pass.admits(raw.subsystem()) {
            return None;
        }
        let r = raw.transverse_radius() as f32;
        if r < self.params.cuts.r_min || r > self.params.cuts.r_max {
            return None;
        }
        let id = session
            .store
            .add(raw, source, &session.frame, session.prefilter.as_ref())?;
        session.radial.insert(id, session.store[id].radius);
        session.summary.stored += 1;
        Some(id)
    }

    /// Adds a batch of points; returns how many were accepted.
    pub fn add_space_points(&self, session: &mut SeedingSession, raws: &[RawSpacePoint]) -> usize {
        raws.iter()
            .filter(|raw| self.add_space_point(session, raw).is_some())
            .count()
    }

    /// Installs the vertex list of the event. A non-empty list narrows the
    /// longitudinal window to the vertices plus a margin, clamped to the
    /// configured window. Returns whether the list changed.
    pub fn new_vertices(&self, session: &mut SeedingSession, vertices: &[f32]) -> bool {
        let mut sorted: Vec<f32> = vertices.iter().copied().filter(|z| z.is_finite()).collect();
        sorted.sort_by(f32::total_cmp);
        sorted.dedup();

        let changed = sorted != session.window.vertices;
        let cuts = &self.params.cuts;
        let margin = self.params.vertex.window_margin;
        let (z_min, z_max) = match (sorted.first(), sorted.last()) {
            (Some(&first), Some(&last)) => (
                (first - margin).max(cuts.z_min),
                (last + margin).min(cuts.z_max),
            ),
            _ => (cuts.z_min, cuts.z_max),
        };
        session.window.z_min = z_min;
        session.window.z_max = z_max;
        session.window.vertices = sorted;
        changed
    }

    /// Bins the event and starts the triplet search. Seeds are then read
    /// with [`next`](Self::next) or [`seeds`](Self::seeds).
    pub fn find_3sp(&self, session: &mut SeedingSession, vertices: &[f32]) -> SearchStatus {
        self.start_search(session, vertices, None)
    }

    /// Like [`find_3sp`](Self::find_3sp) with the longitudinal window
    /// narrowed to `z_window`, clamped to the configured one.
    pub fn find_3sp_in_window(
        &self,
        session: &mut SeedingSession,
        vertices: &[f32],
        z_window: (f32, f32),
    ) -> SearchStatus {
        self.start_search(session, vertices, Some(z_window))
    }

    fn start_search(
        &self,
        session: &mut SeedingSession,
        vertices: &[f32],
        z_window: Option<(f32, f32)>,
    ) -> SearchStatus {
        self.new_vertices(session, vertices);
        if let Some((a, b)) = z_window {
            let cuts = &self.params.cuts;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            session.window.z_min = lo.max(cuts.z_min);
            session.window.z_max = hi.min(cuts.z_max);
        }

        let setup = self.setup(session.pass);
        let outcome = session
            .grid
            .fill_from(&session.radial, &session.store, &setup.phi);
        session.central_window = match outcome.radial_range {
            Some((first, last)) => setup.policy.central_window(
                session.radial.lower_edge(first),
                session.radial.lower_edge(last),
                outcome.saw_endcap,
                self.params.large_impact,
            ),
            None => (0.0, 0.0),
        };

        let summary = &mut session.summary;
        summary.binned = outcome.binned;
        summary.occupied_cells = session.grid.occupied_cells().len();
        summary.azimuthal_bins = setup.phi.bin_count();
        summary.central_window = outcome.radial_range.map(|_| session.central_window);
        debug!(
            "SeedFinder::find_3sp pass={:?} binned={} cells={} window=({:.1}, {:.1}] z0=[{:.1}, {:.1}] vertices={}",
            session.pass,
            outcome.binned,
            summary.occupied_cells,
            session.central_window.0,
            session.central_window.1,
            session.window.z_min,
            session.window.z_max,
            session.window.vertices.len()
        );

        session.cursor = SearchCursor {
            next_phi_bin: 0,
            status: SearchStatus::Paused,
        };
        self.production_3sp(session)
    }

    /// Runs the search from the cursor until either every φ bin is done or
    /// `max_seeds` seeds are buffered at the end of a φ bin. The output
    /// buffer is cleared first.
    fn production_3sp(&self, session: &mut SeedingSession) -> SearchStatus {
        session.seeds.clear();
        session.read = 0;
        if session.cursor.status != SearchStatus::Paused {
            return session.cursor.status;
        }
        if session.grid.binned_count() < MIN_POINTS_FOR_SEARCH {
            session.cursor.status = SearchStatus::Finished;
            return SearchStatus::Finished;
        }

        let start = Instant::now();
        let setup = self.setup(session.pass);
        let SeedingSession {
            grid,
            store,
            window,
            constants,
            central_window,
            cursor,
            seeds,
            scratch,
            summary,
            ..
        } = session;
        let search = CellSearch {
            grid: &*grid,
            map: &setup.map,
            policy: &setup.policy,
            rules: &self.rules,
            window: &*window,
            constants: *constants,
            dzdr_max: self.dzdr_max,
            central_window: *central_window,
            confirmed_capacity: self.params.scoring.confirmed_capacity,
        };

        let max_phi_bin = setup.phi.max_phi_bin();
        let mut phi_bin = cursor.next_phi_bin;
        let mut status = SearchStatus::Finished;
        let mut emitted = 0;
        let mut vetoed = 0;
        while phi_bin <= max_phi_bin {
            let bin_start = seeds.len();
            for &z in &setup.policy.z_order {
                let cell = PhiZGrid::cell_index(phi_bin, z);
                if grid.is_occupied(cell) {
                    emitted += search.run(cell, store, scratch, seeds);
                }
            }
            let dropped = drop_outclassed_mixed(store, seeds, bin_start);
            emitted -= dropped;
            vetoed += dropped;
            phi_bin += 1;
            if emitted >= self.params.max_seeds && phi_bin <= max_phi_bin {
                status = SearchStatus::Paused;
                break;
            }
        }

        *cursor = SearchCursor {
            next_phi_bin: phi_bin,
            status,
        };
        summary.production_calls += 1;
        summary.seeds_produced += emitted;
        summary.seeds_vetoed += vetoed;
        if status == SearchStatus::Paused {
            summary.pauses += 1;
        }
        debug!(
            "SeedFinder::production_3sp emitted={} vetoed={} status={:?} next_phi_bin={} elapsed_ms={:.3}",
            emitted,
            vetoed,
            status,
            phi_bin,
            elapsed_ms(start)
        );
        status
    }

    /// Next seed of the event, resuming a paused search when the buffer runs
    /// dry. Returns `None` once the search is exhausted; further calls keep
    /// returning `None` until the next `find_3sp`.
    pub fn next(&self, session: &mut SeedingSession) -> Option<Seed> {
        loop {
            if let Some(seed) = session.seeds.get(session.read).copied() {
                session.read += 1;
                session.summary.seeds_returned += 1;
                return Some(seed);
            }
            if session.cursor.status != SearchStatus::Paused {
                return None;
            }
            self.production_3sp(session);
        }
    }

    /// Iterator over the remaining seeds of the event.
    pub fn seeds<'a>(&'a self, session: &'a mut SeedingSession) -> Seeds<'a> {
        Seeds {
            finder: self,
            session,
        }
    }

    /// Seeds a complete event and returns the seeds with diagnostics.
    pub fn run_event(&self, session: &mut SeedingSession, event: &EventInput) -> SeedingReport {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let fill_start = Instant::now();
        self.new_event(session, &event.beam, event.field, event.pass);
        self.add_space_points(session, &event.space_points);
        timings.record(SeedingStage::Fill, fill_start);

        let search_start = Instant::now();
        match event.z_window {
            Some(window) => self.find_3sp_in_window(session, &event.vertices, window),
            None => self.find_3sp(session, &event.vertices),
        };
        timings.record(SeedingStage::Search, search_start);

        let drain_start = Instant::now();
        let seeds: Vec<Seed> = self.seeds(session).collect();
        timings.record(SeedingStage::Drain, drain_start);
        timings.total_ms = elapsed_ms(total_start);

        debug!(
            "SeedFinder::run_event event={} seeds={} total_ms={:.3}",
            event.event_number,
            seeds.len(),
            timings.total_ms
        );
        SeedingReport {
            event_number: event.event_number,
            seeds,
            summary: session.summary.clone(),
            timings,
        }
    }
}

/// Seeds whose bottom and top come from different subsystems are dropped
/// when every one of their points already carries a better seed.
fn is_outclassed_mixed(store: &SpacePointStore, seed: &Seed) -> bool {
    let (bottom, central, top) = (&store[seed.bottom], &store[seed.central], &store[seed.top]);
    bottom.subsystem != top.subsystem
        && seed.quality > bottom.quality()
        && seed.quality > central.quality()
        && seed.quality > top.quality()
}

/// Removes outclassed mixed seeds from `seeds[from..]`, keeping the order of
/// the rest. Runs once per finished φ bin, so the point qualities it reads do
/// not depend on where a search paused. Returns how many were removed.
fn drop_outclassed_mixed(store: &SpacePointStore, seeds: &mut Vec<Seed>, from: usize) -> usize {
    let mut kept = from;
    for i in from..seeds.len() {
        if !is_outclassed_mixed(store, &seeds[i]) {
            seeds.swap(kept, i);
            kept += 1;
        }
    }
    let dropped = seeds.len() - kept;
    seeds.truncate(kept);
    dropped
}

/// Iterator returned by [`SeedFinder::seeds`].
pub struct Seeds<'a> {
    finder: &'a SeedFinder,
    session: &'a mut SeedingSession,
}

impl Iterator for Seeds<'_> {
    type Item = Seed;

    fn next(&mut self) -> Option<Seed> {
        self.finder.next(self.session)
    }
}
