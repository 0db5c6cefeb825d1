//! Per-thread working set of the seed finder.
//!
//! A [`SeedingSession`] owns everything that changes while an event is
//! processed: the point store, both binnings, the event constants, the
//! search cursor and the output seeds. The [`SeedFinder`](super::SeedFinder)
//! itself stays immutable, so one finder serves any number of sessions on
//! different threads. Buffers keep their capacity between events.

use super::params::SeedFinderParams;
use super::policy::SeedingPass;
use crate::binning::{PhiZGrid, RadialBins};
use crate::conditions::{BeamFrame, EventConstants, MagneticField};
use crate::diagnostics::SessionSummary;
use crate::search::{TripletScratch, VertexWindow};
use crate::space_point::{EtaPrefilter, SeedPoint, SpacePointStore};
use crate::types::{Seed, SpacePointId};

/// Where the search of the current event stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStatus {
    /// No search has run since the last `new_event`.
    #[default]
    Idle,
    /// The output capacity was reached; the next phi bin is pending.
    Paused,
    /// Every phi bin has been searched.
    Finished,
}

/// Resume point of a paused search. Pauses happen only between phi bins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchCursor {
    pub next_phi_bin: usize,
    pub status: SearchStatus,
}

pub struct SeedingSession {
    pub(crate) pass: SeedingPass,
    pub(crate) store: SpacePointStore,
    pub(crate) radial: RadialBins,
    pub(crate) grid: PhiZGrid,
    pub(crate) frame: BeamFrame,
    pub(crate) constants: EventConstants,
    pub(crate) prefilter: Option<EtaPrefilter>,
    pub(crate) window: VertexWindow,
    /// Central points need `lo < r <= hi`.
    pub(crate) central_window: (f32, f32),
    pub(crate) cursor: SearchCursor,
    pub(crate) seeds: Vec<Seed>,
    pub(crate) read: usize,
    pub(crate) scratch: TripletScratch,
    pub(crate) summary: SessionSummary,
}

impl SeedingSession {
    pub(crate) fn new(params: &SeedFinderParams, inv_pt_min_sq: f32) -> Self {
        let cuts = &params.cuts;
        Self {
            pass: SeedingPass::default(),
            store: SpacePointStore::new(),
            radial: RadialBins::new(params.binning.bin_size_r, cuts.r_max),
            grid: PhiZGrid::new(),
            frame: BeamFrame::default(),
            constants: EventConstants::new(
                MagneticField::default(),
                inv_pt_min_sq,
                cuts.scattering_coefficient,
            ),
            prefilter: None,
            window: VertexWindow::new(
                cuts.z_min,
                cuts.z_max,
                params.vertex.dz_ver,
                params.vertex.dzdr_ver,
            ),
            central_window: (0.0, 0.0),
            cursor: SearchCursor::default(),
            seeds: Vec::new(),
            read: 0,
            scratch: TripletScratch::default(),
            summary: SessionSummary::default(),
        }
    }

    /// Forgets the previous event; capacity is kept.
    pub(crate) fn reset_event(&mut self, pass: SeedingPass) {
        self.pass = pass;
        self.store.clear();
        self.radial.clear();
        self.grid.clear();
        self.window.vertices.clear();
        self.central_window = (0.0, 0.0);
        self.cursor = SearchCursor::default();
        self.seeds.clear();
        self.read = 0;
        self.summary = SessionSummary {
            pass,
            ..SessionSummary::default()
        };
    }

    pub fn pass(&self) -> SeedingPass {
        self.pass
    }

    pub fn space_point(&self, id: SpacePointId) -> Option<&SeedPoint> {
        self.store.get(id)
    }

    /// Points of the current event, indexable by the ids carried in seeds.
    pub fn space_points(&self) -> &SpacePointStore {
        &self.store
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn status(&self) -> SearchStatus {
        self.cursor.status
    }

    pub fn cursor(&self) -> SearchCursor {
        self.cursor
    }

    /// Seeds produced by the last production call and not yet returned.
    pub fn pending_seeds(&self) -> usize {
        self.seeds.len() - self.read
    }

    /// Longitudinal window currently applied to link extrapolations.
    pub fn z_window(&self) -> (f32, f32) {
        (self.window.z_min, self.window.z_max)
    }

    pub fn vertices(&self) -> &[f32] {
        &self.window.vertices
    }
}
