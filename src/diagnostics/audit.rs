//! Per-seed audit records for offline validation.
//!
//! Each accepted seed can be dumped with its three points, its parameter
//! estimate and, when the caller knows it, the outcome of the track fit it
//! fed. Records are collected from any number of threads and written as one
//! JSON array.

use crate::error::SeedingError;
use crate::io::write_json_file;
use crate::space_point::{SeedPoint, SpacePointStore};
use crate::types::Seed;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// Outcome of the track fit seeded by a triplet.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSummary {
    pub pt: f32,
    pub eta: f32,
}

/// Beam-frame coordinates of one seed point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
}

impl From<&SeedPoint> for AuditPoint {
    fn from(p: &SeedPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            z: p.z,
            r: p.radius,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedAuditRecord {
    pub event_number: u64,
    pub d0: f32,
    pub z0: f32,
    pub pt: f32,
    pub eta: f32,
    pub bottom: AuditPoint,
    pub central: AuditPoint,
    pub top: AuditPoint,
    pub quality: f32,
    /// Integer seed type, see [`SeedType::code`](crate::types::SeedType::code).
    pub seed_type: u8,
    pub gives_track: bool,
    pub dzdr_bottom: f32,
    pub dzdr_top: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_pt: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_eta: Option<f32>,
}

impl SeedAuditRecord {
    /// Builds a record from a seed of the event whose points live in `store`.
    /// Returns `None` if the seed refers to points the store no longer holds.
    pub fn from_seed(
        event_number: u64,
        seed: &Seed,
        store: &SpacePointStore,
        track: Option<TrackSummary>,
    ) -> Option<Self> {
        let bottom = store.get(seed.bottom)?;
        let central = store.get(seed.central)?;
        let top = store.get(seed.top)?;
        Some(Self {
            event_number,
            d0: seed.estimate.d0,
            z0: seed.z_vertex,
            pt: seed.estimate.pt,
            eta: seed.estimate.eta,
            bottom: bottom.into(),
            central: central.into(),
            top: top.into(),
            quality: seed.quality,
            seed_type: seed.seed_type.code(),
            gives_track: track.is_some(),
            dzdr_bottom: seed.estimate.dzdr_bottom,
            dzdr_top: seed.estimate.dzdr_top,
            track_pt: track.map(|t| t.pt),
            track_eta: track.map(|t| t.eta),
        })
    }
}

/// Thread-safe collector of audit records.
#[derive(Debug, Default)]
pub struct SeedAuditLog {
    records: Mutex<Vec<SeedAuditRecord>>,
}

impl SeedAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: SeedAuditRecord) {
        match self.records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }

    pub fn len(&self) -> usize {
        match self.records.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records sorted by event number, then quality, then point positions,
    /// so the order does not depend on which worker recorded first.
    pub fn snapshot(&self) -> Vec<SeedAuditRecord> {
        let mut records = match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        records.sort_by(|a, b| {
            a.event_number
                .cmp(&b.event_number)
                .then(a.quality.total_cmp(&b.quality))
                .then_with(|| position_key(a).cmp(&position_key(b)))
        });
        records
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SeedingError> {
        write_json_file(path, &self.snapshot())
    }
}

fn position_key(record: &SeedAuditRecord) -> [u32; 9] {
    let [b, c, t] = [&record.bottom, &record.central, &record.top];
    [b.r, b.z, b.y, c.r, c.z, c.y, t.r, t.z, t.y].map(ordered_bits)
}

/// Maps an `f32` to a `u32` with the same total order.
fn ordered_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & 0x8000_0000 != 0 {
        !bits
    } else {
        bits | 0x8000_0000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::BeamFrame;
    use crate::types::{RawSpacePoint, SeedEstimate, SeedType, SpacePointId};
    use nalgebra::Vector3;

    fn store() -> SpacePointStore {
        let frame = BeamFrame::default();
        let mut store = SpacePointStore::new();
        for (i, r) in [40.0, 80.0, 120.0].into_iter().enumerate() {
            let raw = RawSpacePoint::pixel(Vector3::new(r, 0.0, 5.0), [0.0, 0.0], i as u64, 0);
            store.add(&raw, i, &frame, None);
        }
        store
    }

    fn seed(quality: f32) -> Seed {
        Seed {
            bottom: SpacePointId(0),
            central: SpacePointId(1),
            top: SpacePointId(2),
            z_vertex: 5.0,
            quality,
            seed_type: SeedType::Ppp,
            estimate: SeedEstimate {
                pt: 2000.0,
                ..SeedEstimate::default()
            },
        }
    }

    #[test]
    fn record_carries_points_and_track_outcome() {
        let store = store();
        let rec = SeedAuditRecord::from_seed(
            3,
            &seed(-10.0),
            &store,
            Some(TrackSummary { pt: 1900.0, eta: 0.1 }),
        )
        .expect("points present");
        assert!(rec.gives_track);
        assert_eq!(rec.seed_type, 0);
        assert!((rec.central.r - 80.0).abs() < 1e-4);
        assert_eq!(rec.track_pt, Some(1900.0));

        let missing = Seed {
            top: SpacePointId(9),
            ..seed(0.0)
        };
        assert!(SeedAuditRecord::from_seed(3, &missing, &store, None).is_none());
    }

    #[test]
    fn log_collects_across_threads_and_sorts() {
        let store = store();
        let log = SeedAuditLog::new();
        std::thread::scope(|s| {
            for event in (0..4u64).rev() {
                let (log, store) = (&log, &store);
                s.spawn(move || {
                    for q in [5.0, -5.0] {
                        if let Some(rec) = SeedAuditRecord::from_seed(event, &seed(q), store, None) {
                            log.record(rec);
                        }
                    }
                });
            }
        });
        let records = log.snapshot();
        assert_eq!(records.len(), 8);
        assert_eq!(records[0].event_number, 0);
        assert_eq!(records[0].quality, -5.0);
        assert_eq!(records[7].event_number, 3);
        let json = serde_json::to_string(&records[0]).unwrap();
        assert!(json.contains("\"givesTrack\":false"));
        // Same event and quality: ordered by position whatever the
        // recording order.
        let frame = BeamFrame::default();
        let mut shifted = SpacePointStore::new();
        for (i, r) in [30.0, 80.0, 120.0].into_iter().enumerate() {
            let raw = RawSpacePoint::pixel(Vector3::new(r, 0.0, 5.0), [0.0, 0.0], i as u64, 0);
            shifted.add(&raw, i, &frame, None);
        }
        for order in [[&store, &shifted], [&shifted, &store]] {
            let log = SeedAuditLog::new();
            for s in order {
                if let Some(rec) = SeedAuditRecord::from_seed(1, &seed(0.0), s, None) {
                    log.record(rec);
                }
            }
            let records = log.snapshot();
            assert_eq!(records[0].bottom.r, 30.0);
            assert_eq!(records[1].bottom.r, 40.0);
        }
        assert!(!json.contains("trackPt"));
    }
}
