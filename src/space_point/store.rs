//! Append-only space-point arena.
//!
//! Slots written during a previous event are overwritten in place before the
//! arena grows, so a long-lived session settles at the size of its busiest
//! event.

use super::point::SeedPoint;
use crate::conditions::BeamFrame;
use crate::types::{RawSpacePoint, SpacePointId};
use std::ops::Index;

/// Coarse pseudorapidity gate applied when a minimum |dz/dr| above one is
/// configured: points that no track from the luminous region could reach
/// within the acceptance are dropped on entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EtaPrefilter {
    pub z_max: f32,
    pub dzdr_min: f32,
}

impl EtaPrefilter {
    pub fn accepts(&self, point: &SeedPoint) -> bool {
        let dz = point.z.abs() + self.z_max;
        let x = point.x * self.dzdr_min;
        let y = point.y * self.dzdr_min;
        dz * dz >= x * x + y * y
    }
}

#[derive(Debug, Default)]
pub struct SpacePointStore {
    slots: Vec<SeedPoint>,
    len: usize,
}

impl SpacePointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets all points; allocated slots stay for reuse.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Converts `raw` into the beam frame and appends it. Returns `None` when
    /// the pre-filter rejects the point.
    pub fn add(
        &mut self,
        raw: &RawSpacePoint,
        source: usize,
        frame: &BeamFrame,
        prefilter: Option<&EtaPrefilter>,
    ) -> Option<SpacePointId> {
        let point = SeedPoint::from_raw(raw, source, frame);
        if let Some(filter) = prefilter {
            if !filter.accepts(&point) {
                return None;
            }
        }
        let id = SpacePointId(self.len as u32);
        if self.len < self.slots.len() {
            self.slots[self.len] = point;
        } else {
            self.slots.push(point);
        }
        self.len += 1;
        Some(id)
    }

    #[inline]
    pub fn get(&self, id: SpacePointId) -> Option<&SeedPoint> {
        self.points().get(id.index())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SpacePointId) -> &mut SeedPoint {
        &mut self.slots[..self.len][id.index()]
    }

    #[inline]
    pub fn points(&self) -> &[SeedPoint] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = (SpacePointId, &SeedPoint)> {
        self.points()
            .iter()
            .enumerate()
            .map(|(i, p)| (SpacePointId(i as u32), p))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots allocated so far, across events.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

impl Index<SpacePointId> for SpacePointStore {
    type Output = SeedPoint;

    #[inline]
    fn index(&self, id: SpacePointId) -> &SeedPoint {
        &self.points()[id.index()]
    }
}
