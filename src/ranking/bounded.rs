//! Bounded quality-ordered seed buffer for one central point.
//!
//! Entries stay sorted by quality (lower is better); entries of equal quality
//! keep insertion order. The buffer holds at most `capacity` seeds, except
//! that confirmed seeds may push it up to `confirmed_capacity` when
//! confirmed-seed retention is enabled.

use super::scoring::{ConfirmationThresholds, SeedCandidate};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedSeed {
    pub quality: f32,
    pub candidate: SeedCandidate,
}

#[derive(Clone, Debug, Default)]
pub struct SeedRanking {
    entries: Vec<RankedSeed>,
    capacity: usize,
    confirmed_capacity: usize,
    keep_confirmed: Option<ConfirmationThresholds>,
}

impl SeedRanking {
    pub fn new(
        capacity: usize,
        confirmed_capacity: usize,
        keep_confirmed: Option<ConfirmationThresholds>,
    ) -> Self {
        Self {
            entries: Vec::with_capacity(confirmed_capacity.max(capacity)),
            capacity,
            confirmed_capacity,
            keep_confirmed,
        }
    }

    /// Empties the buffer and applies new limits.
    pub fn reset(
        &mut self,
        capacity: usize,
        confirmed_capacity: usize,
        keep_confirmed: Option<ConfirmationThresholds>,
    ) {
        self.entries.clear();
        self.capacity = capacity;
        self.confirmed_capacity = confirmed_capacity;
        self.keep_confirmed = keep_confirmed;
    }

    /// Offers a candidate with score `quality`:
    /// - below capacity it is inserted;
    /// - with confirmed retention and below the confirmed capacity it is also
    ///   inserted when it is confirmed and no better than the worst entry, or
    ///   when it is better and the worst entry is confirmed;
    /// - otherwise it replaces the worst entry if it is strictly better.
    pub fn offer(&mut self, candidate: SeedCandidate, quality: f32) {
        let Some(worst) = self.entries.last().copied() else {
            if self.capacity > 0 {
                self.insert(candidate, quality);
            }
            return;
        };

        if self.entries.len() < self.capacity {
            self.insert(candidate, quality);
            return;
        }

        if let Some(thresholds) = self.keep_confirmed {
            if self.entries.len() < self.confirmed_capacity {
                let keep = if worst.quality <= quality {
                    thresholds.is_confirmed(&candidate, quality)
                } else {
                    thresholds.is_confirmed(&worst.candidate, worst.quality)
                };
                if keep {
                    self.insert(candidate, quality);
                    return;
                }
            }
        }

        if worst.quality > quality {
            self.entries.pop();
            self.insert(candidate, quality);
        }
    }

    fn insert(&mut self, candidate: SeedCandidate, quality: f32) {
        let at = self.entries.partition_point(|e| e.quality <= quality);
        self.entries.insert(at, RankedSeed { quality, candidate });
    }

    /// Entries from best to worst.
    pub fn entries(&self) -> &[RankedSeed] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
