//! Wall-clock timings of the seeding stages of one event.
//!
//! `run_event` records three stages: filling the store and radial bins,
//! the search (grid fill plus the first production call), and draining the
//! seeds, which includes every resumed production call.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Stage of [`SeedFinder::run_event`](crate::SeedFinder::run_event).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingStage {
    Fill,
    Search,
    Drain,
}

impl SeedingStage {
    pub fn label(self) -> &'static str {
        match self {
            SeedingStage::Fill => "fill",
            SeedingStage::Search => "search",
            SeedingStage::Drain => "drain",
        }
    }
}

/// Elapsed time of one stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Stage timings of one event, in the order they ran.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }

    /// Closes `stage`, started at `start`.
    pub fn record(&mut self, stage: SeedingStage, start: Instant) {
        self.push(stage.label(), elapsed_ms(start));
    }

    /// Sum of the recorded stages carrying `label`.
    pub fn stage_total(&self, label: &str) -> f64 {
        self.stages
            .iter()
            .filter(|s| s.label == label)
            .map(|s| s.elapsed_ms)
            .sum()
    }
}

#[inline]
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
