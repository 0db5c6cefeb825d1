//! Seed scoring and per-point ranking.
//!
//! Modules
//! - [`scoring`] – turns the curvature candidates of a bottom/central pair
//!   into scored seed candidates (`ScoreRules`).
//! - [`bounded`] – the quality-ordered buffer holding the best seeds of one
//!   central point (`SeedRanking`).
//!
//! Scores are "lower is better". Subsystem bonuses place pixel-only and
//! strip-only seeds in disjoint score bands, so their offsets must exceed the
//! largest impact parameter expected.

pub mod bounded;
pub mod scoring;

pub use bounded::{RankedSeed, SeedRanking};
pub use scoring::{ConfirmationThresholds, CurvatureCandidate, PairContext, ScoreRules, SeedCandidate};
