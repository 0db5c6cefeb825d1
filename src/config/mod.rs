//! JSON configuration of the demo runner.
//!
//! - [`run`] – finder parameters, the events to seed and where to write the
//!   reports.

pub mod run;

pub use run::{load_config, OutputConfig, RunConfig};
