use crate::error::SeedingError;
use crate::finder::{EventInput, SeedFinderParams};
use crate::io::read_json_file;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Per-event reports (seeds, counters, timings).
    pub summary_json: Option<PathBuf>,
    /// Flat per-seed audit records.
    pub audit_json: Option<PathBuf>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub finder: SeedFinderParams,
    /// Inline events.
    #[serde(default)]
    pub events: Vec<EventInput>,
    /// Extra event files, each holding a JSON array of events. Relative paths
    /// resolve against the config file's directory.
    #[serde(default)]
    pub event_files: Vec<PathBuf>,
    /// Worker threads for the batch; `None` uses the global rayon pool.
    #[serde(default)]
    pub threads: Option<usize>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RunConfig {
    /// Inline events followed by the events of every listed file.
    pub fn resolve_events(&self, base_dir: &Path) -> Result<Vec<EventInput>, SeedingError> {
        let mut events = self.events.clone();
        for file in &self.event_files {
            let more: Vec<EventInput> = read_json_file(&resolve_path(base_dir, file))?;
            events.extend(more);
        }
        Ok(events)
    }
}

pub fn load_config(path: &Path) -> Result<RunConfig, SeedingError> {
    let config: RunConfig = read_json_file(path)?;
    if config.threads == Some(0) {
        return Err(SeedingError::InvalidConfig(format!(
            "{}: threads must be at least 1",
            path.display()
        )));
    }
    Ok(config)
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
