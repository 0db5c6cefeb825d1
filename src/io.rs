//! JSON helpers for configurations, event files and reports.
//!
//! - `read_json_file`: parse any deserializable value from disk.
//! - `write_json_file`: pretty-print a serializable value to disk, creating
//!   parent directories as needed.
use crate::error::SeedingError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, SeedingError> {
    let data = fs::read_to_string(path).map_err(|e| SeedingError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| SeedingError::json(path, e))
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), SeedingError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| SeedingError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, json).map_err(|e| SeedingError::io(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<(), SeedingError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| SeedingError::io(parent, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::BeamConditions;

    #[test]
    fn writes_into_fresh_directories_and_reads_back() {
        let dir = std::env::temp_dir().join(format!("si-seed-io-{}", std::process::id()));
        let path = dir.join("nested").join("beam.json");
        let beam = BeamConditions::default();
        write_json_file(&path, &beam).unwrap();
        let back: BeamConditions = read_json_file(&path).unwrap();
        assert_eq!(back, beam);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = read_json_file::<BeamConditions>(Path::new("/definitely/not/here.json"))
            .unwrap_err();
        assert!(matches!(err, SeedingError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
