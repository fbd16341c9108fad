//! Output directory cleaning.
//!
//! Removes everything under the output root, the staleness cache included,
//! and leaves an empty directory behind. The next run is a full rebuild.

use crate::config::ProjectSettings;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Failed to delete {path}: {source}")]
    Delete {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to recreate {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanOutcome {
    /// There was no output directory; nothing was done.
    Missing,
    Cleaned,
}

pub fn clean(settings: &ProjectSettings) -> Result<CleanOutcome, CleanError> {
    let output = &settings.output;
    if !output.exists() {
        tracing::warn!(path = %output.display(), "Output directory does not exist, nothing to clean");
        return Ok(CleanOutcome::Missing);
    }

    tracing::info!(path = %output.display(), "Deleting output directory");
    fs::remove_dir_all(output).map_err(|source| CleanError::Delete {
        path: output.clone(),
        source,
    })?;
    fs::create_dir_all(output).map_err(|source| CleanError::Create {
        path: output.clone(),
        source,
    })?;
    tracing::info!(path = %output.display(), "Output directory cleaned");
    Ok(CleanOutcome::Cleaned)
}
