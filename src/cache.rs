//! Change tracking for incremental builds.
//!
//! The cache maps each source file's absolute path to the modification time
//! it had when it was last converted successfully. A file is converted again
//! only when its current modification time differs from the recorded one.
//!
//! # Design
//!
//! ## Staleness is inequality, not "newer than"
//!
//! A file whose mtime moved backwards (restored from a backup, checked out
//! from an older commit) is reconverted as well. A path with no entry is
//! always stale.
//!
//! ## Only successes are recorded
//!
//! An entry is written after a successful conversion and never after a failed
//! one, so a failing file stays stale and is retried on the next run.
//!
//! ## Storage
//!
//! The cache is a JSON object at `<output_dir>/.files`:
//!
//! ```json
//! {
//!   "/site/content/index.md": "2024-05-01T09:30:12.123456789Z"
//! }
//! ```
//!
//! It lives with the output rather than the input, so deleting the output
//! directory forces a full rebuild. The whole mapping is rewritten after
//! every success; a crash mid-run keeps everything converted before it.
//!
//! ## Corruption
//!
//! A missing or unreadable file is an empty cache. A malformed file is
//! deleted as well. Either way the run proceeds as a full rebuild.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Name of the cache file within the output directory.
const CACHE_FILENAME: &str = ".files";

/// Source path → modification time of its last successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StalenessCache {
    path: PathBuf,
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl StalenessCache {
    /// An empty cache that persists to `output_dir`.
    pub fn empty(output_dir: &Path) -> Self {
        Self {
            path: cache_path(output_dir),
            entries: BTreeMap::new(),
        }
    }

    /// Load the cache kept in `output_dir`.
    pub fn load(output_dir: &Path) -> Self {
        let mut cache = Self::empty(output_dir);
        tracing::info!(path = %cache.path.display(), "Loading staleness cache");

        let content = match std::fs::read_to_string(&cache.path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return cache,
            Err(e) => {
                tracing::warn!(path = %cache.path.display(), error = %e, "Error reading staleness cache, starting empty");
                return cache;
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => cache.entries = entries,
            Err(e) => {
                tracing::warn!(
                    path = %cache.path.display(),
                    error = %e,
                    "Staleness cache is corrupt, deleting it"
                );
                cache.discard_file();
            }
        }
        tracing::debug!(entries = cache.entries.len(), "Staleness cache loaded");
        cache
    }

    fn discard_file(&self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != io::ErrorKind::NotFound
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to delete staleness cache");
        }
    }

    /// Whether `source` needs converting given its current modification time.
    pub fn is_stale(&self, source: &Path, modified: SystemTime) -> bool {
        let current = DateTime::<Utc>::from(modified);
        let recorded = self.entries.get(&key(source));
        tracing::debug!(
            path = %source.display(),
            recorded = ?recorded,
            current = %current,
            "Checking staleness"
        );
        recorded != Some(&current)
    }

    /// Record a successful conversion and persist the cache.
    ///
    /// A failure to persist is logged and otherwise ignored: the in-memory
    /// entry still counts for the rest of this run, and the next run merely
    /// converts the file again.
    pub fn record_success(&mut self, source: &Path, modified: SystemTime) {
        self.entries.insert(key(source), DateTime::<Utc>::from(modified));
        if let Err(e) = self.save() {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to write staleness cache");
        }
    }

    /// Write the whole mapping to disk.
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)
    }

    /// Recorded modification time for `source`, if any.
    pub fn recorded(&self, source: &Path) -> Option<DateTime<Utc>> {
        self.entries.get(&key(source)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn key(source: &Path) -> String {
    source.to_string_lossy().into_owned()
}

/// Resolve the cache file path for an output directory.
pub fn cache_path(output_dir: &Path) -> PathBuf {
    output_dir.join(CACHE_FILENAME)
}
