//! Source file discovery.
//!
//! Walks the input root recursively and describes every regular file that
//! belongs in the site. Symbolic links are not followed, so a link cycle in
//! the content tree cannot trap the walk. Template files (`.template`) are
//! consumed by the converter and never become site files themselves.
//!
//! Entries are sorted by file name within each directory, which makes the
//! discovery order, and therefore the conversion order, stable between runs.

use crate::convert::copy::extension_of;
use crate::template::TEMPLATE_FILENAME;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to walk {0}: {1}")]
    Walk(PathBuf, walkdir::Error),
}

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path; the identity of the file.
    pub path: PathBuf,
    /// File name for display only. Not unique.
    pub name: String,
    /// Extension with its leading dot, or empty.
    pub extension: String,
    /// Modification time at discovery.
    pub modified: SystemTime,
}

impl SourceFile {
    /// Describe a single file from its metadata.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension: extension_of(path),
            modified: metadata.modified()?,
        })
    }
}

/// Every site file under `root`, in discovery order.
pub fn discover(root: &Path) -> Result<Vec<SourceFile>, ScanError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ScanError::Walk(root.to_path_buf(), e))?;
        if !entry.file_type().is_file() || entry.file_name() == TEMPLATE_FILENAME {
            continue;
        }
        let file = SourceFile::from_path(entry.path())?;
        tracing::debug!(path = %file.path.display(), "Found file");
        files.push(file);
    }

    tracing::info!(count = files.len(), root = %root.display(), "Site files found");
    Ok(files)
}
