//! Shared test utilities for the sitegen test suite.
//!
//! Provides a throwaway project layout and helpers that write source files
//! and hand back the [`SourceFile`] descriptor discovery would produce.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let site = TestSite::new();
//! let page = site.write("blog/post.md", "# Hello");
//! let output = site.output("blog/post.html");
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tempfile::TempDir;

use crate::config::ProjectSettings;
use crate::scan::SourceFile;

// =========================================================================
// Fixture setup
// =========================================================================

/// A project in a temp directory: `content/` in, `public/` out.
///
/// The output directory is not created up front; the code under test must
/// cope with it being missing.
pub struct TestSite {
    pub tmp: TempDir,
    pub settings: ProjectSettings,
}

impl TestSite {
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();
        let settings =
            ProjectSettings::new(tmp.path().join("content"), tmp.path().join("public")).unwrap();
        Self { tmp, settings }
    }

    /// Write `content` to `rel` under the input root and describe it.
    pub fn write(&self, rel: &str, content: &str) -> SourceFile {
        let path = self.input(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        SourceFile::from_path(&path).unwrap()
    }

    /// Like [`write`](Self::write), with an explicit modification time.
    pub fn write_at(&self, rel: &str, content: &str, modified: SystemTime) -> SourceFile {
        self.write(rel, content);
        set_mtime(&self.input(rel), modified);
        SourceFile::from_path(&self.input(rel)).unwrap()
    }

    pub fn input(&self, rel: &str) -> PathBuf {
        self.settings.input.join(rel)
    }

    pub fn output(&self, rel: &str) -> PathBuf {
        self.settings.output.join(rel)
    }
}

/// Overwrite a file's modification time.
pub fn set_mtime(path: &Path, modified: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}
