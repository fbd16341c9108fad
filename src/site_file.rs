//! The conversion unit: one source file bound to its strategy.
//!
//! ```text
//! Unchecked ──fresh──▶ Skipped
//!     │
//!     └──stale──▶ Converting ──ok──▶ Succeeded   (cache updated + persisted)
//!                     │
//!                     └──err──▶ Failed           (cache untouched)
//! ```
//!
//! `Skipped`, `Succeeded` and `Failed` are terminal; a unit converts at most
//! once per run. Every error from a strategy ends here: it is logged in full
//! and reduced to [`FileState::Failed`].

use crate::cache::StalenessCache;
use crate::config::ProjectSettings;
use crate::convert::{ConvertError, Converter, ConverterRegistry};
use crate::scan::SourceFile;
use std::path::{Path, PathBuf};

/// Where a [`SiteFile`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Unchecked,
    Converting,
    /// Unchanged since its last successful conversion.
    Skipped,
    Succeeded,
    Failed,
}

impl FileState {
    /// Terminal states other than `Failed` count as success.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Skipped | Self::Succeeded)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Skipped | Self::Succeeded | Self::Failed)
    }
}

/// Result of converting one unit, for reporting.
#[derive(Debug)]
pub struct Conversion {
    pub state: FileState,
    /// Output location when a strategy ran successfully.
    pub output: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub error: Option<ConvertError>,
}

pub struct SiteFile<'r> {
    source: SourceFile,
    converter: &'r dyn Converter,
    state: FileState,
}

impl<'r> SiteFile<'r> {
    /// Bind `source` to the strategy registered for its extension.
    pub fn new(source: SourceFile, registry: &'r ConverterRegistry) -> Self {
        let converter = registry.lookup(&source.extension);
        tracing::debug!(
            path = %source.path.display(),
            extension = %source.extension,
            converter = converter.name(),
            "Bound converter"
        );
        Self {
            source,
            converter,
            state: FileState::Unchecked,
        }
    }

    pub fn path(&self) -> &Path {
        &self.source.path
    }

    /// Display name, not unique.
    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    pub fn converter_name(&self) -> &'static str {
        self.converter.name()
    }

    /// Convert if stale, recording success in `cache`.
    ///
    /// Calling this on a unit that already reached a terminal state returns
    /// that state again without doing anything.
    pub fn convert(
        &mut self,
        settings: &ProjectSettings,
        cache: &mut StalenessCache,
    ) -> Conversion {
        if self.state.is_terminal() {
            return self.finished(None, Vec::new(), None);
        }

        if !cache.is_stale(&self.source.path, self.source.modified) {
            tracing::info!(
                path = %self.source.path.display(),
                "Ignoring file, unchanged since last run"
            );
            self.state = FileState::Skipped;
            return self.finished(None, Vec::new(), None);
        }

        self.state = FileState::Converting;
        match self.converter.convert(&self.source.path, settings) {
            Ok(converted) => {
                tracing::info!(
                    path = %self.source.path.display(),
                    output = %converted.output.display(),
                    "Converted successfully, updating cache"
                );
                cache.record_success(&self.source.path, self.source.modified);
                self.state = FileState::Succeeded;
                self.finished(Some(converted.output), converted.warnings, None)
            }
            Err(e) => {
                tracing::error!(
                    path = %self.source.path.display(),
                    converter = self.converter.name(),
                    error = ?e,
                    "Conversion failed"
                );
                self.state = FileState::Failed;
                self.finished(None, Vec::new(), Some(e))
            }
        }
    }

    fn finished(
        &self,
        output: Option<PathBuf>,
        warnings: Vec<String>,
        error: Option<ConvertError>,
    ) -> Conversion {
        Conversion {
            state: self.state,
            output,
            warnings,
            error,
        }
    }
}
