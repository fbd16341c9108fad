//! The pipeline driver: runs every discovered file through its conversion
//! unit, in discovery order, and collects a report.
//!
//! The loop is sequential. The staleness cache is owned by the [`Pipeline`]
//! for the duration of a run, loaded from the output directory the first
//! time it is needed, and handed to each unit in turn. A failing file never
//! halts the loop; it shows up in the [`BuildReport`] instead.
//!
//! Progress is observable through an optional channel of [`BuildEvent`]s.
//! Observers see what happened but cannot influence the loop, and a dropped
//! receiver does not stop the build.

use crate::cache::StalenessCache;
use crate::config::ProjectSettings;
use crate::convert::ConverterRegistry;
use crate::scan::{self, ScanError, SourceFile};
use crate::site_file::{FileState, SiteFile};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Failed to discover site files: {0}")]
    Scan(#[from] ScanError),
}

/// Progress events emitted while a run is under way.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// A file is about to be checked. `index` is 1-based.
    Started {
        index: usize,
        total: usize,
        name: String,
    },
    /// A non-fatal problem reported by the strategy.
    Warning { name: String, message: String },
    /// The conversion of `path` failed; `reason` is the error message.
    Failed { path: PathBuf, reason: String },
    /// The file reached a terminal state.
    Finished {
        name: String,
        state: FileState,
        output: Option<PathBuf>,
    },
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub state: FileState,
    pub output: Option<PathBuf>,
    pub warnings: Vec<String>,
    pub error: Option<String>,
}

/// Per-file outcomes of one run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BuildReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Files converted during this run.
    pub fn converted(&self) -> usize {
        self.count(FileState::Succeeded)
    }

    /// Files left alone because they were unchanged.
    pub fn skipped(&self) -> usize {
        self.count(FileState::Skipped)
    }

    /// Paths of the files that failed, in discovery order.
    pub fn failed(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.state == FileState::Failed)
            .map(|o| o.path.as_path())
            .collect()
    }

    /// A run succeeds when no file failed.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.state.is_success())
    }

    fn count(&self, state: FileState) -> usize {
        self.outcomes.iter().filter(|o| o.state == state).count()
    }
}

pub struct Pipeline {
    settings: ProjectSettings,
    registry: ConverterRegistry,
    cache: Option<StalenessCache>,
    events: Option<Sender<BuildEvent>>,
}

impl Pipeline {
    pub fn new(settings: ProjectSettings, registry: ConverterRegistry) -> Self {
        Self {
            settings,
            registry,
            cache: None,
            events: None,
        }
    }

    /// Send progress events to `events` during [`run`](Self::run).
    pub fn with_events(mut self, events: Option<Sender<BuildEvent>>) -> Self {
        self.events = events;
        self
    }

    /// Use `cache` instead of loading one from the output directory.
    pub fn with_cache(mut self, cache: StalenessCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// The cache, once a run has loaded it.
    pub fn cache(&self) -> Option<&StalenessCache> {
        self.cache.as_ref()
    }

    /// Convert every stale file in `sources`, in the order given.
    pub fn run(&mut self, sources: Vec<SourceFile>) -> BuildReport {
        let Self {
            settings,
            registry,
            cache,
            events,
        } = self;
        let cache = cache.get_or_insert_with(|| StalenessCache::load(&settings.output));

        let total = sources.len();
        tracing::info!(total, "Converting site files");
        let mut report = BuildReport::default();

        for (index, source) in sources.into_iter().enumerate() {
            emit(
                events,
                BuildEvent::Started {
                    index: index + 1,
                    total,
                    name: source.name.clone(),
                },
            );

            let mut file = SiteFile::new(source, registry);
            let conversion = file.convert(settings, cache);
            let name = file.name().to_string();

            for message in &conversion.warnings {
                emit(
                    events,
                    BuildEvent::Warning {
                        name: name.clone(),
                        message: message.clone(),
                    },
                );
            }
            let error = conversion.error.map(|e| e.to_string());
            if let Some(reason) = &error {
                emit(
                    events,
                    BuildEvent::Failed {
                        path: file.path().to_path_buf(),
                        reason: reason.clone(),
                    },
                );
            }
            emit(
                events,
                BuildEvent::Finished {
                    name,
                    state: conversion.state,
                    output: conversion.output.clone(),
                },
            );

            report.outcomes.push(FileOutcome {
                path: file.path().to_path_buf(),
                state: conversion.state,
                output: conversion.output,
                warnings: conversion.warnings,
                error,
            });
        }

        tracing::info!(
            total = report.total(),
            converted = report.converted(),
            skipped = report.skipped(),
            failed = report.failed().len(),
            "Run finished"
        );
        report
    }
}

fn emit(events: &Option<Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is watching.
        let _ = tx.send(event);
    }
}

/// Discover everything under the input root and convert it with the
/// standard strategies.
pub fn build(
    settings: &ProjectSettings,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let sources = scan::discover(&settings.input)?;
    let mut pipeline =
        Pipeline::new(settings.clone(), ConverterRegistry::standard()).with_events(events);
    Ok(pipeline.run(sources))
}
