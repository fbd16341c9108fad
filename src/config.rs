//! Project configuration.
//!
//! A project is a directory holding a `sitegen.toml` that names the content
//! directory and the output directory, plus the optional values used for
//! placeholder substitution:
//!
//! ```toml
//! source = "content"           # Input root, relative to the project directory
//! destination = "public"       # Output root, relative to the project directory
//! base_url = "https://x.test"  # Replaces %BASEURL% (optional)
//! site_name = "Demo"           # Replaces %SITENAME% (optional)
//! ```
//!
//! Unknown keys are rejected to catch typos early. Settings are resolved once
//! at startup into a [`ProjectSettings`] with absolute paths and are read-only
//! for the rest of the run.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project file inside the project directory.
pub const PROJECT_FILENAME: &str = "sitegen.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Cannot locate project file {0}")]
    MissingProjectFile(PathBuf),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Raw contents of `sitegen.toml`, before path resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectFile {
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub site_name: Option<String>,
}

/// Immutable per-run configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    /// Absolute input root.
    pub input: PathBuf,
    /// Absolute output root.
    pub output: PathBuf,
    /// Replacement for `%BASEURL%`.
    pub base_url: Option<String>,
    /// Replacement for `%SITENAME%`.
    pub site_name: Option<String>,
}

impl ProjectSettings {
    /// Settings for an input/output pair with no placeholder values.
    ///
    /// Relative paths are made absolute against the current directory.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self {
            input: std::path::absolute(input)?,
            output: std::path::absolute(output)?,
            base_url: None,
            site_name: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    /// Load `sitegen.toml` from a project directory and resolve it.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let project_file = project_dir.join(PROJECT_FILENAME);
        if !project_file.is_file() {
            return Err(ConfigError::MissingProjectFile(project_file));
        }
        tracing::info!(path = %project_file.display(), "Located project file");

        let content = fs::read_to_string(&project_file)?;
        let raw: ProjectFile = toml::from_str(&content)?;
        let settings = Self::resolve(raw, project_dir)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Join the project file's source and destination against the project
    /// root and make them absolute.
    pub fn resolve(raw: ProjectFile, project_dir: &Path) -> Result<Self, ConfigError> {
        let root = std::path::absolute(project_dir)?;
        Ok(Self {
            input: root.join(&raw.source),
            output: root.join(&raw.destination),
            base_url: raw.base_url,
            site_name: raw.site_name,
        })
    }

    /// Check the settings describe a runnable project.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input.is_dir() {
            return Err(ConfigError::Validation(format!(
                "source directory {} does not exist",
                self.input.display()
            )));
        }
        // Neither root may contain the other, equal roots included.
        if self.input.starts_with(&self.output) || self.output.starts_with(&self.input) {
            return Err(ConfigError::Validation(format!(
                "source {} and destination {} must not contain one another",
                self.input.display(),
                self.output.display()
            )));
        }
        Ok(())
    }

    /// Apply per-run overrides given on the command line.
    pub fn override_with(mut self, base_url: Option<String>, site_name: Option<String>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if site_name.is_some() {
            self.site_name = site_name;
        }
        self
    }
}

/// Returns a commented stock `sitegen.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_project_toml() -> &'static str {
    r##"# sitegen project file
# ====================
# Paths are relative to the directory holding this file.

# Directory holding the site content (markdown, html, images, css, ...).
source = "content"

# Directory the built site is written to. The change-tracking file
# `.files` lives here too, so deleting this directory forces a full rebuild.
destination = "public"

# Replaces every %BASEURL% in .md and .html files (and templates).
# Left unset, the token is replaced with nothing.
# base_url = "https://example.com"

# Replaces every %SITENAME% and is passed to pandoc as SiteName metadata.
# site_name = "My Site"
"##
}
