//! Conversion strategies and extension dispatch.
//!
//! | Extension | Strategy |
//! |---|---|
//! | `.md` | [`PandocConverter`] → `.html` via the external `pandoc` program |
//! | anything else | [`CopyConverter`] → verbatim copy (placeholders substituted in `.html`) |
//!
//! The module is split into:
//! - **Dispatch**: the [`Converter`] trait and [`ConverterRegistry`]
//! - **Strategies**: [`copy`] and [`pandoc`]
//! - **Runner**: program lookup and child-process execution ([`runner`])
//!
//! Every strategy reports through [`ConvertError`]; errors stop at the
//! conversion unit ([`crate::site_file`]) and are never propagated further.

pub mod copy;
pub mod pandoc;
pub mod runner;

pub use copy::CopyConverter;
pub use pandoc::PandocConverter;
pub use runner::{CommandRunner, ExecutableLocator, RunOutput, SystemRunner};

use crate::config::ProjectSettings;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Conversion failed due to dependency {program} being unavailable")]
    DependencyMissing { program: String },
    #[error("{program} exited with status {}", exit_status(.code))]
    ProcessFailed { program: String, code: Option<i32> },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Source file is outside the input directory: {0}")]
    OutsideInput(PathBuf),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "signal".to_string(),
    }
}

/// Successful conversion of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    /// Where the result was written.
    pub output: PathBuf,
    /// Non-fatal problems worth showing to the operator.
    pub warnings: Vec<String>,
}

impl Converted {
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            warnings: Vec::new(),
        }
    }
}

/// A conversion strategy bound to files by extension.
pub trait Converter {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Convert `source` into the output tree described by `settings`.
    fn convert(&self, source: &Path, settings: &ProjectSettings) -> Result<Converted, ConvertError>;
}

/// Extension → strategy mapping with an explicit default.
///
/// Keys are extensions including the leading dot, compared exactly as the
/// filesystem reports them (`.md` and `.MD` are different keys). Lookup never
/// fails: unmapped extensions get the default strategy.
pub struct ConverterRegistry {
    mappings: HashMap<String, Box<dyn Converter>>,
    default: Box<dyn Converter>,
}

impl ConverterRegistry {
    /// A registry where everything is handled by `default`.
    pub fn new(default: Box<dyn Converter>) -> Self {
        Self {
            mappings: HashMap::new(),
            default,
        }
    }

    /// `.md` through pandoc on the `PATH`, everything else copied.
    pub fn standard() -> Self {
        Self::new(Box::new(CopyConverter)).with(
            ".md",
            Box::new(PandocConverter::new(ExecutableLocator::from_env(), SystemRunner)),
        )
    }

    /// Register a strategy for an extension, replacing any previous one.
    pub fn register(&mut self, extension: impl Into<String>, converter: Box<dyn Converter>) {
        self.mappings.insert(extension.into(), converter);
    }

    pub fn with(mut self, extension: impl Into<String>, converter: Box<dyn Converter>) -> Self {
        self.register(extension, converter);
        self
    }

    /// The strategy for files with this extension.
    pub fn lookup(&self, extension: &str) -> &dyn Converter {
        match self.mappings.get(extension) {
            Some(converter) => converter.as_ref(),
            None => self.default.as_ref(),
        }
    }
}

/// Destination of `source` in the output tree.
///
/// The input-root prefix is swapped for the output root; with `extension`
/// (no leading dot) the file extension is replaced as well.
pub fn output_path(
    source: &Path,
    settings: &ProjectSettings,
    extension: Option<&str>,
) -> Result<PathBuf, ConvertError> {
    let relative = source
        .strip_prefix(&settings.input)
        .map_err(|_| ConvertError::OutsideInput(source.to_path_buf()))?;
    let destination = settings.output.join(relative);
    Ok(match extension {
        Some(ext) => destination.with_extension(ext),
        None => destination,
    })
}

/// Create the parent directory of `path` if it is missing.
pub(crate) fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) => std::fs::create_dir_all(parent),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Converter for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn convert(&self, source: &Path, _: &ProjectSettings) -> Result<Converted, ConvertError> {
            Ok(Converted::new(source.to_path_buf()))
        }
    }

    fn settings() -> ProjectSettings {
        ProjectSettings::new("/site/in", "/site/out").unwrap()
    }

    // =========================================================================
    // Registry
    // =========================================================================

    #[test]
    fn lookup_mapped_extension() {
        let registry = ConverterRegistry::new(Box::new(Named("copy")))
            .with(".md", Box::new(Named("pandoc")));
        assert_eq!(registry.lookup(".md").name(), "pandoc");
    }

    #[test]
    fn lookup_falls_back_to_default() {
        let registry = ConverterRegistry::new(Box::new(Named("copy")))
            .with(".md", Box::new(Named("pandoc")));
        assert_eq!(registry.lookup(".png").name(), "copy");
        assert_eq!(registry.lookup("").name(), "copy");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let registry = ConverterRegistry::new(Box::new(Named("copy")))
            .with(".md", Box::new(Named("pandoc")));
        assert_eq!(registry.lookup(".MD").name(), "copy");
    }

    #[test]
    fn register_replaces_existing() {
        let mut registry = ConverterRegistry::new(Box::new(Named("copy")));
        registry.register(".md", Box::new(Named("first")));
        registry.register(".md", Box::new(Named("second")));
        assert_eq!(registry.lookup(".md").name(), "second");
    }

    #[test]
    fn standard_registry_maps_markdown_only() {
        let registry = ConverterRegistry::standard();
        assert_eq!(registry.lookup(".md").name(), "pandoc");
        assert_eq!(registry.lookup(".html").name(), "copy");
        assert_eq!(registry.lookup(".jpg").name(), "copy");
    }

    // =========================================================================
    // output_path
    // =========================================================================

    #[test]
    fn output_path_swaps_root() {
        let out = output_path(Path::new("/site/in/img/a.png"), &settings(), None).unwrap();
        assert_eq!(out, PathBuf::from("/site/out/img/a.png"));
    }

    #[test]
    fn output_path_replaces_extension() {
        let out =
            output_path(Path::new("/site/in/blog/post.md"), &settings(), Some("html")).unwrap();
        assert_eq!(out, PathBuf::from("/site/out/blog/post.html"));
    }

    #[test]
    fn output_path_only_touches_final_extension() {
        // A directory that looks like the extension is left alone.
        let out = output_path(Path::new("/site/in/x.md/notes.md"), &settings(), Some("html"))
            .unwrap();
        assert_eq!(out, PathBuf::from("/site/out/x.md/notes.html"));
    }

    #[test]
    fn output_path_outside_input_is_error() {
        let result = output_path(Path::new("/elsewhere/a.md"), &settings(), Some("html"));
        assert!(matches!(result, Err(ConvertError::OutsideInput(_))));
    }

    #[test]
    fn process_failed_message_includes_code() {
        let err = ConvertError::ProcessFailed {
            program: "pandoc".into(),
            code: Some(64),
        };
        assert_eq!(err.to_string(), "pandoc exited with status 64");
        let err = ConvertError::ProcessFailed {
            program: "pandoc".into(),
            code: None,
        };
        assert_eq!(err.to_string(), "pandoc exited with status signal");
    }
}
