//! Markdown → HTML through the external `pandoc` program.
//!
//! For each file:
//!
//! 1. Locate `pandoc` on the search path (memoized per run).
//! 2. Resolve the nearest `.template` ([`crate::template`]).
//! 3. Stage placeholder-substituted copies of the source and template in a
//!    private temporary directory. Pandoc reads from disk, and the original
//!    source is never modified.
//! 4. Run
//!    `pandoc <input> -o <output> [--template=<path>] --from markdown+raw_attribute [--metadata=SiteName:<name>]`
//!    with both output streams captured for the log.
//! 5. Exit code zero is success, anything else a failure. The staging
//!    directory is removed either way when it goes out of scope.
//!
//! Without a template pandoc falls back to its own default formatting; the
//! conversion still succeeds but carries a warning for the operator.

use super::runner::{CommandRunner, ExecutableLocator, SystemRunner, arg};
use super::{ConvertError, Converted, Converter, ensure_parent, output_path};
use crate::config::ProjectSettings;
use crate::convert::copy::extension_of;
use crate::placeholder;
use crate::template::{TEMPLATE_FILENAME, resolve_template};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Pandoc input format: markdown with raw attribute blocks so embedded
/// HTML survives untouched.
const INPUT_FORMAT: &str = "markdown+raw_attribute";

/// Extension (without dot) of converted files.
pub const OUTPUT_EXTENSION: &str = "html";

pub struct PandocConverter<R: CommandRunner = SystemRunner> {
    program: String,
    locator: ExecutableLocator,
    runner: R,
}

impl<R: CommandRunner> PandocConverter<R> {
    pub fn new(locator: ExecutableLocator, runner: R) -> Self {
        Self {
            program: "pandoc".to_string(),
            locator,
            runner,
        }
    }

    /// Use a differently named executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

impl<R: CommandRunner> Converter for PandocConverter<R> {
    fn name(&self) -> &'static str {
        "pandoc"
    }

    fn convert(&self, source: &Path, settings: &ProjectSettings) -> Result<Converted, ConvertError> {
        tracing::info!(source = %source.display(), "Converting with pandoc");

        let program =
            self.locator
                .find(&self.program)
                .ok_or_else(|| ConvertError::DependencyMissing {
                    program: self.program.clone(),
                })?;

        let destination = output_path(source, settings, Some(OUTPUT_EXTENSION))?;
        let mut converted = Converted::new(destination.clone());

        let source_dir = source
            .parent()
            .ok_or_else(|| ConvertError::OutsideInput(source.to_path_buf()))?;
        let template = resolve_template(source_dir, &settings.input);
        if template.is_none() {
            tracing::warn!(source = %source.display(), "Pandoc template not found");
            converted
                .warnings
                .push("Pandoc template was not located".to_string());
        }

        // Held until the end of this function; dropping it removes the files.
        let staged = if placeholder::is_substitutable(&extension_of(source)) {
            Some(Staged::new(source, template.as_deref(), settings)?)
        } else {
            None
        };
        let (input, template) = match &staged {
            Some(staged) => (staged.input.clone(), staged.template.clone()),
            None => (source.to_path_buf(), template),
        };

        let args = arguments(&input, &destination, template.as_deref(), settings);
        ensure_parent(&destination)?;

        let output = self.runner.run(&program, &args)?;
        if !output.success() {
            tracing::error!(
                program = %program.display(),
                code = ?output.code,
                stderr = %output.stderr,
                "Execution failed"
            );
            return Err(ConvertError::ProcessFailed {
                program: self.program.clone(),
                code: output.code,
            });
        }

        Ok(converted)
    }
}

/// Substituted copies of a source file and its template.
struct Staged {
    _dir: TempDir,
    input: PathBuf,
    template: Option<PathBuf>,
}

impl Staged {
    fn new(
        source: &Path,
        template: Option<&Path>,
        settings: &ProjectSettings,
    ) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("sitegen-").tempdir()?;

        let file_name = source
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("input"));
        let input = dir.path().join(file_name);
        stage_file(source, &input, settings)?;

        let template = match template {
            Some(template) => {
                let staged = dir.path().join(TEMPLATE_FILENAME);
                stage_file(template, &staged, settings)?;
                Some(staged)
            }
            None => None,
        };

        tracing::debug!(dir = %dir.path().display(), "Staged substituted input");
        Ok(Self {
            _dir: dir,
            input,
            template,
        })
    }
}

fn stage_file(from: &Path, to: &Path, settings: &ProjectSettings) -> std::io::Result<()> {
    let content = fs::read(from)?;
    fs::write(to, placeholder::substitute_bytes(&content, settings))
}

/// Full pandoc argument list.
pub fn arguments(
    input: &Path,
    output: &Path,
    template: Option<&Path>,
    settings: &ProjectSettings,
) -> Vec<OsString> {
    let mut args = vec![arg(input), arg("-o"), arg(output)];
    if let Some(template) = template {
        let mut flag = OsString::from("--template=");
        flag.push(template);
        args.push(flag);
    }
    args.push(arg("--from"));
    args.push(arg(INPUT_FORMAT));
    if let Some(site_name) = settings.site_name.as_deref().filter(|s| !s.is_empty()) {
        args.push(arg(format!("--metadata=SiteName:{site_name}")));
    }
    args
}
