//! External program lookup and invocation.
//!
//! The [`CommandRunner`] trait is the seam between the converters and the
//! operating system: [`SystemRunner`] spawns real child processes, tests
//! substitute a recording mock. Lookup of the program itself goes through
//! [`ExecutableLocator`], which searches the `PATH` once per program name and
//! remembers the answer for the rest of the run.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Exit status and captured streams of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    /// Success is exit code zero and nothing else.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a program to completion and captures its output.
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    ///
    /// `Err` means the process could not be started at all; a process that
    /// ran and failed is an `Ok` with a non-zero [`RunOutput::code`].
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<RunOutput>;
}

/// Spawns real child processes with stdout and stderr piped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<RunOutput> {
        tracing::info!(program = %program.display(), "Executing");
        tracing::debug!(?args, "Full arguments");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let result = RunOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        tracing::debug!(program = %program.display(), stdout = %result.stdout, "Captured stdout");
        tracing::debug!(program = %program.display(), stderr = %result.stderr, "Captured stderr");
        Ok(result)
    }
}

/// Memoized search for executables on a search path.
///
/// Only exact file-name matches count. Both hits and misses are remembered,
/// so each program name is searched for at most once per locator.
#[derive(Debug)]
pub struct ExecutableLocator {
    search_path: Vec<PathBuf>,
    memo: RefCell<HashMap<String, Option<PathBuf>>>,
}

impl ExecutableLocator {
    /// Search the directories of the `PATH` environment variable.
    pub fn from_env() -> Self {
        let search_path = match std::env::var_os("PATH") {
            Some(path) => std::env::split_paths(&path).collect(),
            None => {
                tracing::error!("Failed to read PATH environment variable");
                Vec::new()
            }
        };
        Self::with_search_path(search_path)
    }

    /// Search an explicit list of directories, in order.
    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// Full path of the first executable named `program`, if any.
    pub fn find(&self, program: &str) -> Option<PathBuf> {
        if let Some(cached) = self.memo.borrow().get(program) {
            tracing::debug!(program, "Memo hit");
            return cached.clone();
        }

        let found = self
            .search_path
            .iter()
            // PATH entries do not have to exist.
            .filter(|dir| dir.is_dir())
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate));

        match &found {
            Some(path) => tracing::info!(program, path = %path.display(), "Found executable"),
            None => tracing::warn!(program, "Dependency not found"),
        }
        self.memo
            .borrow_mut()
            .insert(program.to_string(), found.clone());
        found
    }

    /// Number of distinct program names looked up so far.
    pub fn memoized(&self) -> usize {
        self.memo.borrow().len()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Convenience for building argument lists from mixed string/path parts.
pub(crate) fn arg(value: impl AsRef<OsStr>) -> OsString {
    value.as_ref().to_os_string()
}
