use clap::{Parser, Subcommand};
use sitegen::config::{self, ProjectSettings};
use sitegen::{clean, output, pipeline};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Build version, computed by build.rs.
const VERSION: &str = env!("SITEGEN_VERSION");

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(about = "Incremental static site builder")]
#[command(long_about = "\
Incremental static site builder

Mirrors a content directory into an output directory. Markdown files are
rendered to HTML with pandoc, everything else is copied. Files unchanged
since their last successful conversion are skipped.

Project layout:

  my-site/
  ├── sitegen.toml        # source, destination, base_url, site_name
  ├── content/
  │   ├── .template       # pandoc template for this directory and below
  │   ├── index.md        # → public/index.html
  │   ├── blog/
  │   │   ├── .template   # overrides the parent template
  │   │   └── post.md     # → public/blog/post.html
  │   └── img/logo.png    # → public/img/logo.png (copied)
  └── public/
      └── .files          # change tracking, delete to force a full rebuild

In .md and .html files %BASEURL% and %SITENAME% are replaced with the
configured values.

Run 'sitegen gen-config' to generate a documented sitegen.toml.")]
#[command(version = VERSION)]
struct Cli {
    /// Project directory holding sitegen.toml
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// Log file, appended to on every run
    #[arg(long, default_value = "sitegen.log", global = true)]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert every changed file into the output directory
    Convert(ConvertArgs),
    /// Delete everything in the output directory
    Clean,
    /// Print a stock sitegen.toml with all options documented
    GenConfig,
}

/// Per-run overrides of the project file.
#[derive(clap::Args, Clone)]
struct ConvertArgs {
    /// Replacement for %BASEURL%
    #[arg(long)]
    base_url: Option<String>,

    /// Replacement for %SITENAME%
    #[arg(long)]
    site_name: Option<String>,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Convert(args) => {
            let _session = Session::start(&cli.log_file, cli.verbose)?;
            let settings = ProjectSettings::load(&cli.project)?
                .override_with(args.base_url, args.site_name);
            tracing::info!(
                input = %settings.input.display(),
                output = %settings.output.display(),
                "Project settings loaded"
            );

            let (tx, rx) = std::sync::mpsc::channel();
            let output_root = settings.output.clone();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_build_event(&event, &output_root);
                }
            });
            let report = pipeline::build(&settings, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let report = report?;

            output::print_report(&report);
            Ok(if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Clean => {
            let _session = Session::start(&cli.log_file, cli.verbose)?;
            let settings = ProjectSettings::load(&cli.project)?;
            let outcome = clean::clean(&settings)?;
            output::print_clean_output(outcome, &settings.output);
            Ok(ExitCode::SUCCESS)
        }
        // Needs no project and writes no log.
        Command::GenConfig => {
            print!("{}", config::stock_project_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// A logged command run: version and platform at start, total time on drop.
struct Session {
    started: Instant,
}

impl Session {
    fn start(log_file: &Path, verbose: bool) -> Result<Self, String> {
        init_logging(log_file, verbose)
            .map_err(|e| format!("cannot open log file {}: {e}", log_file.display()))?;
        tracing::info!(version = VERSION, "Starting sitegen");
        if !cfg!(target_os = "linux") {
            tracing::warn!("sitegen is only tested on Linux, expect problems");
        }
        Ok(Self {
            started: Instant::now(),
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::info!(elapsed = ?self.started.elapsed(), "Total time");
    }
}

/// Route all tracing output to `log_file`.
///
/// `RUST_LOG` is honoured unless `--verbose` forces debug; the default level
/// is info.
fn init_logging(log_file: &Path, verbose: bool) -> std::io::Result<()> {
    let file = File::options().create(true).append(true).open(log_file)?;
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
