//! Check command implementation
//!
//! This module implements a `stylecheck` run, which:
//! - Loads configuration from stylecheck.toml (or `--config`)
//! - Resolves the active rules
//! - Discovers files to check
//! - Checks files in parallel
//! - Prints diagnostics (human or JSONL), or a fault summary
//! - Returns the verdict's exit code

use crate::cli::args::{Cli, OutputFormat};
use crate::cli::common;
use crate::engine::file_walker::FileWalkerError;
use crate::engine::runner::Runner;
use crate::engine::verdict::{EXIT_SOFTWARE, Verdict};
use crate::error::ConfigError;
use crate::output::{HumanReporter, JsonlReporter, Reporter};
use std::io;
use std::path::PathBuf;
use termcolor::{StandardStream, WriteColor};

/// Error type specific to check command
#[derive(Debug, thiserror::Error)]
pub(crate) enum CheckError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    FileWalker(#[from] FileWalkerError),
}

impl CheckError {
    /// Verdict for a run that stopped before checking any file
    fn into_verdict(self) -> Verdict {
        match self {
            CheckError::FileWalker(FileWalkerError::NotFound(_) | FileWalkerError::Walk(_)) => Verdict::NoInput,
            other => Verdict::ConfigFault {
                file: None,
                detail: other.to_string(),
            },
        }
    }
}

/// Run a check
///
/// Diagnostics go to stdout; fault summaries and logs go to stderr.
///
/// # Returns
///
/// Exit code:
/// - 0: no diagnostics, or warnings within budget
/// - 1: warnings over budget
/// - 2: at least one error-severity diagnostic
/// - 66: no input files
/// - 70: internal failure while checking a file
/// - 78: configuration error
pub fn run_check(cli: &Cli) -> i32 {
    let mut stdout = StandardStream::stdout(common::color_choice(cli.color));
    match execute(cli, &mut stdout) {
        Ok(verdict) => verdict.exit_code(),
        Err(e) => {
            eprintln!("Error: failed to write output: {}", e);
            EXIT_SOFTWARE
        }
    }
}

/// Runs a check, writing the report to `out`
pub(crate) fn execute(cli: &Cli, out: &mut dyn WriteColor) -> io::Result<Verdict> {
    // no input wins over anything configuration could report
    if cli.paths.is_empty() {
        eprintln!("No files to check.");
        return Ok(Verdict::NoInput);
    }

    let (runner, files) = match prepare(cli) {
        Ok(prepared) => prepared,
        Err(e) => {
            let message = e.to_string();
            let verdict = e.into_verdict();
            if verdict == Verdict::NoInput {
                eprintln!("Error: {}", message);
            } else {
                print_fault(&verdict);
            }
            return Ok(verdict);
        }
    };

    if files.is_empty() {
        eprintln!("No files to check.");
        return Ok(Verdict::NoInput);
    }

    let outcome = runner.run(&files, cli.max_warnings);

    if outcome.verdict.is_fault() {
        print_fault(&outcome.verdict);
        return Ok(outcome.verdict);
    }

    let reporter: Box<dyn Reporter> = match cli.reporter {
        OutputFormat::Human => Box::new(HumanReporter::new()),
        OutputFormat::Jsonl => Box::new(JsonlReporter::new()),
    };
    reporter.report(&outcome.diagnostics, out)?;

    Ok(outcome.verdict)
}

fn prepare(cli: &Cli) -> Result<(Runner, Vec<PathBuf>), CheckError> {
    let config = common::load_config(cli)?;
    let runner = common::build_runner(&config)?;
    let files = common::discover_files(&cli.paths, &config)?;
    Ok((runner, files))
}

/// Prints a fault summary to stderr
fn print_fault(verdict: &Verdict) {
    match verdict {
        Verdict::SoftwareFault { file, detail } => {
            eprintln!("An unexpected error occurred while checking {}:", file.display());
            eprintln!("  {}", detail);
        }
        Verdict::ConfigFault {
            file: Some(file),
            detail,
        } => {
            eprintln!("Invalid configuration (while checking {}):", file.display());
            eprintln!("  {}", detail);
        }
        Verdict::ConfigFault { file: None, detail } => {
            eprintln!("Invalid configuration:");
            eprintln!("  {}", detail);
        }
        _ => {}
    }
}
