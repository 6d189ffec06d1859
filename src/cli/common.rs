//! Common helper functions shared by the CLI
//!
//! This module provides shared functionality for loading configuration,
//! discovering files, and building the runner.

use crate::cli::args::{Cli, ColorChoice};
use crate::config::{Config, ConfigResolver, DEFAULT_CONFIG_FILE};
use crate::engine::file_walker::{FileWalker, FileWalkerError};
use crate::engine::runner::Runner;
use crate::error::ConfigError;
use crate::rules::RuleRegistry;
use crate::syntax::LessParser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load the configuration for a run
///
/// An explicit path must exist. Without one, `stylecheck.toml` in the
/// working directory is used if present, and built-in defaults otherwise.
/// Command-line excludes and linters are merged on top.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed or validated.
pub(crate) fn load_config(cli: &Cli) -> Result<Config, ConfigError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                tracing::debug!("using {}", DEFAULT_CONFIG_FILE);
                Config::load(default_path)?
            } else {
                Config::default()
            }
        }
    };

    config.with_overrides(&cli.exclude, &cli.linters)
}

/// Build the runner from the configuration
///
/// # Errors
///
/// Returns `ConfigError::UnknownLinter` if a requested plugin is not registered.
pub(crate) fn build_runner(config: &Config) -> Result<Runner, ConfigError> {
    let rules = ConfigResolver::resolve(RuleRegistry::with_builtin_rules(), config)?;
    tracing::debug!(rules = rules.len(), "resolved active rules");
    Ok(Runner::new(Arc::new(rules), Arc::new(LessParser::new())))
}

/// Expand the command-line paths into the files to check
///
/// # Errors
///
/// Returns `FileWalkerError` for invalid excludes or unreadable paths.
pub(crate) fn discover_files(paths: &[PathBuf], config: &Config) -> Result<Vec<PathBuf>, FileWalkerError> {
    FileWalker::new(&config.file_extensions, &config.excluded_files)?.expand(paths)
}

/// Terminal color setting for stdout
pub(crate) fn color_choice(choice: ColorChoice) -> termcolor::ColorChoice {
    match choice {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if std::io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    }
}
