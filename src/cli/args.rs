//! CLI argument parsing using clap

use crate::engine::WarningBudget;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output, one line per diagnostic
    #[value(name = "default", alias = "human")]
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// Stylecheck CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "stylecheck")]
#[command(about = "Configurable style linter for LESS and CSS stylesheets")]
#[command(version)]
pub struct Cli {
    /// Files and directories to check
    pub paths: Vec<PathBuf>,

    /// Configuration file (defaults to ./stylecheck.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Glob of files to skip, in addition to `excluded_files`
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Plugin rule to enable, in addition to `linters`
    #[arg(short, long = "linter", value_name = "NAME")]
    pub linters: Vec<String>,

    /// Reporter used to print diagnostics
    #[arg(short, long, value_enum, default_value = "default")]
    pub reporter: OutputFormat,

    /// Number of warnings tolerated before failing; -1 means unlimited
    #[arg(long, value_name = "N", default_value = "0", allow_negative_numbers = true)]
    pub max_warnings: WarningBudget,

    /// Output coloring
    #[arg(long, value_enum, default_value = "auto")]
    pub color: ColorChoice,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
