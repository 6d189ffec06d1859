//! CLI argument parsing and the check entry point

pub mod args;
pub mod check;
mod common;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, OutputFormat};
pub use check::run_check;
