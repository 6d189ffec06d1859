//! Error types for stylecheck
//!
//! This module defines the error types used throughout stylecheck, following
//! a hierarchical structure with specific error variants for different
//! error categories.
//!
//! Style violations are not errors: they are [`Diagnostic`](crate::diagnostic::Diagnostic)
//! values. The types here describe faults that stop a file check or a whole run.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error while reading the configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML syntax or shape error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// JSON syntax or shape error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Semantic validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A `linters` entry names no registered rule
    #[error("Unknown linter '{0}'")]
    UnknownLinter(String),
}

/// Rule-related errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The resolved style value is not one the rule recognizes
    #[error("Invalid setting value for {rule}: {value}")]
    InvalidConfiguration { rule: String, value: String },

    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Two rules registered under the same name
    #[error("Duplicate rule name: {0}")]
    Duplicate(String),

    /// A rule met a node shape it cannot work with
    #[error("Rule {rule} failed: {message}")]
    Malformed { rule: String, message: String },
}

impl RuleError {
    /// Returns true for faults caused by configuration rather than by code
    pub fn is_configuration(&self) -> bool {
        matches!(self, RuleError::InvalidConfiguration { .. })
    }
}

/// Errors produced while turning source text into a syntax tree
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The source file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The source text is not valid stylesheet syntax
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },
}
