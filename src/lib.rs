#![forbid(unsafe_code)]

//! Stylecheck: a configurable style linter for LESS and CSS stylesheets
//!
//! Stylesheets are parsed into a [`SyntaxNode`] tree, walked depth-first, and
//! every node is handed to the rules registered for its kind. The diagnostics
//! of all files are then classified against a warning budget into a single
//! [`Verdict`] that maps onto the process exit code.
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use stylecheck::{Config, ConfigResolver, LessParser, RuleRegistry, Runner, WarningBudget};
//!
//! let config = Config::default();
//! let rules = ConfigResolver::resolve(RuleRegistry::with_builtin_rules(), &config)?;
//! let runner = Runner::new(Arc::new(rules), Arc::new(LessParser::new()));
//! let outcome = runner.run(&[PathBuf::from("site.less")], WarningBudget::Max(0));
//! std::process::exit(outcome.verdict.exit_code());
//! # Ok::<(), stylecheck::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod output;
pub mod rules;
pub mod syntax;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, ParseError, RuleError};

// Re-export core domain types for convenient access
pub use config::{ActiveRules, Config, ConfigResolver};
pub use diagnostic::Diagnostic;
pub use engine::{CheckResult, Runner, Verdict, WarningBudget};
pub use rules::{Rule, RuleConfig, RuleRegistry};
pub use syntax::{LessParser, NodeKind, StylesheetParser, SyntaxNode};
pub use types::{GlobPattern, Position, RuleName, Severity};
