#![forbid(unsafe_code)]

//! Positioned style diagnostics produced by rules

use crate::types::{Position, RuleName, Severity};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single style violation reported by a rule
///
/// Diagnostics are plain data: they never abort checking, and once built they
/// are only moved, never edited. The file is attached by the file checker when
/// it assembles a file's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the rule that reported this diagnostic
    pub rule: RuleName,

    /// Severity resolved from the rule's configuration
    pub severity: Severity,

    /// Line of the offending node (1-indexed)
    pub line: u32,

    /// Column of the offending node (1-indexed)
    pub column: u32,

    /// Human-readable message describing the violation
    pub message: String,

    /// File the diagnostic belongs to, once known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Diagnostic {
    pub fn new(
        rule: RuleName,
        severity: Severity,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            severity,
            line: position.line,
            column: position.column,
            message: message.into(),
            file: None,
        }
    }

    /// Returns this diagnostic attributed to `file`
    pub fn in_file(self, file: &Path) -> Self {
        Self {
            file: Some(file.to_path_buf()),
            ..self
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}
