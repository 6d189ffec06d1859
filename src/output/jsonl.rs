#![forbid(unsafe_code)]

//! JSONL reporter for machine-readable output
//!
//! Outputs one JSON object per diagnostic, in the order the run produced them.

use crate::diagnostic::Diagnostic;
use crate::output::Reporter;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use termcolor::WriteColor;

/// JSONL reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlReporter;

impl JsonlReporter {
    pub fn new() -> Self {
        JsonlReporter
    }
}

/// Diagnostic record for JSONL output
#[derive(Debug, Serialize)]
struct DiagnosticRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a Path>,
    line: u32,
    column: u32,
    rule: &'a str,
    severity: &'a str,
    message: &'a str,
}

impl<'a> From<&'a Diagnostic> for DiagnosticRecord<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        Self {
            file: diagnostic.file.as_deref(),
            line: diagnostic.line,
            column: diagnostic.column,
            rule: diagnostic.rule.as_str(),
            severity: diagnostic.severity.as_str(),
            message: &diagnostic.message,
        }
    }
}

impl Reporter for JsonlReporter {
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn WriteColor) -> io::Result<()> {
        for diagnostic in diagnostics {
            let json = serde_json::to_string(&DiagnosticRecord::from(diagnostic))?;
            writeln!(out, "{}", json)?;
        }
        out.flush()
    }
}
