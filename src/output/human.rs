#![forbid(unsafe_code)]

//! Human-readable reporter
//!
//! One line per diagnostic:
//!
//! ```text
//! Warning: src/site.less: line 3, col 15, space-around-comma: Commas should be followed by one space.
//! ```

use crate::diagnostic::Diagnostic;
use crate::output::Reporter;
use crate::types::Severity;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable reporter with coloured severities
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanReporter;

impl HumanReporter {
    pub fn new() -> Self {
        HumanReporter
    }

    fn severity_color(severity: Severity) -> ColorSpec {
        let mut spec = ColorSpec::new();
        match severity {
            Severity::Error => spec.set_fg(Some(Color::Red)).set_bold(true),
            Severity::Warning => spec.set_fg(Some(Color::Yellow)).set_bold(true),
        };
        spec
    }

    fn severity_label(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }
}

impl Reporter for HumanReporter {
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn WriteColor) -> io::Result<()> {
        for diagnostic in diagnostics {
            out.set_color(&Self::severity_color(diagnostic.severity))?;
            write!(out, "{}", Self::severity_label(diagnostic.severity))?;
            out.reset()?;
            write!(out, ": ")?;

            if let Some(file) = &diagnostic.file {
                write!(out, "{}: ", file.display())?;
            }

            writeln!(
                out,
                "line {}, col {}, {}: {}",
                diagnostic.line, diagnostic.column, diagnostic.rule, diagnostic.message
            )?;
        }
        out.flush()
    }
}
