//! Output reporters (human and JSONL)
//!
//! A reporter only formats; deciding whether to report at all belongs to the
//! caller. Reporters write to a [`WriteColor`] so colour handling stays with
//! the terminal setup.

pub mod human;
pub mod jsonl;

pub use human::HumanReporter;
pub use jsonl::JsonlReporter;

use crate::diagnostic::Diagnostic;
use std::io;
use termcolor::WriteColor;

/// Formats the diagnostics of a run
pub trait Reporter {
    /// Writes every diagnostic, in the order given
    fn report(&self, diagnostics: &[Diagnostic], out: &mut dyn WriteColor) -> io::Result<()>;
}
