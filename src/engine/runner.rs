#![forbid(unsafe_code)]

//! Parallel orchestration of a whole run
//!
//! The Runner fans the file list out over rayon, one task per file, collects
//! the per-file results back in input order and hands them to the verdict
//! policy.

use crate::config::ActiveRules;
use crate::diagnostic::Diagnostic;
use crate::engine::file_checker::FileChecker;
use crate::engine::verdict::{self, CheckResult, Verdict, WarningBudget};
use crate::syntax::StylesheetParser;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of a whole run
#[derive(Debug)]
pub struct RunOutcome {
    pub verdict: Verdict,
    /// Every diagnostic in file order, then traversal order; empty on a fault
    pub diagnostics: Vec<Diagnostic>,
    pub files_checked: usize,
}

/// Checks files in parallel with one shared rule set and parser
///
/// The rule set and parser are read-only and shared by every worker.
pub struct Runner {
    rules: Arc<ActiveRules>,
    parser: Arc<dyn StylesheetParser>,
}

impl Runner {
    pub fn new(rules: Arc<ActiveRules>, parser: Arc<dyn StylesheetParser>) -> Self {
        Self { rules, parser }
    }

    /// Checks `files` and decides the verdict
    ///
    /// An empty file list is `NoInput` and nothing is parsed. Once a file
    /// fails, files that have not started yet are skipped; the verdict only
    /// depends on failures, so their results are not needed.
    pub fn run(&self, files: &[PathBuf], budget: WarningBudget) -> RunOutcome {
        if files.is_empty() {
            tracing::debug!("no input files");
            return RunOutcome {
                verdict: Verdict::NoInput,
                diagnostics: Vec::new(),
                files_checked: 0,
            };
        }

        tracing::debug!(files = files.len(), rules = self.rules.len(), "starting run");

        let aborted = AtomicBool::new(false);
        let checker = FileChecker::new(&self.rules);
        let parser = self.parser.as_ref();

        let slots: Vec<Option<CheckResult>> = files
            .par_iter()
            .map(|file| {
                if aborted.load(Ordering::Relaxed) {
                    return None;
                }
                let result = checker.check_path(file, parser);
                if result.is_failed() {
                    aborted.store(true, Ordering::Relaxed);
                }
                Some(result)
            })
            .collect();

        let results: Vec<CheckResult> = slots.into_iter().flatten().collect();
        let files_checked = results.len();
        let (verdict, diagnostics) = verdict::decide(results, budget);

        tracing::debug!(%verdict, diagnostics = diagnostics.len(), files_checked, "run finished");

        RunOutcome {
            verdict,
            diagnostics,
            files_checked,
        }
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("rules", &self.rules.len())
            .finish_non_exhaustive()
    }
}
