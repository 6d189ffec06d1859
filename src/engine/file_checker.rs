#![forbid(unsafe_code)]

//! Checking of a single file

use crate::config::ActiveRules;
use crate::engine::dispatcher::Dispatcher;
use crate::engine::verdict::{CheckFailure, CheckFault, CheckResult};
use crate::syntax::{StylesheetParser, SyntaxNode};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Runs the active rules over one file and packages the outcome
#[derive(Debug, Clone, Copy)]
pub struct FileChecker<'a> {
    rules: &'a ActiveRules,
}

impl<'a> FileChecker<'a> {
    pub fn new(rules: &'a ActiveRules) -> Self {
        Self { rules }
    }

    /// Checks an already parsed tree
    ///
    /// Never fails: rule errors and panics raised while traversing are turned
    /// into a [`CheckResult::Failed`].
    pub fn check(&self, file: &Path, root: &SyntaxNode) -> CheckResult {
        let dispatcher = Dispatcher::new(self.rules);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| dispatcher.traverse(root)));

        match outcome {
            Ok(Ok(diagnostics)) => {
                tracing::debug!(
                    file = %file.display(),
                    diagnostics = diagnostics.len(),
                    "checked file"
                );
                CheckResult::Checked {
                    file: file.to_path_buf(),
                    diagnostics: diagnostics.into_iter().map(|d| d.in_file(file)).collect(),
                }
            }
            Ok(Err(err)) => failed(file, CheckFault::from(err)),
            Err(payload) => failed(file, CheckFault::Panic(panic_message(payload.as_ref()))),
        }
    }

    /// Parses `file` with `parser`, then checks it
    pub fn check_path(&self, file: &Path, parser: &dyn StylesheetParser) -> CheckResult {
        match panic::catch_unwind(AssertUnwindSafe(|| parser.parse_file(file))) {
            Ok(Ok(root)) => self.check(file, &root),
            Ok(Err(err)) => failed(file, CheckFault::from(err)),
            Err(payload) => failed(file, CheckFault::Panic(panic_message(payload.as_ref()))),
        }
    }
}

fn failed(file: &Path, fault: CheckFault) -> CheckResult {
    tracing::debug!(file = %file.display(), fault = %fault, "file check failed");
    CheckResult::Failed(CheckFailure {
        file: file.to_path_buf(),
        fault,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
