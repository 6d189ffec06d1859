//! Rule dispatch, per-file checking and run orchestration

pub mod dispatcher;
pub mod file_checker;
pub mod file_walker;
pub mod runner;
pub mod verdict;

pub use dispatcher::Dispatcher;
pub use file_checker::FileChecker;
pub use file_walker::{FileWalker, FileWalkerError};
pub use runner::{RunOutcome, Runner};
pub use verdict::{CheckFailure, CheckFault, CheckResult, Verdict, WarningBudget};
