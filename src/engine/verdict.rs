#![forbid(unsafe_code)]

//! Per-file results and the run verdict
//!
//! Everything here is pure data and pure functions: the runner collects one
//! [`CheckResult`] per file and [`decide`] turns them into a [`Verdict`].

use crate::diagnostic::Diagnostic;
use crate::error::{ParseError, RuleError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Exit codes, following sysexits(3) for faults
pub const EXIT_OK: i32 = 0;
pub const EXIT_WARNING: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_NO_INPUT: i32 = 66;
pub const EXIT_SOFTWARE: i32 = 70;
pub const EXIT_CONFIG: i32 = 78;

/// Maximum number of warnings tolerated before the run fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningBudget {
    Unlimited,
    Max(usize),
}

impl WarningBudget {
    /// Builds a budget from the command-line value, where `-1` means unlimited
    ///
    /// Returns `None` for values below `-1`.
    pub fn from_limit(limit: i64) -> Option<Self> {
        match limit {
            -1 => Some(WarningBudget::Unlimited),
            n if n >= 0 => usize::try_from(n).ok().map(WarningBudget::Max),
            _ => None,
        }
    }

    /// Returns true if `warnings` exceeds the budget
    pub fn is_exceeded_by(&self, warnings: usize) -> bool {
        match self {
            WarningBudget::Unlimited => false,
            WarningBudget::Max(max) => warnings > *max,
        }
    }
}

impl FromStr for WarningBudget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let limit: i64 = s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a whole number"))?;
        WarningBudget::from_limit(limit).ok_or_else(|| format!("{limit} is below -1"))
    }
}

impl Default for WarningBudget {
    fn default() -> Self {
        WarningBudget::Max(0)
    }
}

/// Why a file could not be checked
#[derive(Debug, thiserror::Error)]
pub enum CheckFault {
    /// A rule rejected its configured style
    #[error(transparent)]
    Configuration(RuleError),

    #[error(transparent)]
    Rule(RuleError),

    #[error(transparent)]
    Parse(ParseError),

    /// A rule or the traversal panicked
    #[error("panic: {0}")]
    Panic(String),
}

impl CheckFault {
    /// Returns true if the fault is the user's configuration, not the code
    pub fn is_configuration(&self) -> bool {
        matches!(self, CheckFault::Configuration(_))
    }
}

impl From<RuleError> for CheckFault {
    fn from(err: RuleError) -> Self {
        if err.is_configuration() {
            CheckFault::Configuration(err)
        } else {
            CheckFault::Rule(err)
        }
    }
}

impl From<ParseError> for CheckFault {
    fn from(err: ParseError) -> Self {
        CheckFault::Parse(err)
    }
}

/// A file that could not be checked
#[derive(Debug)]
pub struct CheckFailure {
    pub file: PathBuf,
    pub fault: CheckFault,
}

/// Outcome of checking one file
#[derive(Debug)]
pub enum CheckResult {
    Checked {
        file: PathBuf,
        diagnostics: Vec<Diagnostic>,
    },
    Failed(CheckFailure),
}

impl CheckResult {
    pub fn file(&self) -> &Path {
        match self {
            CheckResult::Checked { file, .. } => file,
            CheckResult::Failed(failure) => &failure.file,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CheckResult::Failed(_))
    }
}

/// Classification of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Warning,
    Error,
    NoInput,
    SoftwareFault {
        file: PathBuf,
        detail: String,
    },
    /// `file` is `None` when the configuration failed before any file was read
    ConfigFault {
        file: Option<PathBuf>,
        detail: String,
    },
}

impl Verdict {
    /// Process exit code for this verdict
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Ok => EXIT_OK,
            Verdict::Warning => EXIT_WARNING,
            Verdict::Error => EXIT_ERROR,
            Verdict::NoInput => EXIT_NO_INPUT,
            Verdict::SoftwareFault { .. } => EXIT_SOFTWARE,
            Verdict::ConfigFault { .. } => EXIT_CONFIG,
        }
    }

    /// Returns true for verdicts that mean the run itself failed
    pub fn is_fault(&self) -> bool {
        matches!(self, Verdict::SoftwareFault { .. } | Verdict::ConfigFault { .. })
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ok => write!(f, "ok"),
            Verdict::Warning => write!(f, "too many warnings"),
            Verdict::Error => write!(f, "errors found"),
            Verdict::NoInput => write!(f, "no input files"),
            Verdict::SoftwareFault { file, detail } => {
                write!(f, "internal error while checking {}: {}", file.display(), detail)
            }
            Verdict::ConfigFault {
                file: Some(file),
                detail,
            } => write!(f, "configuration error while checking {}: {}", file.display(), detail),
            Verdict::ConfigFault { file: None, detail } => {
                write!(f, "configuration error: {}", detail)
            }
        }
    }
}

/// Classifies a fault-free diagnostic aggregate
///
/// Any error decides `Error` whatever the budget; otherwise the warning count
/// is compared against the budget.
pub fn classify(diagnostics: &[Diagnostic], budget: WarningBudget) -> Verdict {
    if diagnostics.is_empty() {
        return Verdict::Ok;
    }

    if diagnostics.iter().any(Diagnostic::is_error) {
        return Verdict::Error;
    }

    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
    if budget.is_exceeded_by(warnings) {
        Verdict::Warning
    } else {
        Verdict::Ok
    }
}

/// Decides the verdict of a run from its per-file results
///
/// The first failed file in input order decides a fault verdict, and a fault
/// discards every diagnostic. Otherwise diagnostics are flattened in input
/// order and classified.
pub fn decide(results: Vec<CheckResult>, budget: WarningBudget) -> (Verdict, Vec<Diagnostic>) {
    if results.is_empty() {
        return (Verdict::NoInput, Vec::new());
    }

    if let Some(failure) = results.iter().find_map(|result| match result {
        CheckResult::Failed(failure) => Some(failure),
        CheckResult::Checked { .. } => None,
    }) {
        return (fault_verdict(failure), Vec::new());
    }

    let diagnostics: Vec<Diagnostic> = results
        .into_iter()
        .flat_map(|result| match result {
            CheckResult::Checked { diagnostics, .. } => diagnostics,
            CheckResult::Failed(_) => Vec::new(),
        })
        .collect();

    let verdict = classify(&diagnostics, budget);
    (verdict, diagnostics)
}

fn fault_verdict(failure: &CheckFailure) -> Verdict {
    let detail = failure.fault.to_string();
    if failure.fault.is_configuration() {
        Verdict::ConfigFault {
            file: Some(failure.file.clone()),
            detail,
        }
    } else {
        Verdict::SoftwareFault {
            file: failure.file.clone(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Position, RuleName, Severity};

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            RuleName::new("space-around-comma").unwrap(),
            severity,
            Position::new(1, 1),
            "message",
        )
    }

    fn warnings(n: usize) -> Vec<Diagnostic> {
        (0..n).map(|_| diagnostic(Severity::Warning)).collect()
    }

    fn checked(file: &str, diagnostics: Vec<Diagnostic>) -> CheckResult {
        CheckResult::Checked {
            file: PathBuf::from(file),
            diagnostics,
        }
    }

    fn failed(file: &str, fault: CheckFault) -> CheckResult {
        CheckResult::Failed(CheckFailure {
            file: PathBuf::from(file),
            fault,
        })
    }

    fn invalid_style() -> CheckFault {
        CheckFault::from(RuleError::InvalidConfiguration {
            rule: "space-around-comma".to_string(),
            value: "sideways".to_string(),
        })
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Verdict::Ok.exit_code(), 0);
        assert_eq!(Verdict::Warning.exit_code(), 1);
        assert_eq!(Verdict::Error.exit_code(), 2);
        assert_eq!(Verdict::NoInput.exit_code(), 66);
        assert_eq!(
            Verdict::SoftwareFault {
                file: PathBuf::from("a.less"),
                detail: String::new()
            }
            .exit_code(),
            70
        );
        assert_eq!(
            Verdict::ConfigFault {
                file: None,
                detail: String::new()
            }
            .exit_code(),
            78
        );
    }

    #[test]
    fn test_budget_from_limit() {
        assert_eq!(WarningBudget::from_limit(-1), Some(WarningBudget::Unlimited));
        assert_eq!(WarningBudget::from_limit(0), Some(WarningBudget::Max(0)));
        assert_eq!(WarningBudget::from_limit(7), Some(WarningBudget::Max(7)));
        assert_eq!(WarningBudget::from_limit(-2), None);
    }

    #[test]
    fn test_budget_from_str() {
        assert_eq!("-1".parse(), Ok(WarningBudget::Unlimited));
        assert_eq!("25".parse(), Ok(WarningBudget::Max(25)));
        assert_eq!(
            "-2".parse::<WarningBudget>(),
            Err("-2 is below -1".to_string())
        );
        assert!("many".parse::<WarningBudget>().is_err());
    }

    #[test]
    fn test_classify_empty_is_ok() {
        assert_eq!(classify(&[], WarningBudget::Max(0)), Verdict::Ok);
    }

    #[test]
    fn test_errors_dominate_budget() {
        let mut diagnostics = warnings(1);
        diagnostics.push(diagnostic(Severity::Error));
        assert_eq!(classify(&diagnostics, WarningBudget::Unlimited), Verdict::Error);
        assert_eq!(classify(&diagnostics, WarningBudget::Max(100)), Verdict::Error);
    }

    #[test]
    fn test_budget_boundary() {
        assert_eq!(classify(&warnings(3), WarningBudget::Max(3)), Verdict::Ok);
        assert_eq!(classify(&warnings(4), WarningBudget::Max(3)), Verdict::Warning);
        assert_eq!(classify(&warnings(1), WarningBudget::Max(0)), Verdict::Warning);
        assert_eq!(classify(&warnings(500), WarningBudget::Unlimited), Verdict::Ok);
    }

    #[test]
    fn test_decide_no_results() {
        let (verdict, diagnostics) = decide(vec![], WarningBudget::Max(0));
        assert_eq!(verdict, Verdict::NoInput);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_decide_flattens_in_input_order() {
        let first = Diagnostic::new(
            RuleName::new("hex-length").unwrap(),
            Severity::Warning,
            Position::new(2, 1),
            "first",
        );
        let second = Diagnostic::new(
            RuleName::new("hex-length").unwrap(),
            Severity::Warning,
            Position::new(1, 1),
            "second",
        );
        let results = vec![
            checked("a.less", vec![first]),
            checked("b.less", vec![]),
            checked("c.less", vec![second]),
        ];

        let (verdict, diagnostics) = decide(results, WarningBudget::Unlimited);
        assert_eq!(verdict, Verdict::Ok);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_configuration_fault_discards_diagnostics() {
        let results = vec![
            checked("a.less", vec![diagnostic(Severity::Error)]),
            failed("b.less", invalid_style()),
        ];

        let (verdict, diagnostics) = decide(results, WarningBudget::Max(0));
        assert!(diagnostics.is_empty());
        match verdict {
            Verdict::ConfigFault { file, detail } => {
                assert_eq!(file, Some(PathBuf::from("b.less")));
                assert_eq!(detail, "Invalid setting value for space-around-comma: sideways");
            }
            other => panic!("Expected ConfigFault, got {other:?}"),
        }
    }

    #[test]
    fn test_first_failure_in_input_order_decides() {
        let results = vec![
            checked("a.less", vec![]),
            failed("b.less", CheckFault::Panic("boom".to_string())),
            failed("c.less", invalid_style()),
        ];

        let (verdict, _) = decide(results, WarningBudget::Max(0));
        assert_eq!(
            verdict,
            Verdict::SoftwareFault {
                file: PathBuf::from("b.less"),
                detail: "panic: boom".to_string()
            }
        );
    }

    #[test]
    fn test_parse_failure_is_software_fault() {
        let fault = CheckFault::from(ParseError::Syntax {
            line: 1,
            column: 2,
            message: "unclosed block".to_string(),
        });
        let (verdict, _) = decide(vec![failed("a.less", fault)], WarningBudget::Max(0));
        assert_eq!(verdict.exit_code(), 70);
    }

    #[test]
    fn test_rule_error_conversion() {
        assert!(invalid_style().is_configuration());
        let fault = CheckFault::from(RuleError::Malformed {
            rule: "x".to_string(),
            message: "y".to_string(),
        });
        assert!(!fault.is_configuration());
    }
}
