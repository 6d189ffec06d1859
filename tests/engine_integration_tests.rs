//! Integration tests for the execution engine
//!
//! This test suite verifies the complete execution pipeline:
//! - Rule resolution with ConfigResolver
//! - Parallel file checking with Runner
//! - Ordered aggregation and the verdict policy
//! - Fault isolation (configuration vs software faults)
//! - Plugin rules registered next to the built-in catalog

mod common;

use common::create_test_file;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use stylecheck::diagnostic::Diagnostic;
use stylecheck::syntax::{LessParser, NodeKind, StylesheetParser, SyntaxNode};
use stylecheck::{
    Config, ConfigResolver, ParseError, Position, Rule, RuleConfig, RuleError, RuleRegistry, Runner,
    Verdict, WarningBudget,
};
use tempfile::TempDir;

/// Parser that counts calls and can be slowed down per file
///
/// A source starting with `/* delay:N */` sleeps N milliseconds before
/// parsing, so files finish in a different order than they were given.
#[derive(Default)]
struct CountingParser {
    calls: AtomicUsize,
}

impl StylesheetParser for CountingParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(rest) = source.strip_prefix("/* delay:")
            && let Some((millis, _)) = rest.split_once(' ')
            && let Ok(millis) = millis.parse::<u64>()
        {
            thread::sleep(Duration::from_millis(millis));
        }
        LessParser::new().parse(source)
    }
}

/// Plugin that flags every `!important`
struct NoImportant;

impl Rule for NoImportant {
    fn name(&self) -> &str {
        "no-important"
    }

    fn description(&self) -> &str {
        "Disallow !important"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Ident]
    }

    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        if node.content.eq_ignore_ascii_case("!important") {
            Ok(vec![config.diagnostic(node.position, "!important should not be used.")])
        } else {
            Ok(vec![])
        }
    }
}

/// Plugin that panics on every color
struct Exploding;

impl Rule for Exploding {
    fn name(&self) -> &str {
        "exploding"
    }

    fn description(&self) -> &str {
        "Panics"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Color]
    }

    fn check(&self, _config: &RuleConfig, _node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        panic!("exploding rule");
    }
}

/// Parser that yields a declaration with no property
struct ShapelessParser;

impl StylesheetParser for ShapelessParser {
    fn parse(&self, _source: &str) -> Result<SyntaxNode, ParseError> {
        let declaration = SyntaxNode::branch(NodeKind::Declaration, Position::new(1, 1), vec![]);
        Ok(SyntaxNode::branch(NodeKind::Stylesheet, Position::new(1, 1), vec![declaration]))
    }
}

fn builtin_runner(config: &str, parser: Arc<dyn StylesheetParser>) -> Runner {
    let config = Config::parse(config).unwrap();
    let rules = ConfigResolver::resolve(RuleRegistry::with_builtin_rules(), &config).unwrap();
    Runner::new(Arc::new(rules), parser)
}

fn plugin_runner(config: &str) -> Runner {
    let mut registry = RuleRegistry::with_builtin_rules();
    registry.register_plugin(Box::new(NoImportant)).unwrap();
    registry.register_plugin(Box::new(Exploding)).unwrap();
    let rules = ConfigResolver::resolve(registry, &Config::parse(config).unwrap()).unwrap();
    Runner::new(Arc::new(rules), Arc::new(LessParser::new()))
}

#[test]
fn test_no_input_never_invokes_parser() {
    let parser = Arc::new(CountingParser::default());
    let runner = builtin_runner("", parser.clone());

    let outcome = runner.run(&[], WarningBudget::Max(0));

    assert_eq!(outcome.verdict, Verdict::NoInput);
    assert_eq!(outcome.verdict.exit_code(), 66);
    assert!(outcome.diagnostics.is_empty());
    assert_eq!(parser.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_every_file_parsed_once() {
    let temp_dir = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (0..10)
        .map(|i| create_test_file(temp_dir.path(), &format!("f{i}.less"), ".a { color: red; }"))
        .collect();

    let parser = Arc::new(CountingParser::default());
    let outcome = builtin_runner("", parser.clone()).run(&files, WarningBudget::Max(0));

    assert_eq!(outcome.verdict, Verdict::Ok);
    assert_eq!(outcome.files_checked, 10);
    assert_eq!(parser.calls.load(Ordering::SeqCst), 10);
}

#[test]
fn test_aggregate_order_follows_input_not_completion() {
    let temp_dir = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (0..8u64)
        .map(|i| {
            // earlier files sleep longer, so they complete last
            let delay = (8 - i) * 15;
            create_test_file(
                temp_dir.path(),
                &format!("f{i}.less"),
                &format!("/* delay:{delay} */\n.a {{ color: #abc; }}\n"),
            )
        })
        .collect();

    let outcome = builtin_runner("", Arc::new(CountingParser::default())).run(&files, WarningBudget::Max(0));

    assert_eq!(outcome.verdict, Verdict::Error);
    let reported: Vec<PathBuf> = outcome
        .diagnostics
        .iter()
        .map(|d| d.file.clone().unwrap())
        .collect();
    assert_eq!(reported, files);
}

#[test]
fn test_within_file_order_is_traversal_order() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(
        temp_dir.path(),
        "a.less",
        ".a {\n  border: 0;\n  color: #abc;\n  margin : rgb(1,2,3);\n}\n",
    );

    let outcome = builtin_runner("", Arc::new(LessParser::new())).run(&[file], WarningBudget::Max(0));

    let rules: Vec<&str> = outcome.diagnostics.iter().map(|d| d.rule.as_str()).collect();
    assert_eq!(
        rules,
        vec![
            "border-zero",
            "hex-length",
            "space-after-property-name",
            "space-around-comma",
            "space-around-comma"
        ]
    );
    let lines: Vec<u32> = outcome.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 3, 4, 4, 4]);
}

#[test]
fn test_config_fault_in_later_file_discards_everything() {
    let temp_dir = TempDir::new().unwrap();
    // the first file has no value nodes, so the comma rule never runs on it
    let a = create_test_file(temp_dir.path(), "a.less", ".a { }\n");
    let b = create_test_file(temp_dir.path(), "b.less", ".b { color: red; }\n");

    let runner = builtin_runner(
        "[space-around-comma]\nstyle = \"sideways\"\n",
        Arc::new(LessParser::new()),
    );
    let outcome = runner.run(&[a, b.clone()], WarningBudget::Unlimited);

    match &outcome.verdict {
        Verdict::ConfigFault { file, detail } => {
            assert_eq!(file.as_ref(), Some(&b));
            assert!(detail.contains("space-around-comma"));
            assert!(detail.contains("sideways"));
        }
        other => panic!("Expected ConfigFault, got {other:?}"),
    }
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_rule_panic_is_software_fault() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(temp_dir.path(), "a.less", ".a { color: #fff; }\n");

    let outcome = plugin_runner("linters = [\"exploding\"]\n").run(&[file.clone()], WarningBudget::Max(0));

    assert_eq!(
        outcome.verdict,
        Verdict::SoftwareFault {
            file,
            detail: "panic: exploding rule".to_string()
        }
    );
    assert_eq!(outcome.verdict.exit_code(), 70);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_malformed_tree_is_software_fault() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(temp_dir.path(), "a.less", "a { color: red; }\n");

    let outcome = builtin_runner("", Arc::new(ShapelessParser)).run(&[file.clone()], WarningBudget::Max(0));

    match &outcome.verdict {
        Verdict::SoftwareFault { file: failed, detail } => {
            assert_eq!(failed, &file);
            assert!(detail.contains("declaration without property"));
        }
        other => panic!("Expected SoftwareFault, got {other:?}"),
    }
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn test_plugins_run_only_when_requested() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(temp_dir.path(), "a.less", ".a { color: red !important; }\n");

    let outcome = plugin_runner("").run(&[file.clone()], WarningBudget::Max(0));
    assert_eq!(outcome.verdict, Verdict::Ok);

    let outcome = plugin_runner("linters = [\"no-important\"]\n[no-important]\nseverity = \"warning\"\n")
        .run(&[file], WarningBudget::Max(0));
    assert_eq!(outcome.verdict, Verdict::Warning);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].rule.as_str(), "no-important");
}

#[test]
fn test_runner_is_reusable() {
    let temp_dir = TempDir::new().unwrap();
    let file = create_test_file(temp_dir.path(), "a.less", ".a { color: #abc; }\n");
    let runner = builtin_runner("", Arc::new(LessParser::new()));

    let first = runner.run(&[file.clone()], WarningBudget::Max(0));
    let second = runner.run(&[file], WarningBudget::Max(0));
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.diagnostics, second.diagnostics);
}
