#![forbid(unsafe_code)]

//! Core Rule trait and the resolved per-rule configuration

use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::syntax::{NodeKind, SyntaxNode};
use crate::types::{Position, RuleName, Severity};
use std::str::FromStr;

/// Effective configuration of one rule for a whole run
///
/// Built once by the config resolver and shared read-only by every file
/// check, so a rule sees the same settings for every node it is asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    /// Rule this configuration belongs to
    pub rule: RuleName,

    pub enabled: bool,

    /// Severity attached to every diagnostic the rule reports
    pub severity: Severity,

    /// Style variant; the rule's own default when not configured
    pub style: Option<String>,
}

impl RuleConfig {
    /// Default configuration: enabled, `error` severity, no style
    pub fn new(rule: RuleName) -> Self {
        Self {
            rule,
            enabled: true,
            severity: Severity::Error,
            style: None,
        }
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Parses the style value into the rule's own enumeration
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidConfiguration` if the style is missing or not
    /// one of the values `T` recognizes.
    pub fn style<T: FromStr>(&self) -> Result<T, RuleError> {
        let value = self.style.as_deref().unwrap_or_default();
        value
            .parse()
            .map_err(|_| RuleError::InvalidConfiguration {
                rule: self.rule.to_string(),
                value: value.to_string(),
            })
    }

    /// Builds a diagnostic attributed to this rule with the configured severity
    pub fn diagnostic(&self, position: Position, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.rule.clone(), self.severity, position, message)
    }
}

/// Trait that all rules must implement
///
/// Rules are stateless predicates over syntax nodes. The trait is
/// `Send + Sync` so one registry can serve files checked in parallel.
pub trait Rule: Send + Sync {
    /// Returns the unique name used for configuration lookup and attribution
    fn name(&self) -> &str;

    /// Returns a human-readable description of what this rule checks
    fn description(&self) -> &str;

    /// Returns the node kinds this rule wants to see (never empty)
    fn node_kinds(&self) -> &[NodeKind];

    /// Returns the style used when the configuration does not set one
    fn default_style(&self) -> Option<&str> {
        None
    }

    /// Checks one node
    ///
    /// Returns an empty vector when the node is fine or not relevant to the
    /// rule. Fails with `RuleError::InvalidConfiguration` when the configured
    /// style is not one the rule knows.
    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Side {
        Left,
        Right,
    }

    impl FromStr for Side {
        type Err = ();

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "left" => Ok(Side::Left),
                "right" => Ok(Side::Right),
                _ => Err(()),
            }
        }
    }

    fn config() -> RuleConfig {
        RuleConfig::new(RuleName::new("test-rule").unwrap())
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert!(config.enabled);
        assert_eq!(config.severity, Severity::Error);
        assert!(config.style.is_none());
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(config().with_style("left").style::<Side>().unwrap(), Side::Left);
        assert_eq!(config().with_style("right").style::<Side>().unwrap(), Side::Right);
    }

    #[test]
    fn test_unknown_style_is_invalid_configuration() {
        let err = config().with_style("sideways").style::<Side>().unwrap_err();
        match err {
            RuleError::InvalidConfiguration { rule, value } => {
                assert_eq!(rule, "test-rule");
                assert_eq!(value, "sideways");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_style_is_invalid_configuration() {
        assert!(config().style::<Side>().unwrap_err().is_configuration());
    }

    #[test]
    fn test_diagnostic_uses_configured_severity() {
        let config = config().with_severity(Severity::Warning);
        let diagnostic = config.diagnostic(Position::new(2, 3), "message");
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert_eq!(diagnostic.rule.as_str(), "test-rule");
        assert_eq!(diagnostic.line, 2);
        assert_eq!(diagnostic.column, 3);
    }

    struct MockRule;

    impl Rule for MockRule {
        fn name(&self) -> &str {
            "mock"
        }

        fn description(&self) -> &str {
            "Mock rule"
        }

        fn node_kinds(&self) -> &[NodeKind] {
            &[NodeKind::Declaration]
        }

        fn check(&self, _config: &RuleConfig, _node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_rule_trait_defaults() {
        let rule = MockRule;
        assert!(rule.default_style().is_none());
        assert_eq!(rule.node_kinds(), &[NodeKind::Declaration]);
    }

    #[test]
    fn test_rule_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Box<dyn Rule>>();
        assert_sync::<Box<dyn Rule>>();
    }
}
