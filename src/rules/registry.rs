#![forbid(unsafe_code)]

//! Rule registry for managing rules
//!
//! The RuleRegistry is responsible for:
//! - Holding every known rule in registration order
//! - Rejecting malformed or duplicate rule definitions
//! - Distinguishing always-on rules from dormant plugin rules
//!
//! Which rules actually run, and with which settings, is decided later by the
//! [`ConfigResolver`](crate::config::ConfigResolver).

use crate::error::RuleError;
use crate::rules::{Rule, builtin};
use crate::types::RuleName;

/// A registered rule together with its registration metadata
pub struct RegisteredRule {
    pub name: RuleName,
    pub rule: Box<dyn Rule>,
    /// Plugin rules stay dormant unless named in the `linters` setting
    pub plugin: bool,
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("name", &self.name)
            .field("kinds", &self.rule.node_kinds())
            .field("plugin", &self.plugin)
            .finish()
    }
}

/// Ordered table of rules
///
/// Registration order is preserved and decides the order in which rules run
/// on a node, which makes diagnostic order reproducible.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
}

impl RuleRegistry {
    /// Create a new empty RuleRegistry
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a registry holding the built-in rule catalog
    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        for rule in builtin::builtin_rules() {
            // built-in names are valid and unique; a failure here is a bug in the catalog
            if let Err(e) = registry.register(rule) {
                tracing::error!("Failed to register built-in rule: {}", e);
            }
        }
        registry
    }

    /// Register an always-on rule
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if the name is invalid, the rule declares no node
    /// kinds, or a rule with the same name is already registered.
    pub fn register(&mut self, rule: Box<dyn Rule>) -> Result<(), RuleError> {
        self.insert(rule, false)
    }

    /// Register a plugin rule that only runs when named in `linters`
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn register_plugin(&mut self, rule: Box<dyn Rule>) -> Result<(), RuleError> {
        self.insert(rule, true)
    }

    fn insert(&mut self, rule: Box<dyn Rule>, plugin: bool) -> Result<(), RuleError> {
        let name = RuleName::new(rule.name()).ok_or_else(|| {
            RuleError::InvalidDefinition(format!("invalid rule name '{}'", rule.name()))
        })?;

        if rule.node_kinds().is_empty() {
            return Err(RuleError::InvalidDefinition(format!(
                "rule '{}' declares no node kinds",
                name
            )));
        }

        if self.get(name.as_str()).is_some() {
            return Err(RuleError::Duplicate(name.to_string()));
        }

        tracing::debug!(rule = %name, plugin, "registered rule");
        self.rules.push(RegisteredRule { name, rule, plugin });
        Ok(())
    }

    /// Get a registered rule by name
    pub fn get(&self, name: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|entry| entry.name.as_str() == name)
    }

    /// Iterate over all rules in registration order
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule> {
        self.rules.iter()
    }

    /// Consume the registry, yielding rules in registration order
    pub fn into_entries(self) -> Vec<RegisteredRule> {
        self.rules
    }

    /// Get the number of rules in the registry
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
