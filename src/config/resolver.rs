//! Resolution of the effective rule set for one run
//!
//! The resolver combines the registry with the loaded [`Config`] and decides,
//! once per run, which rules are active and with what settings. The result is
//! indexed by node kind so the dispatcher can find the rules for a node without
//! scanning the whole set.

use crate::config::{Config, RuleSettings, RuleValue};
use crate::error::ConfigError;
use crate::rules::{Rule, RuleConfig, RuleRegistry};
use crate::syntax::NodeKind;
use crate::types::RuleName;
use std::collections::{HashMap, HashSet};

/// A rule selected for the run together with its effective configuration
pub struct ActiveRule {
    pub rule: Box<dyn Rule>,
    pub config: RuleConfig,
}

impl std::fmt::Debug for ActiveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRule")
            .field("config", &self.config)
            .field("kinds", &self.rule.node_kinds())
            .finish()
    }
}

/// The enabled rules of a run, in registration order, indexed by node kind
#[derive(Debug, Default)]
pub struct ActiveRules {
    rules: Vec<ActiveRule>,
    by_kind: HashMap<NodeKind, Vec<usize>>,
}

impl ActiveRules {
    fn push(&mut self, active: ActiveRule) {
        let index = self.rules.len();
        for kind in active.rule.node_kinds() {
            let slots = self.by_kind.entry(*kind).or_default();
            // a rule listing a kind twice still runs once per node
            if slots.last() != Some(&index) {
                slots.push(index);
            }
        }
        self.rules.push(active);
    }

    /// Rules interested in `kind`, in registration order
    pub fn active_rules_for(&self, kind: NodeKind) -> impl Iterator<Item = (&dyn Rule, &RuleConfig)> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(move |&index| {
                let active = &self.rules[index];
                (active.rule.as_ref(), &active.config)
            })
    }

    /// Effective configuration of an active rule
    pub fn config(&self, name: &str) -> Option<&RuleConfig> {
        self.iter()
            .find(|active| active.config.rule.as_str() == name)
            .map(|active| &active.config)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Turns a registry and a configuration into the run's [`ActiveRules`]
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve the active rule set
    ///
    /// Built-in rules are active unless disabled. Plugin rules are active only
    /// when named in `linters`. Style values are not validated here; each rule
    /// reports a bad style when it first runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownLinter` if `linters` names a rule that is
    /// not registered.
    pub fn resolve(registry: RuleRegistry, config: &Config) -> Result<ActiveRules, ConfigError> {
        let requested = Self::requested_linters(&registry, config)?;
        Self::warn_unknown_keys(&registry, config);

        let mut active = ActiveRules::default();
        for entry in registry.into_entries() {
            if entry.plugin && !requested.contains(entry.name.as_str()) {
                tracing::debug!(rule = %entry.name, "plugin not requested");
                continue;
            }

            let rule_config = resolve_rule_config(
                &entry.name,
                entry.rule.default_style(),
                &config.rule_entries(&entry.name),
            );

            if !rule_config.enabled {
                tracing::debug!(rule = %entry.name, "rule disabled");
                continue;
            }

            tracing::debug!(
                rule = %entry.name,
                severity = %rule_config.severity,
                style = rule_config.style.as_deref().unwrap_or("-"),
                "rule active"
            );
            active.push(ActiveRule {
                rule: entry.rule,
                config: rule_config,
            });
        }

        Ok(active)
    }

    /// Canonical names of the plugins listed in `linters`
    fn requested_linters(registry: &RuleRegistry, config: &Config) -> Result<HashSet<String>, ConfigError> {
        let mut requested = HashSet::new();
        for linter in &config.linters {
            let entry = registry
                .iter()
                .find(|entry| entry.name.as_str() == linter || entry.name.camel_case_alias() == *linter)
                .ok_or_else(|| ConfigError::UnknownLinter(linter.clone()))?;
            requested.insert(entry.name.to_string());
        }
        Ok(requested)
    }

    fn warn_unknown_keys(registry: &RuleRegistry, config: &Config) {
        for key in config.rules.keys() {
            let known = registry
                .iter()
                .any(|entry| entry.name.as_str() == key || entry.name.camel_case_alias() == *key);
            if !known {
                tracing::warn!("Ignoring configuration for unknown rule '{}'", key);
            }
        }
    }
}

/// Effective configuration of one rule from its raw entries
///
/// `entries` holds the values found under the canonical name and its alias,
/// canonical first. A settings table beats the boolean shorthand; when both
/// appear, the shorthand is ignored with a warning. Among entries of the same
/// form the first one wins.
pub fn resolve_rule_config(name: &RuleName, default_style: Option<&str>, entries: &[&RuleValue]) -> RuleConfig {
    let settings = entries.iter().find_map(|value| match value {
        RuleValue::Settings(settings) => Some(settings),
        RuleValue::Enabled(_) => None,
    });
    let shorthand = entries.iter().find_map(|value| match value {
        RuleValue::Enabled(enabled) => Some(*enabled),
        RuleValue::Settings(_) => None,
    });

    let mut rule_config = RuleConfig::new(name.clone());
    if let Some(style) = default_style {
        rule_config.style = Some(style.to_string());
    }

    match (settings, shorthand) {
        (Some(settings), shorthand) => {
            if let Some(enabled) = shorthand {
                tracing::warn!(
                    rule = %name,
                    "Ignoring '{} = {}' because the rule also has a settings table",
                    name,
                    enabled
                );
            }
            apply_settings(&mut rule_config, settings);
        }
        (None, Some(enabled)) => rule_config.enabled = enabled,
        (None, None) => {}
    }

    rule_config
}

fn apply_settings(rule_config: &mut RuleConfig, settings: &RuleSettings) {
    rule_config.enabled = settings.enabled.unwrap_or(true);
    rule_config.severity = settings.severity.unwrap_or_default();
    if let Some(style) = &settings.style {
        rule_config.style = Some(style.clone());
    }
}
