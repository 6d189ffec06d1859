//! Parsing and validation for stylecheck configuration files
//!
//! The native format is TOML (`stylecheck.toml`). JSON is accepted as well so
//! existing `.lesshintrc` files keep working; the shape is the same in both:
//!
//! ```toml
//! excluded_files = ["vendor/**"]
//! file_extensions = [".less"]
//! linters = []
//! hex-length = false
//!
//! [space-around-comma]
//! style = "after"
//! severity = "warning"
//! ```
//!
//! Every key that is not one of the global settings is a rule entry.

use crate::error::ConfigError;
use crate::types::{GlobPattern, RuleName, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// File read from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "stylecheck.toml";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Files matching these patterns are never checked
    #[serde(default, alias = "excludedFiles")]
    pub excluded_files: Vec<GlobPattern>,

    /// Extensions of files picked up when walking directories
    #[serde(default = "default_file_extensions", alias = "fileExtensions")]
    pub file_extensions: Vec<String>,

    /// Plugin rules to switch on
    #[serde(default)]
    pub linters: Vec<String>,

    /// Per-rule entries keyed by rule name
    #[serde(flatten)]
    pub rules: BTreeMap<String, RuleValue>,
}

fn default_file_extensions() -> Vec<String> {
    vec![".less".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_files: Vec::new(),
            file_extensions: default_file_extensions(),
            linters: Vec::new(),
            rules: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML or JSON file
    ///
    /// JSON is used for `.json` files and for `.lesshintrc`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_json = path.extension().is_some_and(|ext| ext == "json")
            || path.file_name().is_some_and(|name| name == ".lesshintrc");

        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a JSON string
    pub fn parse_json(s: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line additions on top of the file configuration
    pub fn with_overrides(mut self, exclude: &[String], linters: &[String]) -> Result<Self, ConfigError> {
        self.excluded_files
            .extend(exclude.iter().map(|pattern| GlobPattern::new(pattern.as_str())));
        self.linters.extend(linters.iter().cloned());
        self.validate()?;
        Ok(self)
    }

    /// Raw entries that apply to a rule, canonical name first
    ///
    /// A rule can be configured under its kebab-case name and under the
    /// camelCase spelling (`space-around-comma` / `spaceAroundComma`).
    pub fn rule_entries(&self, name: &RuleName) -> Vec<&RuleValue> {
        let alias = name.camel_case_alias();
        let mut entries: Vec<&RuleValue> = self.rules.get(name.as_str()).into_iter().collect();
        if alias != name.as_str() {
            entries.extend(self.rules.get(&alias));
        }
        entries
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        for pattern in &self.excluded_files {
            globset::Glob::new(pattern.as_str()).map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid excluded_files glob pattern '{}': {}",
                    pattern.as_str(),
                    e
                ))
            })?;
        }

        for extension in &self.file_extensions {
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "Invalid file extension '{}'. Extensions start with a dot, e.g. \".less\"",
                    extension
                )));
            }
        }

        for name in self.rules.keys() {
            if RuleName::new(name.as_str()).is_none() {
                return Err(ConfigError::Validation(format!(
                    "Invalid rule name '{}'",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// A rule can be switched with a boolean or configured with settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// Shorthand enable/disable
    Enabled(bool),
    /// Settings table for the rule
    Settings(RuleSettings),
}

/// Settings for individual rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Severity level for this rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Rule-specific style variant, validated by the rule itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}
