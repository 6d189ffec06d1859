//! Configuration file parsing and per-run rule resolution

pub mod resolver;
pub mod stylecheck_toml;

pub use resolver::{ActiveRule, ActiveRules, ConfigResolver};
pub use stylecheck_toml::{Config, DEFAULT_CONFIG_FILE, RuleSettings, RuleValue};
