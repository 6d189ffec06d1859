#![forbid(unsafe_code)]

//! Rule definitions and registry

pub mod builtin;
mod registry;
mod rule;

// Re-export core types
pub use registry::{RegisteredRule, RuleRegistry};
pub use rule::{Rule, RuleConfig};
