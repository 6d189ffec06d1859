#![forbid(unsafe_code)]

//! Traversal dispatcher
//!
//! Walks a syntax tree depth-first in pre-order and hands every node to the
//! active rules interested in its kind.

use crate::config::ActiveRules;
use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::syntax::SyntaxNode;

/// Runs the active rules of a run over one syntax tree
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    rules: &'a ActiveRules,
}

impl<'a> Dispatcher<'a> {
    pub fn new(rules: &'a ActiveRules) -> Self {
        Self { rules }
    }

    /// Visits every node of `root` once and collects the rules' diagnostics
    ///
    /// Diagnostics appear in traversal order, then rule registration order,
    /// then the order each rule returned them.
    ///
    /// # Errors
    ///
    /// The first `RuleError` stops the traversal and is returned as is.
    pub fn traverse(&self, root: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        let mut diagnostics = Vec::new();

        for node in root.iter() {
            for (rule, config) in self.rules.active_rules_for(node.kind) {
                diagnostics.extend(rule.check(config, node)?);
            }
        }

        Ok(diagnostics)
    }
}
