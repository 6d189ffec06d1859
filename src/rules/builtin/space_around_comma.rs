//! `space-around-comma`: whitespace around commas in values and argument lists

use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::rules::{Rule, RuleConfig};
use crate::syntax::{NodeKind, SyntaxNode};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    After,
    Before,
    Both,
    None,
}

impl FromStr for Style {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "after" => Ok(Style::After),
            "before" => Ok(Style::Before),
            "both" => Ok(Style::Both),
            "none" => Ok(Style::None),
            _ => Err(()),
        }
    }
}

/// Whitespace text of a sibling, with line breaks removed
///
/// Line breaks do not count as spacing. The text is copied; the tree is left
/// untouched.
fn spacing(node: Option<&SyntaxNode>) -> Option<String> {
    node.filter(|n| n.is(NodeKind::Space))
        .map(|n| n.content.replace(['\n', '\r'], ""))
}

fn is_one_space(spacing: &Option<String>) -> bool {
    spacing.as_deref() == Some(" ")
}

fn has_space(spacing: &Option<String>) -> bool {
    spacing.as_deref().is_some_and(|s| !s.is_empty())
}

/// Commas should be surrounded by whitespace as configured
///
/// Checks the direct children of every value, argument list and parenthesized
/// list, which covers function arguments, mixin parameters and LESS lists.
/// Selector lists are not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceAroundComma;

impl Rule for SpaceAroundComma {
    fn name(&self) -> &str {
        "space-around-comma"
    }

    fn description(&self) -> &str {
        "Controls the space before and after commas"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Value, NodeKind::Arguments, NodeKind::Parentheses]
    }

    fn default_style(&self) -> Option<&str> {
        Some("after")
    }

    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        let style = config.style::<Style>()?;
        let mut diagnostics = Vec::new();

        for (index, comma) in node.children.iter().enumerate() {
            if !(comma.is(NodeKind::Operator) && comma.content == ",") {
                continue;
            }

            let before = spacing(index.checked_sub(1).and_then(|i| node.children.get(i)));
            let after = spacing(node.children.get(index + 1));

            let message = match style {
                Style::After if !is_one_space(&after) => {
                    Some("Commas should be followed by one space.")
                }
                Style::Before if !is_one_space(&before) => {
                    Some("Commas should be preceded by one space.")
                }
                Style::Both if !is_one_space(&before) || !is_one_space(&after) => {
                    Some("Commas should be preceded and followed by one space.")
                }
                Style::None if has_space(&before) || has_space(&after) => {
                    Some("Commas should not be preceded nor followed by any space.")
                }
                _ => None,
            };

            if let Some(message) = message {
                diagnostics.push(config.diagnostic(comma.position, message));
            }
        }

        Ok(diagnostics)
    }
}
