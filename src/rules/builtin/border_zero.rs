//! `border-zero`: consistent spelling of an empty border

use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::rules::{Rule, RuleConfig};
use crate::syntax::{NodeKind, SyntaxNode};
use std::str::FromStr;

const BORDER_PROPERTIES: &[&str] = &[
    "border",
    "border-bottom",
    "border-left",
    "border-right",
    "border-top",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    None,
    Zero,
}

impl FromStr for Style {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Style::None),
            "zero" => Ok(Style::Zero),
            _ => Err(()),
        }
    }
}

/// Border properties should use either `none` or `0`, per the configured style
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderZero;

impl Rule for BorderZero {
    fn name(&self) -> &str {
        "border-zero"
    }

    fn description(&self) -> &str {
        "Border properties should consistently use 0 or none"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Declaration]
    }

    fn default_style(&self) -> Option<&str> {
        Some("none")
    }

    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        let Some(property) = node.first(NodeKind::Property) else {
            return Ok(vec![]);
        };
        if !BORDER_PROPERTIES.contains(&property.content.as_str()) {
            return Ok(vec![]);
        }

        let Some(value) = node.first(NodeKind::Value) else {
            return Ok(vec![]);
        };
        let content = value.first_child().map(|n| n.content.as_str());

        // an actual border, nothing to compare
        if content != Some("0") && content != Some("none") {
            return Ok(vec![]);
        }

        let message = match config.style::<Style>()? {
            Style::None if content == Some("0") => {
                "Border properties should use \"none\" instead of 0."
            }
            Style::Zero if content == Some("none") => {
                "Border properties should use 0 instead of \"none\"."
            }
            _ => return Ok(vec![]),
        };

        Ok(vec![config.diagnostic(value.position, message)])
    }
}
