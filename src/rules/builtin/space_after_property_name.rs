//! `space-after-property-name`: whitespace between a property and its colon

use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::rules::{Rule, RuleConfig};
use crate::syntax::{NodeKind, SyntaxNode};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    NoSpace,
    OneSpace,
}

impl FromStr for Style {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_space" => Ok(Style::NoSpace),
            "one_space" => Ok(Style::OneSpace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpaceAfterPropertyName;

impl Rule for SpaceAfterPropertyName {
    fn name(&self) -> &str {
        "space-after-property-name"
    }

    fn description(&self) -> &str {
        "Controls the space between a property name and the following colon"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Declaration]
    }

    fn default_style(&self) -> Option<&str> {
        Some("no_space")
    }

    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        let style = config.style::<Style>()?;

        let malformed = |message: &str| RuleError::Malformed {
            rule: self.name().to_string(),
            message: message.to_string(),
        };
        let index = node
            .position_of(NodeKind::Property)
            .ok_or_else(|| malformed("declaration without property"))?;
        let next = node
            .children
            .get(index + 1)
            .ok_or_else(|| malformed("property without colon"))?;

        let message = match style {
            Style::NoSpace if next.is(NodeKind::Space) => {
                "Colon after property should not be preceded by any space."
            }
            Style::OneSpace if !(next.is(NodeKind::Space) && next.content == " ") => {
                "Colon after property should be preceded by one space."
            }
            _ => return Ok(vec![]),
        };

        Ok(vec![config.diagnostic(next.position, message)])
    }
}
