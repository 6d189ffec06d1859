//! `hex-length`: short or long hex colors

use crate::diagnostic::Diagnostic;
use crate::error::RuleError;
use crate::rules::{Rule, RuleConfig};
use crate::syntax::{NodeKind, SyntaxNode};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Long,
    Short,
}

impl Style {
    fn as_str(&self) -> &'static str {
        match self {
            Style::Long => "long",
            Style::Short => "short",
        }
    }
}

impl FromStr for Style {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "long" => Ok(Style::Long),
            "short" => Ok(Style::Short),
            _ => Err(()),
        }
    }
}

/// `#abcdef` can be written `#abc` only when each channel is a repeated digit
fn can_shorten(digits: &[char]) -> bool {
    digits.len() == 6 && digits[0] == digits[1] && digits[2] == digits[3] && digits[4] == digits[5]
}

/// Hex colors should be written in the configured form
///
/// Long colors that cannot be shortened are always accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexLength;

impl Rule for HexLength {
    fn name(&self) -> &str {
        "hex-length"
    }

    fn description(&self) -> &str {
        "Hex colors should use the configured short or long form"
    }

    fn node_kinds(&self) -> &[NodeKind] {
        &[NodeKind::Color]
    }

    fn default_style(&self) -> Option<&str> {
        Some("long")
    }

    fn check(&self, config: &RuleConfig, node: &SyntaxNode) -> Result<Vec<Diagnostic>, RuleError> {
        let style = config.style::<Style>()?;
        let digits: Vec<char> = node.content.chars().collect();

        let valid = match style {
            Style::Long => digits.len() != 3,
            Style::Short => !can_shorten(&digits),
        };

        if valid {
            return Ok(vec![]);
        }

        Ok(vec![config.diagnostic(
            node.position,
            format!(
                "#{} should be written in the {}-form format.",
                node.content,
                style.as_str()
            ),
        )])
    }
}
