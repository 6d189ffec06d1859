#![forbid(unsafe_code)]

//! Built-in stylesheet rules
//!
//! Each rule lives in its own module and only implements the [`Rule`] trait;
//! the engine knows nothing about individual rules.

mod border_zero;
mod hex_length;
mod space_after_property_name;
mod space_around_comma;

pub use border_zero::BorderZero;
pub use hex_length::HexLength;
pub use space_after_property_name::SpaceAfterPropertyName;
pub use space_around_comma::SpaceAroundComma;

use crate::rules::Rule;

/// The built-in catalog, in registration order
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(BorderZero),
        Box::new(HexLength),
        Box::new(SpaceAfterPropertyName),
        Box::new(SpaceAroundComma),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::syntax::{LessParser, NodeKind, StylesheetParser, SyntaxNode};

    /// Parses `source` and returns the first node of `kind`
    pub fn first_node(source: &str, kind: NodeKind) -> SyntaxNode {
        let root = LessParser::new().parse(source).unwrap();
        root.iter()
            .find(|node| node.is(kind))
            .cloned()
            .unwrap_or_else(|| panic!("no {kind} node in {source:?}"))
    }

    /// Wraps a declaration in a ruleset, shifting its columns
    pub fn in_ruleset(declaration: &str) -> String {
        format!(".a {{ {declaration} }}")
    }
}
