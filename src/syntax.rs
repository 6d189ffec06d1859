#![forbid(unsafe_code)]

//! Stylesheet syntax tree consumed by the rule engine
//!
//! The tree is produced by a [`StylesheetParser`](parser::StylesheetParser) and
//! is read-only afterwards: neither the dispatcher nor any rule mutates it.

pub mod parser;

pub use parser::{LessParser, MAX_NESTING_DEPTH, StylesheetParser};

use crate::types::Position;
use std::fmt;

/// The category of a syntax node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Stylesheet,
    Ruleset,
    Selector,
    Block,
    AtRule,
    Declaration,
    Property,
    Colon,
    Value,
    Space,
    Ident,
    Number,
    Dimension,
    Color,
    String,
    Variable,
    Function,
    Arguments,
    Parentheses,
    Operator,
    MixinCall,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Stylesheet => "stylesheet",
            NodeKind::Ruleset => "ruleset",
            NodeKind::Selector => "selector",
            NodeKind::Block => "block",
            NodeKind::AtRule => "at_rule",
            NodeKind::Declaration => "declaration",
            NodeKind::Property => "property",
            NodeKind::Colon => "colon",
            NodeKind::Value => "value",
            NodeKind::Space => "space",
            NodeKind::Ident => "ident",
            NodeKind::Number => "number",
            NodeKind::Dimension => "dimension",
            NodeKind::Color => "color",
            NodeKind::String => "string",
            NodeKind::Variable => "variable",
            NodeKind::Function => "function",
            NodeKind::Arguments => "arguments",
            NodeKind::Parentheses => "parentheses",
            NodeKind::Operator => "operator",
            NodeKind::MixinCall => "mixin_call",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the stylesheet syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    pub kind: NodeKind,

    /// Textual payload; empty for pure container nodes
    pub content: String,

    pub children: Vec<SyntaxNode>,

    pub position: Position,
}

impl SyntaxNode {
    /// Creates a node without children
    pub fn leaf(kind: NodeKind, content: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            content: content.into(),
            children: Vec::new(),
            position,
        }
    }

    /// Creates a container node
    pub fn branch(kind: NodeKind, position: Position, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            content: String::new(),
            children,
            position,
        }
    }

    /// Sets the content of a node while building it
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// First direct child of the given kind
    pub fn first(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|child| child.kind == kind)
    }

    pub fn first_child(&self) -> Option<&SyntaxNode> {
        self.children.first()
    }

    /// Index of the first direct child of the given kind
    pub fn position_of(&self, kind: NodeKind) -> Option<usize> {
        self.children.iter().position(|child| child.kind == kind)
    }

    /// Pre-order iterator over this node and all of its descendants
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Concatenated source text of the subtree
    ///
    /// Leaves contribute their content; functions contribute their name and
    /// their arguments in parentheses.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self.kind {
            NodeKind::Color => {
                out.push('#');
                out.push_str(&self.content);
            }
            NodeKind::Function => {
                out.push_str(&self.content);
                for child in &self.children {
                    child.write_text(out);
                }
            }
            NodeKind::Arguments | NodeKind::Parentheses => {
                out.push('(');
                for child in &self.children {
                    child.write_text(out);
                }
                out.push(')');
            }
            _ if self.children.is_empty() => out.push_str(&self.content),
            _ => {
                for child in &self.children {
                    child.write_text(out);
                }
            }
        }
    }
}

impl Drop for SyntaxNode {
    // iterative, so deep trees do not exhaust the stack
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Depth-first, pre-order traversal over a syntax tree
pub struct PreOrder<'a> {
    stack: Vec<&'a SyntaxNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
