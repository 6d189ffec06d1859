#![forbid(unsafe_code)]

//! Stylesheet parsing
//!
//! The engine only depends on the [`StylesheetParser`] trait. [`LessParser`] is
//! the built-in implementation: a logos tokenizer plus a recursive-descent
//! parser covering the LESS/CSS subset the bundled rules look at (rulesets,
//! nested blocks, at-rules, declarations, variables, functions and mixin
//! calls). Comments are dropped; whitespace inside declarations is kept as
//! `space` nodes so spacing rules can inspect it.

use crate::error::ParseError;
use crate::syntax::{NodeKind, SyntaxNode};
use crate::types::Position;
use logos::Logos;
use std::fs;
use std::path::Path;

/// Produces a syntax tree from stylesheet source
///
/// Implementations must be shareable across the worker threads that check
/// files in parallel.
pub trait StylesheetParser: Send + Sync {
    /// Parses source text into a tree rooted at a `stylesheet` node
    fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError>;

    /// Reads and parses a file
    fn parse_file(&self, path: &Path) -> Result<SyntaxNode, ParseError> {
        let source = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&source)
    }
}

/// Built-in LESS/CSS parser
#[derive(Debug, Clone, Copy, Default)]
pub struct LessParser;

impl LessParser {
    pub fn new() -> Self {
        LessParser
    }
}

impl StylesheetParser for LessParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode, ParseError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let tokens = tokenize(source)?;
        Parser::new(tokens).parse_stylesheet()
    }
}

fn syntax_error(position: Position, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line: position.line,
        column: position.column,
        message: message.into(),
    }
}

/// Deepest block or parenthesis nesting accepted before giving up
pub const MAX_NESTING_DEPTH: usize = 128;

/// Raw lexemes recognised by logos
///
/// Signs are lexed as delimiters and attached to the following number in
/// [`tokenize`], where the previous token is known.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum Lexeme {
    #[regex(r"[ \t\r\n\x0C]+")]
    Whitespace,

    #[token("/*", block_comment)]
    #[regex(r"//[^\n]*")]
    Comment,

    #[regex(r#""([^"\\\n]|\\[^\n]|\\\n)*""#)]
    #[regex(r#"'([^'\\\n]|\\[^\n]|\\\n)*'"#)]
    Str,

    #[regex(r"#[A-Za-z0-9_\x{80}-\x{10FFFF}-]*")]
    Hash,

    #[regex(r"@[A-Za-z0-9_\x{80}-\x{10FFFF}-]+")]
    AtWord,

    #[regex(r"([0-9]+(\.[0-9]+)?|\.[0-9]+)(%|[A-Za-z]+)?")]
    Number,

    #[regex(r"-*[A-Za-z_\\\x{80}-\x{10FFFF}][A-Za-z0-9_\\\x{80}-\x{10FFFF}-]*")]
    #[regex(r"![A-Za-z][A-Za-z0-9_-]*")]
    Word,

    /// `url(` followed by its unquoted contents, if any
    #[regex(r"[uU][rR][lL]\(", raw_url)]
    Url,

    #[regex(r"[{}()\[\];:,.>+~*/=<|^$!?@%&`-]")]
    Delim,
}

fn block_comment(lex: &mut logos::Lexer<Lexeme>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// Unquoted `url(...)` contents are consumed as one opaque run
fn raw_url(lex: &mut logos::Lexer<Lexeme>) -> bool {
    let rest = lex.remainder();
    if !rest.trim_start().starts_with(['"', '\'']) {
        let end = rest.find([')', '\n']).unwrap_or(rest.len());
        lex.bump(end);
    }
    true
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Whitespace,
    Comment,
    Str,
    Hash,
    AtWord,
    Number,
    Word,
    Delim(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    position: Position,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    fn is_delim(&self, c: char) -> bool {
        self.kind == TokenKind::Delim(c)
    }

    fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }

    fn is_word_like(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Word | TokenKind::Number | TokenKind::Hash | TokenKind::AtWord
        )
    }
}

/// Maps byte offsets to 1-based line and character column
///
/// Offsets must be requested in increasing order.
struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    position: Position,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            position: Position::default(),
        }
    }

    fn advance_to(&mut self, offset: usize) -> Position {
        for c in self.source[self.offset..offset].chars() {
            if c == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        self.offset = offset;
        self.position
    }
}

fn lexical_error(text: &str, position: Position) -> ParseError {
    if text.starts_with("/*") {
        syntax_error(position, "unterminated comment")
    } else if text.starts_with(['"', '\'']) {
        syntax_error(position, "unterminated string")
    } else {
        let c = text.chars().next().unwrap_or_default();
        syntax_error(position, format!("unexpected character '{}'", c.escape_default()))
    }
}

fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut lexer = Lexeme::lexer(source);

    while let Some(lexeme) = lexer.next() {
        let text = lexer.slice();
        let position = cursor.advance_to(lexer.span().start);

        let kind = match lexeme {
            Ok(Lexeme::Whitespace) => TokenKind::Whitespace,
            Ok(Lexeme::Comment) => TokenKind::Comment,
            Ok(Lexeme::Str) => TokenKind::Str,
            Ok(Lexeme::Hash) => TokenKind::Hash,
            Ok(Lexeme::AtWord) => TokenKind::AtWord,
            Ok(Lexeme::Word) => TokenKind::Word,
            Ok(Lexeme::Delim) => TokenKind::Delim(text.chars().next().unwrap_or_default()),
            Ok(Lexeme::Number) => {
                if let Some(sign) = detached_sign(&mut tokens, position) {
                    tokens.push(Token::new(TokenKind::Number, format!("{}{}", sign.text, text), sign.position));
                    continue;
                }
                TokenKind::Number
            }
            Ok(Lexeme::Url) => {
                // "url", "(" and the raw contents as a string
                let (name, raw) = text.split_at(3);
                let column = |offset: u32| Position::new(position.line, position.column + offset);
                tokens.push(Token::new(TokenKind::Word, name, position));
                tokens.push(Token::new(TokenKind::Delim('('), "(", column(3)));
                if raw.len() > 1 {
                    tokens.push(Token::new(TokenKind::Str, &raw[1..], column(4)));
                }
                continue;
            }
            Err(()) => return Err(lexical_error(text, position)),
        };

        tokens.push(Token::new(kind, text, position));
    }

    Ok(tokens)
}

/// Pops a `-` or `+` that belongs to the number starting at `position`
///
/// The sign must touch the number and must not continue a word.
fn detached_sign(tokens: &mut Vec<Token>, position: Position) -> Option<Token> {
    let sign = tokens.last()?;
    let touches = sign.position.line == position.line && sign.position.column + 1 == position.column;
    if !(sign.is_delim('-') || sign.is_delim('+')) || !touches {
        return None;
    }
    let before = tokens.len().checked_sub(2).map(|i| &tokens[i]);
    if before.is_some_and(Token::is_word_like) {
        return None;
    }
    tokens.pop()
}

/// How a statement ends
#[derive(Debug, Clone, Copy, PartialEq)]
enum Terminator {
    Block,
    Semicolon,
    CloseBrace,
    Eof,
}

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn skip_trivia(&mut self) {
        while self.peek().is_some_and(Token::is_trivia) {
            self.index += 1;
        }
    }

    fn parse_stylesheet(mut self) -> Result<SyntaxNode, ParseError> {
        let children = self.parse_statements(None)?;
        Ok(SyntaxNode::branch(
            NodeKind::Stylesheet,
            Position::default(),
            children,
        ))
    }

    /// Parses statements until end of input (top level) or the closing brace
    /// of the block opened at `open`
    fn parse_statements(&mut self, open: Option<Position>) -> Result<Vec<SyntaxNode>, ParseError> {
        let mut statements = Vec::new();

        loop {
            self.skip_trivia();
            let Some(token) = self.peek() else {
                return match open {
                    Some(position) => Err(syntax_error(position, "unclosed block")),
                    None => Ok(statements),
                };
            };

            if token.is_delim('}') {
                return match open {
                    Some(_) => Ok(statements),
                    None => Err(syntax_error(token.position, "unexpected '}'")),
                };
            }

            if token.is_delim(';') {
                self.index += 1;
                continue;
            }

            statements.push(self.parse_statement()?);
        }
    }

    fn find_terminator(&self) -> Result<(usize, Terminator), ParseError> {
        let mut open_parens: Vec<Position> = Vec::new();

        for (offset, token) in self.tokens[self.index..].iter().enumerate() {
            let at = self.index + offset;
            match token.kind {
                TokenKind::Delim('(') | TokenKind::Delim('[') => open_parens.push(token.position),
                TokenKind::Delim(')') | TokenKind::Delim(']') => {
                    if open_parens.pop().is_none() {
                        return Err(syntax_error(
                            token.position,
                            format!("unexpected '{}'", token.text),
                        ));
                    }
                }
                TokenKind::Delim('{') if open_parens.is_empty() => {
                    return Ok((at, Terminator::Block));
                }
                TokenKind::Delim(';') if open_parens.is_empty() => {
                    return Ok((at, Terminator::Semicolon));
                }
                TokenKind::Delim('}') if open_parens.is_empty() => {
                    return Ok((at, Terminator::CloseBrace));
                }
                _ => {}
            }
        }

        match open_parens.last() {
            Some(position) => Err(syntax_error(*position, "unclosed parenthesis")),
            None => Ok((self.tokens.len(), Terminator::Eof)),
        }
    }

    fn parse_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let (end, terminator) = self.find_terminator()?;
        let range = trim(&self.tokens[self.index..end]).to_vec();
        self.index = end;

        let Some(first) = range.first() else {
            // only reachable with an empty statement in front of a block
            let position = self.peek().map(|t| t.position).unwrap_or_default();
            return Err(syntax_error(position, "block without selector"));
        };

        let starts_with_at = first.kind == TokenKind::AtWord;

        match terminator {
            Terminator::Block => {
                let block = self.parse_block()?;
                if starts_with_at {
                    Ok(self.at_rule(&range, Some(block))?)
                } else {
                    let selector = selector(&range)?;
                    Ok(SyntaxNode::branch(
                        NodeKind::Ruleset,
                        selector.position,
                        vec![selector, block],
                    ))
                }
            }
            Terminator::Semicolon | Terminator::CloseBrace | Terminator::Eof => {
                if terminator == Terminator::Semicolon {
                    self.index += 1;
                }
                match top_level_colon(&range) {
                    Some(colon) => declaration(&range, colon),
                    None if starts_with_at => self.at_rule(&range, None),
                    None => Ok(SyntaxNode::branch(
                        NodeKind::MixinCall,
                        first.position,
                        values(&range, true)?,
                    )
                    .with_content(source_text(&range))),
                }
            }
        }
    }

    fn parse_block(&mut self) -> Result<SyntaxNode, ParseError> {
        let open = self
            .peek()
            .map(|t| t.position)
            .unwrap_or_default();
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(syntax_error(open, "nesting too deep"));
        }
        self.index += 1;
        self.depth += 1;
        let children = self.parse_statements(Some(open))?;
        self.depth -= 1;
        // parse_statements only returns Ok when it sees the closing brace
        self.index += 1;
        Ok(SyntaxNode::branch(NodeKind::Block, open, children))
    }

    fn at_rule(&self, range: &[Token], block: Option<SyntaxNode>) -> Result<SyntaxNode, ParseError> {
        let name = &range[0];
        let mut children = Vec::new();

        let prelude = trim(&range[1..]);
        if let Some(first) = prelude.first() {
            children.push(SyntaxNode::branch(
                NodeKind::Value,
                first.position,
                values(prelude, false)?,
            ));
        }
        children.extend(block);

        Ok(SyntaxNode::branch(NodeKind::AtRule, name.position, children)
            .with_content(name.text.trim_start_matches('@')))
    }
}

/// Strips leading and trailing whitespace and comments
fn trim(tokens: &[Token]) -> &[Token] {
    let start = tokens
        .iter()
        .position(|t| !t.is_trivia())
        .unwrap_or(tokens.len());
    let end = tokens
        .iter()
        .rposition(|t| !t.is_trivia())
        .map_or(start, |i| i + 1);
    &tokens[start..end]
}

fn source_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Comment)
        .map(|t| t.text.as_str())
        .collect()
}

fn top_level_colon(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Delim('(') | TokenKind::Delim('[') => depth += 1,
            TokenKind::Delim(')') | TokenKind::Delim(']') => depth = depth.saturating_sub(1),
            TokenKind::Delim(':') if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

fn selector(range: &[Token]) -> Result<SyntaxNode, ParseError> {
    let position = range.first().map(|t| t.position).unwrap_or_default();
    Ok(
        SyntaxNode::branch(NodeKind::Selector, position, values(range, true)?)
            .with_content(source_text(range)),
    )
}

/// Collapses a run of whitespace tokens into one `space` node
fn space(tokens: &[Token]) -> Option<SyntaxNode> {
    let whitespace: Vec<&Token> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Whitespace)
        .collect();
    let first = whitespace.first()?;
    let text: String = whitespace.iter().map(|t| t.text.as_str()).collect();
    Some(SyntaxNode::leaf(NodeKind::Space, text, first.position))
}

fn declaration(range: &[Token], colon: usize) -> Result<SyntaxNode, ParseError> {
    let before = &range[..colon];
    let after = &range[colon + 1..];

    let property_tokens = trim(before);
    let Some(property_start) = property_tokens.first() else {
        return Err(syntax_error(range[colon].position, "declaration without property"));
    };

    let mut children = vec![SyntaxNode::leaf(
        NodeKind::Property,
        source_text(property_tokens),
        property_start.position,
    )];
    children.extend(space(&before[property_tokens.len()..]));

    let colon_token = &range[colon];
    children.push(SyntaxNode::leaf(
        NodeKind::Colon,
        ":",
        colon_token.position,
    ));

    let value_tokens = trim(after);
    let leading = after
        .iter()
        .position(|t| !t.is_trivia())
        .unwrap_or(after.len());
    children.extend(space(&after[..leading]));

    let value_position = value_tokens
        .first()
        .map_or(colon_token.position, |t| t.position);
    children.push(SyntaxNode::branch(
        NodeKind::Value,
        value_position,
        values(value_tokens, false)?,
    ));

    Ok(SyntaxNode::branch(
        NodeKind::Declaration,
        property_start.position,
        children,
    ))
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_delim('(') {
            depth += 1;
        } else if token.is_delim(')') {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn is_hex_color(digits: &str) -> bool {
    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Builds value-level nodes from a token slice
///
/// Inside selectors `#abc` is an id, not a color.
fn values(tokens: &[Token], in_selector: bool) -> Result<Vec<SyntaxNode>, ParseError> {
    nested_values(tokens, in_selector, 0)
}

fn nested_values(tokens: &[Token], in_selector: bool, depth: usize) -> Result<Vec<SyntaxNode>, ParseError> {
    let too_deep = |position: Position| {
        if depth >= MAX_NESTING_DEPTH {
            Err(syntax_error(position, "nesting too deep"))
        } else {
            Ok(())
        }
    };
    let mut nodes = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let node = match &token.kind {
            TokenKind::Comment => {
                i += 1;
                continue;
            }
            TokenKind::Whitespace => SyntaxNode::leaf(NodeKind::Space, &token.text, token.position),
            TokenKind::Str => SyntaxNode::leaf(NodeKind::String, &token.text, token.position),
            TokenKind::AtWord => SyntaxNode::leaf(NodeKind::Variable, &token.text, token.position),
            TokenKind::Hash => {
                let digits = &token.text[1..];
                if !in_selector && is_hex_color(digits) {
                    SyntaxNode::leaf(NodeKind::Color, digits, token.position)
                } else {
                    SyntaxNode::leaf(NodeKind::Ident, &token.text, token.position)
                }
            }
            TokenKind::Number => {
                let unitless = token
                    .text
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
                let kind = if unitless {
                    NodeKind::Number
                } else {
                    NodeKind::Dimension
                };
                SyntaxNode::leaf(kind, &token.text, token.position)
            }
            TokenKind::Word if tokens.get(i + 1).is_some_and(|t| t.is_delim('(')) => {
                let open = &tokens[i + 1];
                let close = matching_paren(tokens, i + 1)
                    .ok_or_else(|| syntax_error(open.position, "unclosed parenthesis"))?;
                too_deep(open.position)?;
                let arguments = SyntaxNode::branch(
                    NodeKind::Arguments,
                    open.position,
                    nested_values(&tokens[i + 2..close], in_selector, depth + 1)?,
                );
                nodes.push(
                    SyntaxNode::branch(NodeKind::Function, token.position, vec![arguments])
                        .with_content(&token.text),
                );
                i = close + 1;
                continue;
            }
            TokenKind::Word => SyntaxNode::leaf(NodeKind::Ident, &token.text, token.position),
            TokenKind::Delim('(') => {
                let close = matching_paren(tokens, i)
                    .ok_or_else(|| syntax_error(token.position, "unclosed parenthesis"))?;
                too_deep(token.position)?;
                nodes.push(SyntaxNode::branch(
                    NodeKind::Parentheses,
                    token.position,
                    nested_values(&tokens[i + 1..close], in_selector, depth + 1)?,
                ));
                i = close + 1;
                continue;
            }
            TokenKind::Delim(')') => return Err(syntax_error(token.position, "unexpected ')'")),
            TokenKind::Delim(_) => SyntaxNode::leaf(NodeKind::Operator, &token.text, token.position),
        };
        nodes.push(node);
        i += 1;
    }

    Ok(nodes)
}
