//! Parser - tokens to an immutable Abstract Spec Tree
//!
//! Grammar:
//!
//! ```text
//! spec       := rawText | value
//! value      := construct | array | map | literal | rawText
//! construct  := typeName '(' [ value (',' value)* ] ')'
//! array      := '[' [ value (',' value)* ] ']'
//! map        := '{' [ pair (',' pair)* ] '}'
//! pair       := stringLiteral ':' value
//! literal    := stringLiteral | number | boolean
//! ```
//!
//! Type names are kept as written; resolution happens later in the builder.
//! A spec that is nothing but one raw block becomes a single `RawText` node
//! covering the whole source so it can be reproduced byte-for-byte.

use tracing::debug;

use crate::ast::{AstNode, Construct, Literal, Span};
use crate::error::{ParseError, SyntaxError};
use crate::lexer::{tokenize, Token};
use crate::stream::TokenStream;

/// Default limit on nested constructs, arrays and maps
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs for a single parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed nesting of constructs, arrays and maps
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Parse spec text with default options
pub fn parse_spec(source: &str) -> Result<AstNode, ParseError> {
    parse_spec_with(source, ParseOptions::default())
}

/// Parse spec text into its tree
///
/// Never partially succeeds: any lexical or syntax problem discards the tree.
pub fn parse_spec_with(source: &str, options: ParseOptions) -> Result<AstNode, ParseError> {
    let tokens = tokenize(source)?;

    if let [(Token::RawBlock { content, .. }, _)] = tokens.as_slice() {
        debug!(bytes = source.len(), "spec is a raw text block");
        return Ok(AstNode::RawText {
            source: source.to_string(),
            content: content.clone(),
            span: Span::new(0, source.len()),
        });
    }

    let mut parser = Parser {
        stream: TokenStream::new(&tokens, source.len()),
        max_depth: options.max_depth,
        depth: 0,
    };
    let root = parser.value()?;
    if !parser.stream.at_end() {
        return Err(parser.stream.error("end of input").into());
    }

    debug!(
        bytes = source.len(),
        tokens = tokens.len(),
        "parsed spec"
    );
    Ok(root)
}

// ============================================================================
// Internal Parser
// ============================================================================

struct Parser<'t> {
    stream: TokenStream<'t>,
    max_depth: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    fn value(&mut self) -> Result<AstNode, SyntaxError> {
        match self.stream.peek() {
            Some(Token::Ident(_)) => self.nested(Self::construct),
            Some(Token::LBracket) => self.nested(Self::array),
            Some(Token::LBrace) => self.nested(Self::map),
            Some(Token::Number(_) | Token::Boolean(_) | Token::StringLit { .. }) => self.literal(),
            Some(Token::RawBlock { .. }) => self.raw_text(),
            _ => Err(self.stream.error("a value")),
        }
    }

    /// Run a container rule one nesting level deeper
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<AstNode, SyntaxError>,
    ) -> Result<AstNode, SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(self.stream.error(format!(
                "at most {} levels of nesting",
                self.max_depth
            )));
        }
        self.depth += 1;
        let node = rule(self);
        self.depth -= 1;
        node
    }

    fn construct(&mut self) -> Result<AstNode, SyntaxError> {
        let start = self.stream.current_span().start;
        let type_name = match self.stream.advance() {
            Some((Token::Ident(name), _)) => name.clone(),
            _ => return Err(self.stream.error("a type name")),
        };
        self.stream
            .expect(Token::LParen)
            .map_err(|_| self.stream.error(format!("'(' after type name '{}'", type_name)))?;
        let args = self.sequence(Token::RParen)?;

        Ok(AstNode::Construct(Construct {
            type_name,
            args,
            span: Span::new(start, self.stream.last_end()),
        }))
    }

    fn array(&mut self) -> Result<AstNode, SyntaxError> {
        let start = self.stream.expect(Token::LBracket)?.start;
        let items = self.sequence(Token::RBracket)?;
        Ok(AstNode::Array {
            items,
            span: Span::new(start, self.stream.last_end()),
        })
    }

    /// Comma-separated values up to and including `close`
    fn sequence(&mut self, close: Token) -> Result<Vec<AstNode>, SyntaxError> {
        let mut items = Vec::new();
        if self.stream.eat(&close) {
            return Ok(items);
        }
        loop {
            items.push(self.value()?);
            if self.stream.eat(&Token::Comma) {
                continue;
            }
            if self.stream.eat(&close) {
                return Ok(items);
            }
            return Err(self.stream.error(format!("',' or {}", close)));
        }
    }

    fn map(&mut self) -> Result<AstNode, SyntaxError> {
        let start = self.stream.expect(Token::LBrace)?.start;
        let mut entries = Vec::new();
        if !self.stream.eat(&Token::RBrace) {
            loop {
                let key = match self.stream.peek() {
                    Some(Token::StringLit { value, .. }) => value.clone(),
                    _ => return Err(self.stream.error("a string key")),
                };
                self.stream.advance();
                self.stream.expect(Token::Colon)?;
                entries.push((key, self.value()?));

                if self.stream.eat(&Token::Comma) {
                    continue;
                }
                if self.stream.eat(&Token::RBrace) {
                    break;
                }
                return Err(self.stream.error("',' or '}'"));
            }
        }
        Ok(AstNode::Map {
            entries,
            span: Span::new(start, self.stream.last_end()),
        })
    }

    fn literal(&mut self) -> Result<AstNode, SyntaxError> {
        let Some((token, span)) = self.stream.advance() else {
            return Err(self.stream.error("a literal"));
        };
        let literal = match token {
            Token::Boolean(b) => Literal::Boolean(*b),
            Token::StringLit { value, .. } => Literal::String(value.clone()),
            Token::Number(raw) => number_literal(raw, span.start)?,
            other => {
                return Err(SyntaxError::new(span.start, "a literal", other.to_string()));
            }
        };
        Ok(AstNode::Literal(literal))
    }

    fn raw_text(&mut self) -> Result<AstNode, SyntaxError> {
        match self.stream.advance() {
            Some((Token::RawBlock { raw, content }, span)) => Ok(AstNode::RawText {
                source: raw.clone(),
                content: content.clone(),
                span: *span,
            }),
            _ => Err(self.stream.error("a raw text block")),
        }
    }
}

/// Classify a numeric token: `L` suffix is Long, a decimal point is Double,
/// anything else must fit a 32-bit Integer
fn number_literal(raw: &str, offset: usize) -> Result<Literal, SyntaxError> {
    if let Some(digits) = raw.strip_suffix('L') {
        if digits.contains('.') {
            return Err(SyntaxError::new(
                offset,
                "a Long without a decimal point",
                raw,
            ));
        }
        return digits
            .parse::<i64>()
            .map(Literal::Long)
            .map_err(|_| SyntaxError::new(offset, "a 64-bit integer", raw));
    }
    if raw.contains('.') {
        return raw
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite())
            .map(Literal::Double)
            .ok_or_else(|| SyntaxError::new(offset, "a finite floating point number", raw));
    }
    raw.parse::<i32>()
        .map(Literal::Integer)
        .map_err(|_| SyntaxError::new(offset, "a 32-bit integer (append L for 64-bit)", raw))
}

// ============================================================================
// Tests
// ============================================================================
