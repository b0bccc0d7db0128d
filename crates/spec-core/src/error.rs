//! Parse-phase error types
//!
//! A failed parse never yields a partial tree: the lexer and the parser
//! both stop at the first problem and report its byte offset. Use
//! [`ParseError::char_offset`] or [`ParseError::location`] to get a position
//! counted in characters.

use spec_types::SourceLocation;
use thiserror::Error;

/// Malformed token stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated {quote}-quoted string starting at offset {offset}")]
    UnterminatedString { offset: usize, quote: char },

    #[error("unterminated raw text block starting at offset {offset}")]
    UnterminatedRawBlock { offset: usize },

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { offset: usize, found: char },
}

impl LexError {
    pub fn offset(&self) -> usize {
        match self {
            LexError::UnterminatedString { offset, .. }
            | LexError::UnterminatedRawBlock { offset }
            | LexError::UnexpectedChar { offset, .. } => *offset,
        }
    }
}

/// Grammar violation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at offset {offset}: expected {expected}, found {found}")]
pub struct SyntaxError {
    /// Byte offset of the offending token (source length at end of input)
    pub offset: usize,
    /// Human-readable description of what the grammar allows here
    pub expected: String,
    /// Human-readable description of what was there instead
    pub found: String,
}

impl SyntaxError {
    pub fn new(offset: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Any failure of `parse_spec`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

impl ParseError {
    /// Byte offset where parsing stopped
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lex(e) => e.offset(),
            ParseError::Syntax(e) => e.offset,
        }
    }

    /// Character (not byte) offset of the failure inside `source`
    pub fn char_offset(&self, source: &str) -> usize {
        let offset = self.offset();
        source
            .char_indices()
            .take_while(|(i, _)| *i < offset)
            .count()
    }

    /// Line/column of the failure inside `source`
    pub fn location(&self, source: &str) -> SourceLocation {
        SourceLocation::locate(source, self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_message() {
        let err = SyntaxError::new(7, "')'", "end of input");
        assert_eq!(
            err.to_string(),
            "syntax error at offset 7: expected ')', found end of input"
        );
    }

    #[test]
    fn test_parse_error_location() {
        let err: ParseError = LexError::UnterminatedString {
            offset: 8,
            quote: '\'',
        }
        .into();
        let loc = err.location("foo(\n   'abc");
        assert_eq!((loc.line, loc.column), (2, 4));
    }

    #[test]
    fn test_char_offset_counts_characters() {
        let source = "['\u{20ac}\u{433}', #]";
        let err = crate::parser::parse_spec(source).unwrap_err();
        assert_eq!(err.offset(), 10);
        assert_eq!(err.char_offset(source), 7);
        assert_eq!(err.location(source).column, 8);
    }
}
