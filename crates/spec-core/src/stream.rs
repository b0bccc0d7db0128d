//! Token stream wrapper for the recursive-descent parser.

use crate::ast::Span;
use crate::error::SyntaxError;
use crate::lexer::Token;

/// Token stream with lookahead and position tracking.
///
/// Each token is paired with its byte span so syntax errors can point at
/// the offending token; at end of input errors point at the source length.
pub struct TokenStream<'t> {
    tokens: &'t [(Token, Span)],
    pos: usize,
    eof: usize,
}

impl<'t> TokenStream<'t> {
    /// Create a stream; `eof` is the byte length of the source
    pub fn new(tokens: &'t [(Token, Span)], eof: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            eof,
        }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Advance and return the consumed token with its span.
    pub fn advance(&mut self) -> Option<&'t (Token, Span)> {
        let entry = self.tokens.get(self.pos);
        if entry.is_some() {
            self.pos += 1;
        }
        entry
    }

    /// Check if the current token has the same variant as `expected`.
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume `expected` or fail with a syntax error describing it.
    pub fn expect(&mut self, expected: Token) -> Result<Span, SyntaxError> {
        if self.check(&expected) {
            let span = self.current_span();
            self.pos += 1;
            Ok(span)
        } else {
            Err(self.error(expected.to_string()))
        }
    }

    /// Consume the current token if it matches `expected`.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Span of the current token, or an empty span at end of input.
    pub fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| *span)
            .unwrap_or(Span::new(self.eof, self.eof))
    }

    /// Byte offset just past the last consumed token.
    pub fn last_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    /// Describe the current token for error messages.
    pub fn describe_current(&self) -> String {
        match self.peek() {
            Some(token) => token.to_string(),
            None => "end of input".to_string(),
        }
    }

    /// Build a syntax error at the current token.
    pub fn error(&self, expected: impl Into<String>) -> SyntaxError {
        SyntaxError::new(self.current_span().start, expected, self.describe_current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_expect_and_eof() {
        let tokens = tokenize("( )").unwrap();
        let mut stream = TokenStream::new(&tokens, 3);
        assert_eq!(stream.expect(Token::LParen).unwrap(), Span::new(0, 1));
        assert!(stream.eat(&Token::RParen));
        assert!(stream.at_end());
        assert_eq!(stream.last_end(), 3);

        let err = stream.expect(Token::Comma).unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.expected, "','");
        assert_eq!(err.found, "end of input");
    }

    #[test]
    fn test_check_ignores_payload() {
        let tokens = tokenize("foo").unwrap();
        let stream = TokenStream::new(&tokens, 3);
        assert!(stream.check(&Token::Ident(String::new())));
        assert!(!stream.check(&Token::LParen));
    }
}
