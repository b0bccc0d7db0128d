//! Lexer - spec text to spanned tokens
//!
//! Whitespace between tokens is dropped. Inside quoted strings and raw
//! blocks every character is kept as written.
//!
//! Token shapes:
//! - identifier paths: `com.example.Outer$Inner` (dots included)
//! - numbers: `-?digits(.digits)?L?`
//! - strings: `'...'` or `"..."`, the delimiter and `\` escaped with `\`
//! - raw blocks: `"""..."""`, captured byte-for-byte, no escaping
//! - `TRUE` / `FALSE` (exact case)
//! - punctuation: `( ) [ ] { } , :`

use nom::{
    branch::alt,
    bytes::complete::{escaped, tag, take_until, take_while},
    character::complete::{anychar, char, digit1, none_of, satisfy},
    combinator::{consumed, map, opt, recognize, value},
    error::{Error as NomError, ParseError as NomParseError},
    multi::many0,
    sequence::{delimited, pair, tuple},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::ast::Span;
use crate::error::LexError;

/// Delimiter of raw text blocks
pub const RAW_MARKER: &str = "\"\"\"";

/// A lexical token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Token {
    /// Dotted identifier path
    Ident(String),
    /// Numeric literal exactly as written (sign and `L` suffix included)
    Number(String),
    /// `TRUE` or `FALSE`
    Boolean(bool),
    /// Quoted string: `raw` is the source slice, `value` the unescaped content
    StringLit {
        raw: String,
        value: String,
        quote: char,
    },
    /// Triple-quoted block: `raw` includes the delimiters
    RawBlock { raw: String, content: String },
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Ident(name) => write!(f, "identifier '{}'", name),
            Token::Number(raw) => write!(f, "number {}", raw),
            Token::Boolean(true) => f.write_str("TRUE"),
            Token::Boolean(false) => f.write_str("FALSE"),
            Token::StringLit { raw, .. } => write!(f, "string {}", raw),
            Token::RawBlock { .. } => f.write_str("raw text block"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Split spec text into tokens paired with their byte spans
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        rest = skip_whitespace(rest);
        if rest.is_empty() {
            break;
        }
        let start = source.len() - rest.len();
        let (remaining, token) = lex_token(rest, start)?;
        let end = source.len() - remaining.len();
        tokens.push((token, Span::new(start, end)));
        rest = remaining;
    }

    Ok(tokens)
}

// ============================================================================
// Internal Lexers
// ============================================================================

fn skip_whitespace(input: &str) -> &str {
    let parsed: IResult<&str, &str, NomError<&str>> = take_while(char::is_whitespace)(input);
    match parsed {
        Ok((rest, _)) => rest,
        Err(_) => input,
    }
}

fn lex_token(input: &str, offset: usize) -> Result<(&str, Token), LexError> {
    let Some(first) = input.chars().next() else {
        return Err(LexError::UnexpectedChar {
            offset,
            found: '\0',
        });
    };

    if input.starts_with(RAW_MARKER) {
        return raw_block::<NomError<&str>>(input)
            .map_err(|_| LexError::UnterminatedRawBlock { offset });
    }

    match first {
        '"' | '\'' => quoted_string::<NomError<&str>>(first)(input)
            .map_err(|_| LexError::UnterminatedString {
                offset,
                quote: first,
            }),
        '(' | ')' | '[' | ']' | '{' | '}' | ',' | ':' => {
            punctuation::<NomError<&str>>(input).map_err(|_| LexError::UnexpectedChar {
                offset,
                found: first,
            })
        }
        c if c == '-' || c.is_ascii_digit() => number::<NomError<&str>>(input)
            .map_err(|_| LexError::UnexpectedChar { offset, found: c }),
        c if is_ident_start(c) => ident_or_boolean::<NomError<&str>>(input)
            .map_err(|_| LexError::UnexpectedChar { offset, found: c }),
        c => Err(LexError::UnexpectedChar { offset, found: c }),
    }
}

fn punctuation<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Token, E> {
    alt((
        value(Token::LParen, char('(')),
        value(Token::RParen, char(')')),
        value(Token::LBracket, char('[')),
        value(Token::RBracket, char(']')),
        value(Token::LBrace, char('{')),
        value(Token::RBrace, char('}')),
        value(Token::Comma, char(',')),
        value(Token::Colon, char(':')),
    ))(input)
}

// Raw blocks: everything up to the first closing marker, no escapes
fn raw_block<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Token, E> {
    map(
        consumed(delimited(tag(RAW_MARKER), take_until(RAW_MARKER), tag(RAW_MARKER))),
        |(raw, content): (&str, &str)| Token::RawBlock {
            raw: raw.to_string(),
            content: content.to_string(),
        },
    )(input)
}

// Quoted strings; `escaped` rejects empty content, hence the `opt`
fn quoted_string<'a, E: NomParseError<&'a str>>(
    quote: char,
) -> impl FnMut(&'a str) -> IResult<&'a str, Token, E> {
    let stop = if quote == '"' { "\"\\" } else { "'\\" };
    move |input: &'a str| {
        let (rest, (raw, body)) = consumed(delimited(
            char(quote),
            opt(escaped(none_of(stop), '\\', anychar)),
            char(quote),
        ))(input)?;
        Ok((
            rest,
            Token::StringLit {
                raw: raw.to_string(),
                value: unescape(body.unwrap_or_default(), quote),
                quote,
            },
        ))
    }
}

/// Resolve `\<quote>` and `\\`; any other backslash stays as written
pub fn unescape(body: &str, quote: char) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(next) if next == quote || next == '\\' => out.push(next),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn number<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Token, E> {
    map(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(char('L')),
        ))),
        |raw: &str| Token::Number(raw.to_string()),
    )(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn ident_segment<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(pair(satisfy(is_ident_start), take_while(is_ident_char)))(input)
}

fn ident_or_boolean<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Token, E> {
    map(
        recognize(pair(ident_segment, many0(pair(char('.'), ident_segment)))),
        |path: &str| match path {
            "TRUE" => Token::Boolean(true),
            "FALSE" => Token::Boolean(false),
            other => Token::Ident(other.to_string()),
        },
    )(input)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_construct_tokens() {
        assert_eq!(
            kinds("java.lang.Integer ( 123 )"),
            vec![
                Token::Ident("java.lang.Integer".to_string()),
                Token::LParen,
                Token::Number("123".to_string()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_spans_are_byte_offsets() {
        let tokens = tokenize("a.B( 1 )").unwrap();
        assert_eq!(tokens[0].1, Span::new(0, 3));
        assert_eq!(tokens[1].1, Span::new(3, 4));
        assert_eq!(tokens[2].1, Span::new(5, 6));
        assert_eq!(tokens[3].1, Span::new(7, 8));
    }

    #[test]
    fn test_dollar_in_identifier() {
        assert_eq!(
            kinds("com.rultor.Outer$Foo"),
            vec![Token::Ident("com.rultor.Outer$Foo".to_string())]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("-44L 8 -44.66 0.5"),
            vec![
                Token::Number("-44L".to_string()),
                Token::Number("8".to_string()),
                Token::Number("-44.66".to_string()),
                Token::Number("0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_booleans_are_case_sensitive() {
        assert_eq!(
            kinds("TRUE FALSE true"),
            vec![
                Token::Boolean(true),
                Token::Boolean(false),
                Token::Ident("true".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_quoted_preserves_whitespace() {
        let tokens = kinds("'te   \n st'");
        assert_eq!(
            tokens,
            vec![Token::StringLit {
                raw: "'te   \n st'".to_string(),
                value: "te   \n st".to_string(),
                quote: '\'',
            }]
        );
    }

    #[test]
    fn test_escaped_delimiter() {
        let tokens = kinds(r#""say \"hi\"" 'it\'s'"#);
        assert!(matches!(&tokens[0], Token::StringLit { value, .. } if value == "say \"hi\""));
        assert!(matches!(&tokens[1], Token::StringLit { value, .. } if value == "it's"));
    }

    #[test]
    fn test_other_quote_needs_no_escape() {
        let tokens = kinds(r#"'say "hi"'"#);
        assert!(matches!(&tokens[0], Token::StringLit { value, quote: '\'', .. } if value == "say \"hi\""));
    }

    #[test]
    fn test_empty_strings() {
        let tokens = kinds("'' \"\"");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(&tokens[0], Token::StringLit { value, .. } if value.is_empty()));
        assert!(matches!(&tokens[1], Token::StringLit { value, .. } if value.is_empty()));
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r"a\nb", '\''), r"a\nb");
        assert_eq!(unescape(r"a\\b", '\''), r"a\b");
        assert_eq!(unescape(r"\'", '\''), "'");
    }

    #[test]
    fn test_raw_block_captured_verbatim() {
        let source = "\"\"\"\nsome\tunformatted\u{20ac}\u{433}\n\"\"\"";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].1, Span::new(0, source.len()));
        assert_eq!(
            tokens[0].0,
            Token::RawBlock {
                raw: source.to_string(),
                content: "\nsome\tunformatted\u{20ac}\u{433}\n".to_string(),
            }
        );
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            kinds("[ ] { } , :"),
            vec![
                Token::LBracket,
                Token::RBracket,
                Token::LBrace,
                Token::RBrace,
                Token::Comma,
                Token::Colon,
            ]
        );
    }

    #[test]
    fn test_error_unterminated_string() {
        assert_eq!(
            tokenize("foo('abc)"),
            Err(LexError::UnterminatedString {
                offset: 4,
                quote: '\''
            })
        );
        assert!(tokenize(r#""abc\""#).is_err());
    }

    #[test]
    fn test_error_unterminated_raw_block() {
        assert_eq!(
            tokenize("  \"\"\"never closed"),
            Err(LexError::UnterminatedRawBlock { offset: 2 })
        );
    }

    #[test]
    fn test_error_unexpected_char() {
        assert_eq!(
            tokenize("foo(#)"),
            Err(LexError::UnexpectedChar {
                offset: 4,
                found: '#'
            })
        );
        assert!(matches!(
            tokenize("- 1"),
            Err(LexError::UnexpectedChar { found: '-', .. })
        ));
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize(" \n\t ").unwrap().is_empty());
    }
}
