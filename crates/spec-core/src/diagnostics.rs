//! Unified Diagnostics Module
//!
//! Single diagnostic type for parse failures and catalog validation findings,
//! carrying 1-based line/column spans suitable for editors and the CLI.

use serde::{Deserialize, Serialize};
use spec_types::SourceLocation;

use crate::error::{LexError, ParseError};

/// Diagnostic severity level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic codes for categorizing issues
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // =========================================================================
    // Parse errors
    // =========================================================================
    SyntaxError,
    UnterminatedLiteral,
    UnexpectedChar,
    NestingTooDeep,

    // =========================================================================
    // Validation findings
    // =========================================================================
    UnknownType,
    /// Known type, but no signature takes that many arguments
    ArityMismatch,
}

/// Source location span
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Create a span from byte offsets (requires source text for line/col calculation)
    pub fn from_byte_offset(source: &str, start: usize, end: usize) -> Self {
        let (start_line, start_col) = line_col(source, start);
        let (end_line, end_col) = line_col(source, end);
        Self::new(start_line, start_col, end_line, end_col)
    }
}

impl std::fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

fn line_col(source: &str, offset: usize) -> (u32, u32) {
    let loc = SourceLocation::locate(source, offset);
    (
        u32::try_from(loc.line).unwrap_or(u32::MAX),
        u32::try_from(loc.column).unwrap_or(u32::MAX),
    )
}

/// Suggested fix for code actions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuggestedFix {
    pub description: String,
    pub replacement: String,
    pub span: SourceSpan,
}

/// A diagnostic message with location, severity, and optional fix
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub span: Option<SourceSpan>,
    pub suggested_fix: Option<SuggestedFix>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, code: DiagnosticCode, message: String) -> Self {
        Self {
            severity,
            code,
            message,
            span: None,
            suggested_fix: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, code, message.into())
    }

    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, code, message.into())
    }

    /// Add source span
    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Add suggested fix
    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Check if this is a hard error (the text cannot be turned into a tree)
    pub fn is_hard_error(&self) -> bool {
        self.is_error()
            && matches!(
                self.code,
                DiagnosticCode::SyntaxError
                    | DiagnosticCode::UnterminatedLiteral
                    | DiagnosticCode::UnexpectedChar
                    | DiagnosticCode::NestingTooDeep
            )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.span {
            Some(span) => write!(f, "{}: {}: {}", span, level, self.message)?,
            None => write!(f, "{}: {}", level, self.message)?,
        }
        if let Some(fix) = &self.suggested_fix {
            write!(f, " ({})", fix.description)?;
        }
        Ok(())
    }
}

// =============================================================================
// Convenience Builders
// =============================================================================

impl ParseError {
    /// Render the failure as a positioned diagnostic against `source`
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        let code = match self {
            ParseError::Lex(LexError::UnterminatedString { .. })
            | ParseError::Lex(LexError::UnterminatedRawBlock { .. }) => {
                DiagnosticCode::UnterminatedLiteral
            }
            ParseError::Lex(LexError::UnexpectedChar { .. }) => DiagnosticCode::UnexpectedChar,
            ParseError::Syntax(e) if e.expected.contains("levels of nesting") => {
                DiagnosticCode::NestingTooDeep
            }
            ParseError::Syntax(_) => DiagnosticCode::SyntaxError,
        };
        let offset = self.offset();
        Diagnostic::error(code, self.to_string())
            .with_span(SourceSpan::from_byte_offset(source, offset, offset))
    }
}

/// Create an error for a type name the catalog does not know
pub fn unknown_type_error(type_name: &str, span: Option<SourceSpan>) -> Diagnostic {
    let mut diag = Diagnostic::error(
        DiagnosticCode::UnknownType,
        format!("unknown type '{}'", type_name),
    );
    if let Some(s) = span {
        diag = diag.with_span(s);
    }
    diag
}

/// Create a warning for a known type called with an arity none of its signatures take
pub fn arity_mismatch_warning(
    type_name: &str,
    arity: usize,
    accepted: &[usize],
    span: Option<SourceSpan>,
) -> Diagnostic {
    let accepted: Vec<String> = accepted.iter().map(usize::to_string).collect();
    let mut diag = Diagnostic::warning(
        DiagnosticCode::ArityMismatch,
        format!(
            "no signature of '{}' takes {} argument(s) (accepts {})",
            type_name,
            arity,
            accepted.join(", ")
        ),
    );
    if let Some(s) = span {
        diag = diag.with_span(s);
    }
    diag
}

// =============================================================================
// Tests
// =============================================================================
