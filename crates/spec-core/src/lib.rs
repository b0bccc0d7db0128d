//! spec-core: text side of the object-spec language
//!
//! Pure text processing with NO type registry and NO construction:
//! - Lexer (nom) producing spanned tokens
//! - Recursive-descent parser producing an immutable tree
//! - Canonical serializer (`to_spec_string`) with raw-block passthrough
//! - Diagnostic types with line/column spans
//! - Catalog validator for unknown type names
//!
//! Resolution of type names and value construction live in `spec-repo`.

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;
pub mod stream;
pub mod validator;

// Re-export commonly used types
pub use ast::{AstNode, AstVisitor, Construct, Literal, LiteralKind, Span};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity, SourceSpan};
pub use error::{LexError, ParseError, SyntaxError};
pub use parser::{parse_spec, parse_spec_with, ParseOptions, DEFAULT_MAX_DEPTH};
pub use validator::{validate, TypeCatalog, ValidationResult, ValidationStats};
