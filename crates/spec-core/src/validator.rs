//! Catalog Validator for parsed specs
//!
//! Walks a parsed tree and reports every construct whose type name is not in
//! a [`TypeCatalog`]. Unlike instantiation, which stops at the first unknown
//! type, validation collects all of them and never builds anything.
//!
//! Known types called with an argument count no signature accepts get an
//! `ArityMismatch` warning. Argument types are not checked here.
//!
//! # Usage
//!
//! ```
//! use spec_core::parser::parse_spec;
//! use spec_core::validator::{validate, TypeCatalog};
//!
//! struct Known;
//! impl TypeCatalog for Known {
//!     fn contains_type(&self, name: &str) -> bool {
//!         name == "java.lang.Integer"
//!     }
//! }
//!
//! let source = "[java.lang.Integer(1), java.lang.Intger(2)]";
//! let root = parse_spec(source).unwrap();
//! let result = validate(&root, source, &Known);
//! assert!(!result.is_valid());
//! assert_eq!(result.stats.construct_count, 2);
//! ```

use crate::ast::{depth, AstNode, AstVisitor, Construct};
use crate::diagnostics::{
    arity_mismatch_warning, unknown_type_error, Diagnostic, SourceSpan, SuggestedFix,
};

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.85;

// =============================================================================
// CATALOG
// =============================================================================

/// Something that knows which type names can be constructed
pub trait TypeCatalog {
    fn contains_type(&self, name: &str) -> bool;

    /// Every known name, used for suggestions. Empty disables them.
    fn type_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Argument counts the type's signatures accept, in declaration order.
    /// `None` skips the arity check.
    fn arities(&self, _name: &str) -> Option<Vec<usize>> {
        None
    }
}

// =============================================================================
// VALIDATION RESULT
// =============================================================================

/// Result of validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ValidationStats,
}

impl ValidationResult {
    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Statistics gathered during validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub construct_count: usize,
    pub unknown_type_count: usize,
    pub raw_text_count: usize,
    /// Deepest construct/array/map nesting seen
    pub max_depth: usize,
}

// =============================================================================
// VALIDATOR
// =============================================================================

/// Check every type name in `root` against `catalog`
///
/// `source` is the text `root` was parsed from; it is only used to turn
/// byte spans into line/column positions.
pub fn validate(root: &AstNode, source: &str, catalog: &dyn TypeCatalog) -> ValidationResult {
    let mut validator = CatalogValidator {
        source,
        catalog,
        known: catalog.type_names(),
        result: ValidationResult::default(),
    };
    validator.visit_node(root);
    validator.result.stats.max_depth = depth(root);
    validator.result
}

struct CatalogValidator<'a> {
    source: &'a str,
    catalog: &'a dyn TypeCatalog,
    known: Vec<String>,
    result: ValidationResult,
}

impl CatalogValidator<'_> {
    fn suggest(&self, name: &str) -> Option<&str> {
        self.known
            .iter()
            .map(|k| (k, strsim::jaro_winkler(name, k)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k.as_str())
    }
}

impl AstVisitor for CatalogValidator<'_> {
    fn visit_construct(&mut self, construct: &Construct) {
        self.result.stats.construct_count += 1;

        let span = SourceSpan::from_byte_offset(
            self.source,
            construct.span.start,
            construct.span.start + construct.type_name.len(),
        );
        if !self.catalog.contains_type(&construct.type_name) {
            self.result.stats.unknown_type_count += 1;
            let mut diag = unknown_type_error(&construct.type_name, Some(span.clone()));
            if let Some(candidate) = self.suggest(&construct.type_name) {
                diag = diag.with_fix(SuggestedFix {
                    description: format!("did you mean '{}'?", candidate),
                    replacement: candidate.to_string(),
                    span,
                });
            }
            self.result.diagnostics.push(diag);
        } else if let Some(accepted) = self.catalog.arities(&construct.type_name) {
            if !accepted.contains(&construct.arity()) {
                self.result.diagnostics.push(arity_mismatch_warning(
                    &construct.type_name,
                    construct.arity(),
                    &accepted,
                    Some(span),
                ));
            }
        }

        for arg in &construct.args {
            self.visit_node(arg);
        }
    }

    fn visit_raw_text(&mut self, _node: &AstNode) {
        self.result.stats.raw_text_count += 1;
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCode;
    use crate::parser::parse_spec;

    struct Names(Vec<&'static str>);

    impl TypeCatalog for Names {
        fn contains_type(&self, name: &str) -> bool {
            self.0.contains(&name)
        }

        fn type_names(&self) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    fn catalog() -> Names {
        Names(vec!["java.lang.Integer", "java.lang.String", "com.second"])
    }

    #[test]
    fn test_all_known() {
        let source = "com.second(java.lang.Integer(1), java.lang.String('x'))";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        assert!(result.is_valid());
        assert_eq!(result.stats.construct_count, 3);
        assert_eq!(result.stats.max_depth, 2);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_reports_every_unknown() {
        let source = "com.first(com.second(com.third(), com.forth()))";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        assert!(!result.is_valid());
        assert_eq!(result.stats.unknown_type_count, 3);
        let messages: Vec<&str> = result
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "unknown type 'com.first'",
                "unknown type 'com.third'",
                "unknown type 'com.forth'",
            ]
        );
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::UnknownType));
    }

    #[test]
    fn test_span_points_at_type_name() {
        let source = "[1,\n  com.nope()]";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        assert_eq!(
            result.diagnostics[0].span,
            Some(SourceSpan::new(2, 3, 2, 11))
        );
    }

    #[test]
    fn test_suggestion_for_typo() {
        let source = "java.lang.Intger(5)";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        let fix = result.diagnostics[0]
            .suggested_fix
            .as_ref()
            .expect("expected a suggestion");
        assert_eq!(fix.replacement, "java.lang.Integer");
    }

    #[test]
    fn test_no_suggestion_for_unrelated_name() {
        let source = "zzz.Qqq()";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        assert!(result.diagnostics[0].suggested_fix.is_none());
    }

    struct OneArg;

    impl TypeCatalog for OneArg {
        fn contains_type(&self, name: &str) -> bool {
            name == "java.lang.Long"
        }

        fn arities(&self, _name: &str) -> Option<Vec<usize>> {
            Some(vec![1])
        }
    }

    #[test]
    fn test_arity_mismatch_is_warning() {
        let source = "[java.lang.Long(1), java.lang.Long(1, 2)]";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &OneArg);
        assert!(result.is_valid());
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.code, DiagnosticCode::ArityMismatch);
        assert!(diag.is_warning());
        assert_eq!(diag.span, Some(SourceSpan::new(1, 21, 1, 35)));
    }

    #[test]
    fn test_raw_text_counted() {
        let source = "\"\"\"free text\"\"\"";
        let root = parse_spec(source).unwrap();
        let result = validate(&root, source, &catalog());
        assert!(result.is_valid());
        assert_eq!(result.stats.raw_text_count, 1);
    }
}
