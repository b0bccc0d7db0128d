//! Canonical text rendering of the tree
//!
//! `parse_spec(node.to_spec_string())` yields a tree equal to `node` (spans
//! aside), so rendering twice is a fixpoint. Raw blocks are the exception to
//! canonicalization: they print their exact source slice.

use crate::ast::{AstNode, Construct, Literal};

impl AstNode {
    // =========================================================================
    // SPEC RENDERING
    // =========================================================================

    /// Render the node back to spec text
    pub fn to_spec_string(&self) -> String {
        match self {
            AstNode::Literal(lit) => lit.to_spec_string(),
            AstNode::Construct(c) => c.to_spec_string(),
            AstNode::Array { items, .. } => {
                let inner: Vec<String> = items.iter().map(|i| i.to_spec_string()).collect();
                format!("[{}]", inner.join(", "))
            }
            AstNode::Map { entries, .. } => {
                let pairs: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.to_spec_string()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
            AstNode::RawText { source, .. } => source.clone(),
        }
    }
}

impl Construct {
    /// `type.Name(arg, arg)`
    pub fn to_spec_string(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.to_spec_string()).collect();
        format!("{}({})", self.type_name, args.join(", "))
    }
}

impl Literal {
    /// Render the literal back to spec text
    pub fn to_spec_string(&self) -> String {
        match self {
            Literal::Integer(i) => i.to_string(),
            Literal::Long(l) => format!("{}L", l),
            Literal::Double(d) => format_double(*d),
            Literal::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Literal::String(s) => quote(s),
        }
    }
}

impl std::fmt::Display for AstNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_spec_string())
    }
}

/// Double-quote `text`, escaping backslashes and double quotes
pub fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Shortest decimal form that still lexes as a Double (always has a `.`)
///
/// The parser only produces finite doubles; a hand-built non-finite value
/// renders as Rust prints it and does not re-parse.
fn format_double(d: f64) -> String {
    let text = d.to_string();
    if d.is_finite() && !text.contains('.') {
        format!("{}.0", text)
    } else {
        text
    }
}


#[cfg(test)]
mod proptests {
    use crate::ast::{AstNode, Construct, Literal, Span};
    use crate::parser::parse_spec;
    use proptest::prelude::*;

    // -- Strategy helpers --

    fn arb_type_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9]{0,5}(\\.[A-Z][a-zA-Z0-9_$]{0,5}){0,2}"
    }

    fn arb_literal() -> impl Strategy<Value = AstNode> {
        prop_oneof![
            any::<i32>().prop_map(|i| AstNode::Literal(Literal::Integer(i))),
            any::<i64>().prop_map(|l| AstNode::Literal(Literal::Long(l))),
            (-1.0e9f64..1.0e9f64).prop_map(|d| AstNode::Literal(Literal::Double(d))),
            any::<bool>().prop_map(|b| AstNode::Literal(Literal::Boolean(b))),
            "\\PC{0,12}".prop_map(|s| AstNode::Literal(Literal::String(s))),
        ]
    }

    fn arb_node() -> impl Strategy<Value = AstNode> {
        arb_literal().prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                (arb_type_name(), prop::collection::vec(inner.clone(), 0..4)).prop_map(
                    |(name, args)| AstNode::Construct(Construct::new(name, args))
                ),
                prop::collection::vec(inner.clone(), 0..4).prop_map(|items| AstNode::Array {
                    items,
                    span: Span::default(),
                }),
                prop::collection::vec(("[a-z\\\\\"' ]{0,6}", inner), 0..4).prop_map(
                    |entries| AstNode::Map {
                        entries,
                        span: Span::default(),
                    }
                ),
            ]
        })
    }

    proptest! {
        /// Rendering a reparsed rendering changes nothing.
        #[test]
        fn rendering_is_a_fixpoint(node in arb_node()) {
            let once = node.to_spec_string();
            let reparsed = parse_spec(&once).expect("canonical text must parse");
            prop_assert_eq!(reparsed.to_spec_string(), once);
        }

        /// Whole-text raw blocks come back byte-for-byte.
        #[test]
        fn raw_text_identity(content in "[^\"]{0,40}", lead in "[ \\n\\t]{0,3}") {
            let source = format!("{}\"\"\"{}\"\"\"", lead, content);
            let root = parse_spec(&source).expect("raw block must parse");
            prop_assert_eq!(root.to_spec_string(), source);
        }
    }
}
