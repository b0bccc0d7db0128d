//! Abstract Spec Tree
//!
//! The parser produces a pure tree of immutable nodes:
//! - **Literals**: terminal scalar values (integers, longs, doubles, booleans, strings)
//! - **Construct**: `type.Name(arg, ...)`, a request to build a value of a named type
//! - **Containers**: arrays and string-keyed maps
//! - **RawText**: a `"""`-delimited block captured byte-for-byte
//!
//! Type names are never resolved here; any syntactically valid dotted path is
//! kept as written. Nodes hold no back-references, so the tree is acyclic by
//! construction.

use serde::{Deserialize, Serialize};

// =============================================================================
// AST NODE - THE CORE ENUM
// =============================================================================

/// AST Node - all possible node types in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AstNode {
    /// Literal value - evaluates to itself
    Literal(Literal),

    /// Constructor call: `com.example.Foo(1, 'x')`
    Construct(Construct),

    /// Ordered sequence: `[a, b, c]`
    Array { items: Vec<AstNode>, span: Span },

    /// Ordered key/value pairs: `{"k": v}`
    ///
    /// Duplicate keys are kept in the tree; the builder applies last-wins.
    Map {
        entries: Vec<(String, AstNode)>,
        span: Span,
    },

    /// Triple-quoted text block
    RawText {
        /// Exact source slice, delimiters included
        source: String,
        /// Text between the delimiters
        content: String,
        span: Span,
    },
}

impl AstNode {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Create a string literal
    pub fn string(s: impl Into<String>) -> Self {
        AstNode::Literal(Literal::String(s.into()))
    }

    /// Create an integer literal
    pub fn integer(i: i32) -> Self {
        AstNode::Literal(Literal::Integer(i))
    }

    /// Create a long literal
    pub fn long(l: i64) -> Self {
        AstNode::Literal(Literal::Long(l))
    }

    // =========================================================================
    // PREDICATES
    // =========================================================================

    pub fn is_construct(&self) -> bool {
        matches!(self, AstNode::Construct(_))
    }

    pub fn is_raw_text(&self) -> bool {
        matches!(self, AstNode::RawText { .. })
    }

    // =========================================================================
    // EXTRACTORS
    // =========================================================================

    /// Get as string (from a string literal or a raw block's content)
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AstNode::Literal(Literal::String(s)) => Some(s),
            AstNode::RawText { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i32> {
        match self {
            AstNode::Literal(Literal::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get as 64-bit integer (widening 32-bit literals)
    pub fn as_long(&self) -> Option<i64> {
        match self {
            AstNode::Literal(Literal::Long(l)) => Some(*l),
            AstNode::Literal(Literal::Integer(i)) => Some(i64::from(*i)),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            AstNode::Literal(Literal::Double(d)) => Some(*d),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            AstNode::Literal(Literal::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn as_construct(&self) -> Option<&Construct> {
        match self {
            AstNode::Construct(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[AstNode]> {
        match self {
            AstNode::Array { items, .. } => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(String, AstNode)]> {
        match self {
            AstNode::Map { entries, .. } => Some(entries),
            _ => None,
        }
    }

    /// Get the span of this node (literals don't track one)
    pub fn span(&self) -> Span {
        match self {
            AstNode::Literal(_) => Span::default(),
            AstNode::Construct(c) => c.span,
            AstNode::Array { span, .. } => *span,
            AstNode::Map { span, .. } => *span,
            AstNode::RawText { span, .. } => *span,
        }
    }
}

/// A constructor call: `type.Name(args...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Construct {
    /// Dotted type path exactly as written
    pub type_name: String,
    pub args: Vec<AstNode>,
    pub span: Span,
}

impl Construct {
    pub fn new(type_name: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self {
            type_name: type_name.into(),
            args,
            span: Span::default(),
        }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Last segment of the type path: `Foo` for `com.example.Foo`
    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.type_name)
    }
}

// =============================================================================
// LITERAL VALUES
// =============================================================================

/// Literal values - terminal nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// 32-bit integer: 42, -17
    Integer(i32),

    /// 64-bit integer: 8L, -44L
    Long(i64),

    /// Floating value: -44.66
    Double(f64),

    /// TRUE / FALSE
    Boolean(bool),

    /// Single- or double-quoted text, unescaped
    String(String),
}

impl Literal {
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Integer(_) => LiteralKind::Integer,
            Literal::Long(_) => LiteralKind::Long,
            Literal::Double(_) => LiteralKind::Double,
            Literal::Boolean(_) => LiteralKind::Boolean,
            Literal::String(_) => LiteralKind::String,
        }
    }
}

/// Discriminant of a `Literal`, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Integer,
    Long,
    Double,
    Boolean,
    String,
}

impl std::fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LiteralKind::Integer => "Integer",
            LiteralKind::Long => "Long",
            LiteralKind::Double => "Double",
            LiteralKind::Boolean => "Boolean",
            LiteralKind::String => "String",
        };
        f.write_str(name)
    }
}

// =============================================================================
// SOURCE SPAN
// =============================================================================

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of start
    pub start: usize,
    /// Byte offset of end (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Slice the covered text out of `source`
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

// =============================================================================
// TREE WALKING UTILITIES
// =============================================================================

/// Visitor trait for walking the AST depth-first, left to right
pub trait AstVisitor {
    fn visit_node(&mut self, node: &AstNode) {
        match node {
            AstNode::Literal(lit) => self.visit_literal(lit),
            AstNode::Construct(c) => self.visit_construct(c),
            AstNode::Array { items, .. } => {
                for item in items {
                    self.visit_node(item);
                }
            }
            AstNode::Map { entries, .. } => {
                for (_, value) in entries {
                    self.visit_node(value);
                }
            }
            AstNode::RawText { .. } => self.visit_raw_text(node),
        }
    }

    /// Visit a construct - the default walks its arguments
    fn visit_construct(&mut self, construct: &Construct) {
        for arg in &construct.args {
            self.visit_node(arg);
        }
    }

    fn visit_literal(&mut self, _literal: &Literal) {}

    fn visit_raw_text(&mut self, _node: &AstNode) {}
}

/// Maximum nesting depth of constructs, arrays and maps (a bare literal is 0)
pub fn depth(root: &AstNode) -> usize {
    match root {
        AstNode::Literal(_) | AstNode::RawText { .. } => 0,
        AstNode::Construct(c) => 1 + c.args.iter().map(depth).max().unwrap_or(0),
        AstNode::Array { items, .. } => 1 + items.iter().map(depth).max().unwrap_or(0),
        AstNode::Map { entries, .. } => {
            1 + entries.iter().map(|(_, v)| depth(v)).max().unwrap_or(0)
        }
    }
}
