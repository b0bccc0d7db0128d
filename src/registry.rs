//! Type Registry
//!
//! Maps fully-qualified type names to ordered lists of constructor
//! signatures. A registry is assembled once with [`RegistryBuilder`] and is
//! read-only afterwards, so any number of threads may resolve against it
//! without locking.
//!
//! # Constructor kinds
//!
//! - **Plain** ([`Signature::new`]) - receives only the built arguments
//! - **Context-aware** ([`Signature::with_context`]) - also receives the
//!   [`BuildContext`] as implicit trailing parameters the spec text never names
//!
//! # Example
//!
//! ```
//! use spec_repo::registry::{ParamType, Signature, TypeRegistry};
//! use spec_repo::value::Value;
//!
//! let registry = TypeRegistry::builder()
//!     .register(
//!         "com.example.Twice",
//!         Signature::new(vec![ParamType::Long], |args| Ok(Value::Long(args.long(0)? * 2))),
//!     )
//!     .build();
//! assert!(registry.contains("com.example.Twice"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use spec_core::TypeCatalog;
use tracing::{info, warn};

use crate::builder::Args;
use crate::context::BuildContext;
use crate::error::ConstructorError;
use crate::value::{ArgType, Value};

// =============================================================================
// PARAMETER TYPES
// =============================================================================

/// Semantic type a constructor parameter accepts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Integer,
    Long,
    Double,
    Boolean,
    Text,
    Array,
    Map,
    /// Object built by the named type
    Object(String),
    /// Anything, passed through unchanged
    Any,
}

impl ParamType {
    /// Same kind, objects compared by type name
    pub fn accepts_exactly(&self, arg: &ArgType) -> bool {
        matches!(
            (self, arg),
            (ParamType::Integer, ArgType::Integer)
                | (ParamType::Long, ArgType::Long)
                | (ParamType::Double, ArgType::Double)
                | (ParamType::Boolean, ArgType::Boolean)
                | (ParamType::Text, ArgType::Text)
                | (ParamType::Array, ArgType::Array)
                | (ParamType::Map, ArgType::Map)
        ) || matches!((self, arg), (ParamType::Object(p), ArgType::Object(a)) if p == a)
    }

    /// Exact match or a safe widening; never narrows
    pub fn accepts(&self, arg: &ArgType) -> bool {
        self.accepts_exactly(arg)
            || matches!(
                (self, arg),
                (ParamType::Long, ArgType::Integer)
                    | (ParamType::Double, ArgType::Integer)
                    | (ParamType::Double, ArgType::Long)
                    | (ParamType::Any, _)
            )
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Integer => f.write_str("Integer"),
            ParamType::Long => f.write_str("Long"),
            ParamType::Double => f.write_str("Double"),
            ParamType::Boolean => f.write_str("Boolean"),
            ParamType::Text => f.write_str("String"),
            ParamType::Array => f.write_str("Array"),
            ParamType::Map => f.write_str("Map"),
            ParamType::Object(name) => f.write_str(name),
            ParamType::Any => f.write_str("Any"),
        }
    }
}

// =============================================================================
// SIGNATURES
// =============================================================================

type PlainFn = dyn Fn(Args) -> Result<Value, ConstructorError> + Send + Sync;
type ContextFn = dyn Fn(Args, &BuildContext) -> Result<Value, ConstructorError> + Send + Sync;

/// Constructor implementation variants
#[derive(Clone)]
pub enum Constructor {
    /// Built arguments only
    Plain(Arc<PlainFn>),
    /// Built arguments plus the ambient context
    WithContext(Arc<ContextFn>),
}

impl Constructor {
    /// Run the constructor, supplying the context when it asks for one
    pub fn invoke(&self, args: Args, ctx: &BuildContext) -> Result<Value, ConstructorError> {
        match self {
            Constructor::Plain(f) => f(args),
            Constructor::WithContext(f) => f(args, ctx),
        }
    }

    pub fn takes_context(&self) -> bool {
        matches!(self, Constructor::WithContext(_))
    }
}

/// One constructor overload of a type
#[derive(Clone)]
pub struct Signature {
    params: Vec<ParamType>,
    constructor: Constructor,
}

impl Signature {
    pub fn new<F>(params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(Args) -> Result<Value, ConstructorError> + Send + Sync + 'static,
    {
        Self {
            params,
            constructor: Constructor::Plain(Arc::new(f)),
        }
    }

    /// Constructor that also receives the build context
    pub fn with_context<F>(params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(Args, &BuildContext) -> Result<Value, ConstructorError> + Send + Sync + 'static,
    {
        Self {
            params,
            constructor: Constructor::WithContext(Arc::new(f)),
        }
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn constructor(&self) -> &Constructor {
        &self.constructor
    }

    pub fn takes_context(&self) -> bool {
        self.constructor.takes_context()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ParamType::to_string).collect();
        write!(f, "({})", params.join(", "))?;
        if self.takes_context() {
            f.write_str(" +context")?;
        }
        Ok(())
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Frozen type registry
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, Vec<Signature>>,
}

impl TypeRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Candidate signatures in declaration order
    pub fn lookup(&self, type_name: &str) -> Option<&[Signature]> {
        self.types.get(type_name).map(Vec::as_slice)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TypeCatalog for TypeRegistry {
    fn contains_type(&self, name: &str) -> bool {
        self.contains(name)
    }

    fn type_names(&self) -> Vec<String> {
        TypeRegistry::type_names(self)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn arities(&self, name: &str) -> Option<Vec<usize>> {
        self.lookup(name)
            .map(|sigs| sigs.iter().map(Signature::arity).collect())
    }
}

/// Setup-time registry assembly
#[derive(Default)]
pub struct RegistryBuilder {
    types: HashMap<String, Vec<Signature>>,
}

impl RegistryBuilder {
    /// Add an overload; overloads of one type keep their declaration order
    pub fn register(mut self, type_name: impl Into<String>, signature: Signature) -> Self {
        let type_name = type_name.into();
        let overloads = self.types.entry(type_name.clone()).or_default();
        if overloads.iter().any(|s| s.params == signature.params) {
            warn!(
                "Duplicate signature {}{} registered; the earlier declaration wins",
                type_name, signature
            );
        }
        overloads.push(signature);
        self
    }

    /// Freeze into a read-only registry
    pub fn build(self) -> TypeRegistry {
        info!(
            "TypeRegistry built with {} types and {} signatures",
            self.types.len(),
            self.types.values().map(Vec::len).sum::<usize>()
        );
        TypeRegistry { types: self.types }
    }
}

// =============================================================================
// PROCESS-WIDE REGISTRY
// =============================================================================

/// Global registry singleton
static GLOBAL_REGISTRY: OnceLock<Arc<TypeRegistry>> = OnceLock::new();

/// Install the process-wide registry (call during startup)
///
/// Only the first call succeeds; later calls get their registry back.
pub fn install(registry: TypeRegistry) -> Result<Arc<TypeRegistry>, TypeRegistry> {
    let shared = Arc::new(registry);
    match GLOBAL_REGISTRY.set(shared.clone()) {
        Ok(()) => Ok(shared),
        Err(rejected) => {
            drop(shared);
            Err(Arc::try_unwrap(rejected).unwrap_or_default())
        }
    }
}

/// The installed process-wide registry, if any
pub fn global() -> Option<Arc<TypeRegistry>> {
    GLOBAL_REGISTRY.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(_: Args) -> Result<Value, ConstructorError> {
        Ok(Value::Boolean(true))
    }

    #[test]
    fn test_exact_and_widening() {
        assert!(ParamType::Long.accepts_exactly(&ArgType::Long));
        assert!(!ParamType::Long.accepts_exactly(&ArgType::Integer));
        assert!(ParamType::Long.accepts(&ArgType::Integer));
        assert!(ParamType::Double.accepts(&ArgType::Integer));
        assert!(ParamType::Double.accepts(&ArgType::Long));
        assert!(ParamType::Any.accepts(&ArgType::Object("a.B".into())));
        assert!(!ParamType::Any.accepts_exactly(&ArgType::Integer));
    }

    #[test]
    fn test_no_narrowing() {
        assert!(!ParamType::Integer.accepts(&ArgType::Long));
        assert!(!ParamType::Long.accepts(&ArgType::Double));
        assert!(!ParamType::Integer.accepts(&ArgType::Double));
        assert!(!ParamType::Text.accepts(&ArgType::Integer));
    }

    #[test]
    fn test_objects_match_by_type_name() {
        let param = ParamType::Object("com.Foo".into());
        assert!(param.accepts(&ArgType::Object("com.Foo".into())));
        assert!(!param.accepts(&ArgType::Object("com.Bar".into())));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let registry = TypeRegistry::builder()
            .register("com.Foo", Signature::new(vec![ParamType::Integer], unit))
            .register("com.Foo", Signature::new(vec![ParamType::Long], unit))
            .register("com.Bar", Signature::new(vec![], unit))
            .build();
        let overloads = registry.lookup("com.Foo").unwrap();
        assert_eq!(overloads.len(), 2);
        assert_eq!(overloads[0].params(), &[ParamType::Integer]);
        assert_eq!(overloads[1].params(), &[ParamType::Long]);
        assert_eq!(registry.type_names(), vec!["com.Bar", "com.Foo"]);
        assert!(registry.lookup("com.Baz").is_none());
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::with_context(vec![ParamType::Long, ParamType::Text], |_, _| {
            Ok(Value::Integer(0))
        });
        assert_eq!(sig.to_string(), "(Long, String) +context");
        assert!(sig.takes_context());
        assert_eq!(sig.arity(), 2);
    }

    #[test]
    fn test_catalog_view() {
        let registry = TypeRegistry::builder()
            .register("com.Foo", Signature::new(vec![], unit))
            .build();
        let catalog: &dyn TypeCatalog = &registry;
        assert!(catalog.contains_type("com.Foo"));
        assert!(!catalog.contains_type("com.foo"));
        assert_eq!(catalog.type_names(), vec!["com.Foo".to_string()]);
        assert_eq!(catalog.arities("com.Foo"), Some(vec![0]));
        assert_eq!(catalog.arities("com.Bar"), None);
    }
}
