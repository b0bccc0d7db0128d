//! Resolver / Builder
//!
//! Turns a parsed tree into a [`Value`] against a [`TypeRegistry`].
//!
//! Evaluation is depth-first and strictly left to right, so constructor side
//! effects happen in source order and exactly once per build. A construct's
//! type name is looked up before its arguments are built; the arguments are
//! then built, an overload is selected, and the chosen constructor runs.
//! Nothing is cached between builds.
//!
//! # Overload selection
//!
//! Among the signatures with matching arity, the first (in declaration
//! order) whose parameters all accept their argument exactly wins. Failing
//! that, the first whose parameters accept their argument through a safe
//! widening (`Integer -> Long`, `Integer -> Double`, `Long -> Double`,
//! anything -> `Any`) wins. Arguments are widened to the selected parameter
//! types before the constructor sees them.

use std::collections::HashMap;

use indexmap::IndexMap;
use spec_core::{AstNode, Construct, Literal};
use tracing::debug;

use crate::context::BuildContext;
use crate::error::{BuildError, ConstructorError};
use crate::instance::BuiltObject;
use crate::registry::{ParamType, Signature, TypeRegistry};
use crate::value::{ArgType, Value};

// =============================================================================
// CONSTRUCTOR ARGUMENTS
// =============================================================================

/// Built arguments handed to a constructor, already widened to its parameters
#[derive(Debug, Clone)]
pub struct Args {
    type_name: String,
    values: Vec<Value>,
}

impl Args {
    pub fn new(type_name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            values,
        }
    }

    /// Registered name of the type being built
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    fn typed<'a, T>(
        &'a self,
        index: usize,
        wanted: &str,
        view: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Result<T, ConstructorError> {
        let value = self.values.get(index).ok_or_else(|| {
            ConstructorError::invalid_argument(&self.type_name, index, "missing argument")
        })?;
        view(value).ok_or_else(|| {
            ConstructorError::invalid_argument(
                &self.type_name,
                index,
                format!("expected {}, got {}", wanted, value.semantic_type()),
            )
        })
    }

    pub fn integer(&self, index: usize) -> Result<i32, ConstructorError> {
        self.typed(index, "Integer", Value::as_integer)
    }

    pub fn long(&self, index: usize) -> Result<i64, ConstructorError> {
        self.typed(index, "Long", Value::as_long)
    }

    pub fn double(&self, index: usize) -> Result<f64, ConstructorError> {
        self.typed(index, "Double", Value::as_double)
    }

    pub fn boolean(&self, index: usize) -> Result<bool, ConstructorError> {
        self.typed(index, "Boolean", Value::as_boolean)
    }

    pub fn text(&self, index: usize) -> Result<&str, ConstructorError> {
        self.typed(index, "String", Value::as_text)
    }

    pub fn array(&self, index: usize) -> Result<&[Value], ConstructorError> {
        self.typed(index, "Array", Value::as_array)
    }

    pub fn map(&self, index: usize) -> Result<&IndexMap<String, Value>, ConstructorError> {
        self.typed(index, "Map", Value::as_map)
    }

    pub fn object(&self, index: usize) -> Result<&BuiltObject, ConstructorError> {
        self.typed(index, "object", Value::as_object)
    }
}

// =============================================================================
// OVERLOAD SELECTION
// =============================================================================

/// Pick the overload for `arg_types`: first exact match, else first widening match
pub fn select_signature<'r>(
    candidates: &'r [Signature],
    arg_types: &[ArgType],
) -> Option<&'r Signature> {
    let same_arity = || {
        candidates
            .iter()
            .filter(move |sig| sig.arity() == arg_types.len())
    };
    same_arity()
        .find(|sig| {
            sig.params()
                .iter()
                .zip(arg_types)
                .all(|(param, arg)| param.accepts_exactly(arg))
        })
        .or_else(|| {
            same_arity().find(|sig| {
                sig.params()
                    .iter()
                    .zip(arg_types)
                    .all(|(param, arg)| param.accepts(arg))
            })
        })
}

/// Widen a value to the parameter type that accepted it
fn coerce(value: Value, param: &ParamType) -> Value {
    match (param, value) {
        (ParamType::Long, Value::Integer(i)) => Value::Long(i64::from(i)),
        (ParamType::Double, Value::Integer(i)) => Value::Double(f64::from(i)),
        (ParamType::Double, Value::Long(l)) => Value::Double(l as f64),
        (_, value) => value,
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Recursive builder over a frozen registry
pub struct Builder<'r> {
    registry: &'r TypeRegistry,
    aliases: Option<&'r HashMap<String, String>>,
}

impl<'r> Builder<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            aliases: None,
        }
    }

    /// Rewrite short type names to registered names before lookup
    pub fn with_aliases(mut self, aliases: &'r HashMap<String, String>) -> Self {
        self.aliases = Some(aliases);
        self
    }

    /// Build `node`, failing fast on the first unresolvable node
    pub fn build(&self, node: &AstNode, ctx: &BuildContext) -> Result<Value, BuildError> {
        match node {
            AstNode::Literal(lit) => Ok(literal_value(lit)),
            AstNode::Construct(construct) => self.build_construct(construct, ctx),
            AstNode::Array { items, .. } => items
                .iter()
                .map(|item| self.build(item, ctx))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            AstNode::Map { entries, .. } => {
                let mut map = IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    let built = self.build(value, ctx)?;
                    map.insert(key.clone(), built);
                }
                Ok(Value::Map(map))
            }
            AstNode::RawText { content, .. } => Ok(Value::Text(content.clone())),
        }
    }

    fn resolve_name<'n>(&self, type_name: &'n str) -> &'n str
    where
        'r: 'n,
    {
        self.aliases
            .and_then(|aliases| aliases.get(type_name))
            .map(String::as_str)
            .unwrap_or(type_name)
    }

    fn build_construct(
        &self,
        construct: &Construct,
        ctx: &BuildContext,
    ) -> Result<Value, BuildError> {
        let registered = self.resolve_name(&construct.type_name);
        let candidates =
            self.registry
                .lookup(registered)
                .ok_or_else(|| BuildError::NotFound {
                    type_name: construct.type_name.clone(),
                })?;

        let values = construct
            .args
            .iter()
            .map(|arg| self.build(arg, ctx))
            .collect::<Result<Vec<_>, _>>()?;
        let arg_types: Vec<ArgType> = values.iter().map(Value::semantic_type).collect();

        let signature =
            select_signature(candidates, &arg_types).ok_or_else(|| BuildError::Resolution {
                type_name: construct.type_name.clone(),
                arg_types: arg_types.clone(),
            })?;
        debug!(
            type_name = registered,
            signature = %signature,
            "selected constructor"
        );

        let coerced = values
            .into_iter()
            .zip(signature.params())
            .map(|(value, param)| coerce(value, param))
            .collect();
        signature
            .constructor()
            .invoke(Args::new(registered, coerced), ctx)
            .map_err(BuildError::Constructor)
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Integer(i) => Value::Integer(*i),
        Literal::Long(l) => Value::Long(*l),
        Literal::Double(d) => Value::Double(*d),
        Literal::Boolean(b) => Value::Boolean(*b),
        Literal::String(s) => Value::Text(s.clone()),
    }
}

/// Build `node` against `registry` without aliases
pub fn instantiate(
    node: &AstNode,
    registry: &TypeRegistry,
    ctx: &BuildContext,
) -> Result<Value, BuildError> {
    Builder::new(registry).build(node, ctx)
}
