//! spec-repo: build typed values from object-spec text
//!
//! Text handling (lexer, parser, tree, serializer, diagnostics) lives in
//! `spec-core`. This crate adds the build side:
//! - Type registry with ordered constructor overloads
//! - Recursive builder with overload selection and safe widening
//! - Built values and the pulse capability
//! - Build context forwarded to context-aware constructors
//! - `Repo` facade producing immutable `ParsedSpec`s
//! - YAML configuration
//!
//! ```
//! use std::sync::Arc;
//! use spec_repo::{BuildContext, RegistryRepo, Repo, Spec, TypeRegistry, Value};
//! use spec_types::Urn;
//!
//! let repo = RegistryRepo::new(Arc::new(TypeRegistry::standard()));
//! let spec = repo
//!     .make(&Urn::anonymous(), &Spec::simple("[java.lang.Double(-1.5), 4]"))
//!     .unwrap();
//! let value = spec.instantiate(&BuildContext::default()).unwrap();
//! assert_eq!(value, Value::Array(vec![Value::Double(-1.5), Value::Integer(4)]));
//! ```

pub mod builder;
pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod instance;
pub mod registry;
pub mod repo;
pub mod value;

// Re-export commonly used types
pub use builder::{instantiate, select_signature, Args, Builder};
pub use builtins::standard_types;
pub use config::{ConfigLoader, RepoConfig};
pub use context::{BuildContext, Users};
pub use error::{BuildError, ConstructorError, SpecError};
pub use instance::{BuiltObject, Instance, PulseError};
pub use registry::{ParamType, RegistryBuilder, Signature, TypeRegistry};
pub use repo::{ParsedSpec, RegistryRepo, Repo, Spec};
pub use value::{ArgType, Value};

// `Repo::make` is the parse entry point; these appear in its signatures
pub use spec_core::{AstNode, ParseError};
