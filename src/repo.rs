//! Repo facade
//!
//! `Repo::make` parses spec text once and hands back a [`ParsedSpec`]: an
//! immutable owner of the tree and the original text. Building is a separate
//! phase; every `instantiate` call re-runs the full build against the
//! registry, so a parsed spec can be built any number of times.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use spec_core::validator::{validate, TypeCatalog, ValidationResult};
use spec_core::{parse_spec_with, AstNode};
use spec_types::Urn;
use tracing::debug;

use crate::builder::Builder;
use crate::config::RepoConfig;
use crate::context::BuildContext;
use crate::error::{BuildError, SpecError};
use crate::registry::TypeRegistry;
use crate::value::Value;

/// Spec text as supplied by a user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Spec(String);

impl Spec {
    pub fn simple(text: impl Into<String>) -> Self {
        Spec(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Spec {
    fn from(text: &str) -> Self {
        Spec::simple(text)
    }
}

/// Turns spec text into parsed specs
pub trait Repo {
    fn make(&self, owner: &Urn, spec: &Spec) -> Result<ParsedSpec, SpecError>;
}

/// Repo backed by a frozen type registry
#[derive(Debug, Clone)]
pub struct RegistryRepo {
    registry: Arc<TypeRegistry>,
    config: RepoConfig,
    aliases: Arc<HashMap<String, String>>,
}

impl RegistryRepo {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, RepoConfig::default())
    }

    pub fn with_config(registry: Arc<TypeRegistry>, config: RepoConfig) -> Self {
        let aliases = Arc::new(config.aliases.clone());
        Self {
            registry,
            config,
            aliases,
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }
}

impl Repo for RegistryRepo {
    fn make(&self, owner: &Urn, spec: &Spec) -> Result<ParsedSpec, SpecError> {
        let root = parse_spec_with(spec.as_str(), self.config.parse_options())?;
        debug!(owner = %owner, "made spec");
        Ok(ParsedSpec {
            owner: owner.clone(),
            source: spec.as_str().to_string(),
            root,
            registry: Arc::clone(&self.registry),
            aliases: Arc::clone(&self.aliases),
        })
    }
}

/// A spec that parsed successfully, ready to be built
#[derive(Debug, Clone)]
pub struct ParsedSpec {
    owner: Urn,
    source: String,
    root: AstNode,
    registry: Arc<TypeRegistry>,
    aliases: Arc<HashMap<String, String>>,
}

impl ParsedSpec {
    /// Canonical text; a whole-text raw block comes back byte-for-byte
    pub fn as_text(&self) -> String {
        self.root.to_spec_string()
    }

    /// Build a fresh value; constructor side effects run again on every call
    pub fn instantiate(&self, ctx: &BuildContext) -> Result<Value, BuildError> {
        Builder::new(&self.registry)
            .with_aliases(&self.aliases)
            .build(&self.root, ctx)
    }

    pub fn root(&self) -> &AstNode {
        &self.root
    }

    /// Text the spec was parsed from, exactly as supplied
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn owner(&self) -> &Urn {
        &self.owner
    }

    /// Report every unknown type name without building anything
    pub fn check(&self) -> ValidationResult {
        let catalog = AliasedCatalog {
            registry: &self.registry,
            aliases: &self.aliases,
        };
        validate(&self.root, &self.source, &catalog)
    }
}

impl fmt::Display for ParsedSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// Registry view that also knows configured aliases
struct AliasedCatalog<'a> {
    registry: &'a TypeRegistry,
    aliases: &'a HashMap<String, String>,
}

impl TypeCatalog for AliasedCatalog<'_> {
    fn contains_type(&self, name: &str) -> bool {
        let registered = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.registry.contains(registered)
    }

    fn type_names(&self) -> Vec<String> {
        let mut names = TypeCatalog::type_names(self.registry);
        names.extend(self.aliases.keys().cloned());
        names
    }

    fn arities(&self, name: &str) -> Option<Vec<usize>> {
        let registered = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        TypeCatalog::arities(self.registry, registered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RegistryRepo {
        RegistryRepo::new(Arc::new(TypeRegistry::standard()))
    }

    #[test]
    fn test_make_keeps_owner_and_source() {
        let owner: Urn = "urn:facebook:1".parse().unwrap();
        let spec = repo()
            .make(&owner, &Spec::simple("java.lang.Integer ( 123 )"))
            .unwrap();
        assert_eq!(spec.owner(), &owner);
        assert_eq!(spec.source(), "java.lang.Integer ( 123 )");
        assert_eq!(spec.as_text(), "java.lang.Integer(123)");
        assert_eq!(spec.to_string(), spec.as_text());
    }

    #[test]
    fn test_make_surfaces_parse_errors() {
        let err = repo()
            .make(&Urn::anonymous(), &Spec::simple("java.lang.Integer(1"))
            .unwrap_err();
        assert!(matches!(err, SpecError::Parse(_)));
    }

    #[test]
    fn test_configured_depth_limit() {
        let config = RepoConfig {
            max_depth: 1,
            ..RepoConfig::default()
        };
        let repo = RegistryRepo::with_config(Arc::new(TypeRegistry::standard()), config);
        assert!(repo.make(&Urn::anonymous(), &Spec::simple("[1]")).is_ok());
        assert!(repo.make(&Urn::anonymous(), &Spec::simple("[[1]]")).is_err());
    }

    #[test]
    fn test_check_respects_aliases() {
        let mut config = RepoConfig::default();
        config
            .aliases
            .insert("Long".to_string(), "java.lang.Long".to_string());
        let repo = RegistryRepo::with_config(Arc::new(TypeRegistry::standard()), config);
        let spec = repo
            .make(&Urn::anonymous(), &Spec::simple("[Long(1), Short(2)]"))
            .unwrap();

        let result = spec.check();
        assert_eq!(result.stats.construct_count, 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].message, "unknown type 'Short'");

        assert!(matches!(
            spec.instantiate(&BuildContext::default()),
            Err(BuildError::NotFound { ref type_name }) if type_name == "Short"
        ));

        let wrong_arity = repo
            .make(&Urn::anonymous(), &Spec::simple("Long(1, 2)"))
            .unwrap()
            .check();
        assert!(wrong_arity.is_valid());
        assert_eq!(
            wrong_arity.diagnostics[0].code,
            spec_core::DiagnosticCode::ArityMismatch
        );
    }

    #[test]
    fn test_instantiate_is_repeatable() {
        let spec = repo()
            .make(&Urn::anonymous(), &Spec::simple("[java.lang.Long(1), 'x']"))
            .unwrap();
        let ctx = BuildContext::default();
        assert_eq!(spec.instantiate(&ctx).unwrap(), spec.instantiate(&ctx).unwrap());
    }
}
