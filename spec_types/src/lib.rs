//! Spec Types - Level 1 Foundation Types
//!
//! Pure data structures shared by every other crate in the workspace:
//! - Source location tracking for error reporting
//! - Owner identity (`Urn`)
//! - Execution tokens (`Work`)
//!
//! ## Critical Rules
//!
//! 1. **NO WORKSPACE DEPENDENCIES** - this crate sits at the bottom of the graph
//! 2. **SERIALIZABLE** - all types support serde
//! 3. **OPAQUE TO THE CORE** - the parser and builder forward identities and
//!    work tokens, they never interpret them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SOURCE LOCATION AND POSITIONING
// ============================================================================

/// Source location in spec text for error reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, counted in characters)
    pub column: usize,
    /// Byte offset from start of input
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Locate a byte offset inside `source`.
    ///
    /// Offsets past the end clamp to the position just after the last character.
    pub fn locate(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for (i, c) in source.char_indices() {
            if i >= offset {
                break;
            }
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Self::new(line, column, offset.min(source.len()))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// OWNER IDENTITY
// ============================================================================

/// Errors raised while parsing a URN
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrnError {
    #[error("URN '{0}' must start with 'urn:'")]
    MissingPrefix(String),

    #[error("URN '{urn}' has an invalid namespace '{namespace}'")]
    InvalidNamespace { urn: String, namespace: String },

    #[error("URN '{0}' has an empty or malformed specific part")]
    InvalidSpecific(String),
}

/// Uniform resource name identifying the owner of a spec, e.g. `urn:facebook:1`
///
/// The namespace is normalised to lower case; the specific part is kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Urn {
    namespace: String,
    specific: String,
}

impl Urn {
    /// Build a URN from its parts, validating both
    pub fn new(namespace: impl Into<String>, specific: impl Into<String>) -> Result<Self, UrnError> {
        format!("urn:{}:{}", namespace.into(), specific.into()).parse()
    }

    /// The identity used when nobody in particular owns a spec
    pub fn anonymous() -> Self {
        Self {
            namespace: "anonymous".to_string(),
            specific: "0".to_string(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn specific(&self) -> &str {
        &self.specific
    }

    pub fn is_anonymous(&self) -> bool {
        self.namespace == "anonymous"
    }
}

fn valid_namespace(ns: &str) -> bool {
    let mut chars = ns.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    ns.len() <= 32
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

impl FromStr for Urn {
    type Err = UrnError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut parts = text.splitn(3, ':');
        let prefix = parts.next().unwrap_or_default();
        if !prefix.eq_ignore_ascii_case("urn") {
            return Err(UrnError::MissingPrefix(text.to_string()));
        }
        let namespace = parts.next().unwrap_or_default().to_ascii_lowercase();
        if !valid_namespace(&namespace) {
            return Err(UrnError::InvalidNamespace {
                urn: text.to_string(),
                namespace,
            });
        }
        let specific = parts.next().unwrap_or_default();
        if specific.is_empty() || specific.chars().any(char::is_whitespace) {
            return Err(UrnError::InvalidSpecific(text.to_string()));
        }
        Ok(Self {
            namespace,
            specific: specific.to_string(),
        })
    }
}

impl TryFrom<String> for Urn {
    type Error = UrnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Urn> for String {
    fn from(urn: Urn) -> Self {
        urn.to_string()
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "urn:{}:{}", self.namespace, self.specific)
    }
}

// ============================================================================
// EXECUTION TOKENS
// ============================================================================

/// A single scheduled run, handed to constructors that ask for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRun {
    /// Unique run identifier
    pub id: Uuid,
    /// Who owns the rule being executed
    pub owner: Urn,
    /// Name of the rule being executed
    pub rule: String,
    /// When the run was scheduled
    pub scheduled: DateTime<Utc>,
}

/// Execution context token threaded through instantiation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Work {
    /// Nothing is running (construction outside of a scheduled run)
    #[default]
    None,
    /// Construction on behalf of a scheduled run
    Run(WorkRun),
}

impl Work {
    /// Mint a fresh run scheduled now
    pub fn run(owner: Urn, rule: impl Into<String>) -> Self {
        Work::Run(WorkRun {
            id: Uuid::new_v4(),
            owner,
            rule: rule.into(),
            scheduled: Utc::now(),
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Work::None)
    }

    pub fn as_run(&self) -> Option<&WorkRun> {
        match self {
            Work::Run(run) => Some(run),
            Work::None => None,
        }
    }
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Work::None => write!(f, "none"),
            Work::Run(run) => write!(f, "{}/{}#{}", run.owner, run.rule, run.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_offsets() {
        let source = "line1\nline2\nline3";
        assert_eq!(SourceLocation::locate(source, 0), SourceLocation::new(1, 1, 0));
        assert_eq!(SourceLocation::locate(source, 5), SourceLocation::new(1, 6, 5));
        assert_eq!(SourceLocation::locate(source, 6), SourceLocation::new(2, 1, 6));
        assert_eq!(SourceLocation::locate(source, 12).to_string(), "3:1");
    }

    #[test]
    fn test_locate_clamps_past_end() {
        let loc = SourceLocation::locate("ab", 10);
        assert_eq!(loc.offset, 2);
        assert_eq!(loc.column, 3);
    }

    #[test]
    fn test_urn_parse_and_display() {
        let urn: Urn = "urn:facebook:1".parse().unwrap();
        assert_eq!(urn.namespace(), "facebook");
        assert_eq!(urn.specific(), "1");
        assert_eq!(urn.to_string(), "urn:facebook:1");
    }

    #[test]
    fn test_urn_normalises_namespace() {
        let urn: Urn = "URN:GitHub:alice:repo".parse().unwrap();
        assert_eq!(urn.to_string(), "urn:github:alice:repo");
    }

    #[test]
    fn test_urn_rejects_malformed() {
        assert!(matches!(
            "facebook:1".parse::<Urn>(),
            Err(UrnError::MissingPrefix(_))
        ));
        assert!(matches!(
            "urn:-bad:1".parse::<Urn>(),
            Err(UrnError::InvalidNamespace { .. })
        ));
        assert!(matches!(
            "urn:facebook:".parse::<Urn>(),
            Err(UrnError::InvalidSpecific(_))
        ));
        assert!("urn:facebook:a b".parse::<Urn>().is_err());
    }

    #[test]
    fn test_urn_serde_as_string() {
        let urn = Urn::new("facebook", "77").unwrap();
        let json = serde_json::to_string(&urn).unwrap();
        assert_eq!(json, "\"urn:facebook:77\"");
        let back: Urn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, urn);
    }

    #[test]
    fn test_anonymous() {
        assert!(Urn::anonymous().is_anonymous());
        assert_eq!(Urn::anonymous().to_string(), "urn:anonymous:0");
    }

    #[test]
    fn test_work_tokens() {
        assert!(Work::default().is_none());
        let owner = Urn::new("facebook", "2").unwrap();
        let work = Work::run(owner.clone(), "nightly");
        let run = work.as_run().unwrap();
        assert_eq!(run.owner, owner);
        assert_eq!(run.rule, "nightly");
        assert!(work.to_string().starts_with("urn:facebook:2/nightly#"));
    }
}
