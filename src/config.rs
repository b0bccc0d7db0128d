//! Configuration loader
//!
//! Loads `RepoConfig` from YAML. Resolution order:
//! 1. `SPEC_REPO_CONFIG` environment variable (explicit path, must exist)
//! 2. `spec-repo.yaml` in the working directory
//! 3. Built-in defaults

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use spec_core::{ParseOptions, DEFAULT_MAX_DEPTH};
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "SPEC_REPO_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "spec-repo.yaml";

/// Repo settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoConfig {
    /// Deepest allowed nesting of constructs, arrays and maps
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Short type name -> registered type name, applied before lookup
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            aliases: HashMap::new(),
        }
    }
}

impl RepoConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            bail!("max_depth must be at least 1");
        }
        for (alias, target) in &self.aliases {
            if alias.trim().is_empty() || target.trim().is_empty() {
                bail!("alias '{}' -> '{}' has an empty side", alias, target);
            }
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader for an explicit config file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Loader that always yields the defaults
    pub fn defaults() -> Self {
        Self { path: None }
    }

    /// Create loader from SPEC_REPO_CONFIG or the working-directory file
    pub fn from_env() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::new(path);
        }
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::new(DEFAULT_CONFIG_FILE);
        }
        Self::defaults()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Result<RepoConfig> {
        let Some(path) = &self.path else {
            info!("No spec-repo config file found, using defaults");
            return Ok(RepoConfig::default());
        };
        info!("Loading spec-repo configuration from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!(
            "Loaded config with max_depth {} and {} aliases",
            config.max_depth,
            config.aliases.len()
        );
        Ok(config)
    }

    /// Parse and validate YAML config text
    pub fn parse(yaml: &str) -> Result<RepoConfig> {
        let config: RepoConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }
}
