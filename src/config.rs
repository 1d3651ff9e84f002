//! Resolver configuration, loadable from TOML.
//!
//! ```
//! use interface_core::config::{RedeclarePolicy, ResolverConfig};
//!
//! let config = ResolverConfig::from_toml_str(r#"
//!     check_subtypes = false
//!     redeclare = "keep"
//! "#).unwrap();
//!
//! assert!(!config.check_subtypes);
//! assert_eq!(config.redeclare, RedeclarePolicy::Keep);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// What declaring an already known interface does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeclarePolicy {
    /// Start over with no implementations.
    #[default]
    Reset,
    /// Keep the implementations declared so far.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Reject implementations whose handle reports it does not implement the
    /// interface. Handles that cannot tell are always accepted.
    #[serde(default = "default_check_subtypes")]
    pub check_subtypes: bool,

    #[serde(default)]
    pub redeclare: RedeclarePolicy,
}

fn default_check_subtypes() -> bool {
    true
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            check_subtypes: default_check_subtypes(),
            redeclare: RedeclarePolicy::default(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_check_subtypes(mut self, check: bool) -> Self {
        self.check_subtypes = check;
        self
    }

    pub fn with_redeclare(mut self, policy: RedeclarePolicy) -> Self {
        self.redeclare = policy;
        self
    }
}
