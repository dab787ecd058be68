//! Script facade configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Prefix given to generated script names
pub const DEFAULT_NAME_PREFIX: &str = "func_";

/// How unique ids for anonymous scripts are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStrategy {
    /// Random UUIDv4, hyphens stripped
    #[default]
    Uuid,
    /// ULID, lexicographically sortable by creation time
    Ulid,
}

impl NameStrategy {
    /// Produce a fresh unique id
    #[must_use]
    pub fn generate(self) -> String {
        match self {
            Self::Uuid => uuid::Uuid::new_v4().simple().to_string(),
            Self::Ulid => ulid::Ulid::new().to_string(),
        }
    }
}

/// Script facade configuration
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes:
///
/// ```toml
/// name_prefix = "job_"
/// name_strategy = "ulid"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Prefix for generated names
    pub name_prefix: String,
    /// Id scheme for generated names
    pub name_strategy: NameStrategy,
}

impl ScriptConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or a
    /// key has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// With name prefix
    #[inline]
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// With name strategy
    #[inline]
    #[must_use]
    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = strategy;
        self
    }

    /// Generate a name for an anonymous script
    ///
    /// Never empty: the id part is always present even with an empty prefix.
    #[must_use]
    pub fn generate_name(&self) -> String {
        format!("{}{}", self.name_prefix, self.name_strategy.generate())
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            name_strategy: NameStrategy::Uuid,
        }
    }
}
