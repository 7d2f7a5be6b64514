//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Settings for one resolution run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Maximum number of named types being resolved at once
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Property injected into every union option, unless a union registers an override
    #[serde(default = "default_discriminator_property")]
    pub discriminator_property: String,

    /// Separator between the blocks of an enum description
    #[serde(default = "default_description_separator")]
    pub description_separator: String,
}

fn default_max_depth() -> usize {
    100
}

fn default_discriminator_property() -> String {
    "!type".to_string()
}

fn default_description_separator() -> String {
    "\n\n".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            discriminator_property: default_discriminator_property(),
            description_separator: default_description_separator(),
        }
    }
}

impl ResolverConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(bytes)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_discriminator_property(mut self, property: impl Into<String>) -> Self {
        self.discriminator_property = property.into();
        self
    }

    pub fn with_description_separator(mut self, separator: impl Into<String>) -> Self {
        self.description_separator = separator.into();
        self
    }
}
