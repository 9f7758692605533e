//! Mapper configuration.

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_AUTO_MATCH, DEFAULT_MATCH_NULLABLE};

/// Options applied to every mapping built by a [`Mapper`](crate::Mapper).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Seed each builder with the auto-matched rule set. When off, every field
    /// needs an explicit rule or an exclusion.
    pub auto_match: bool,
    /// Let auto-matching pair `T` with `Option<T>` (and back).
    pub match_nullable: bool,
}

impl MapperConfig {
    /// Parse a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_auto_match(mut self, enabled: bool) -> Self {
        self.auto_match = enabled;
        self
    }

    pub fn with_match_nullable(mut self, enabled: bool) -> Self {
        self.match_nullable = enabled;
        self
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            auto_match: DEFAULT_AUTO_MATCH,
            match_nullable: DEFAULT_MATCH_NULLABLE,
        }
    }
}
