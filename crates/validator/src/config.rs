//! Validator configuration

use serde::{Deserialize, Serialize};

/// Configuration for a [`Validator`](crate::Validator).
///
/// Every field has a default, so partial documents are accepted:
///
/// ```rust
/// use ruletag::ValidatorConfig;
///
/// let config = ValidatorConfig::from_json_str(r#"{ "parse_cache_capacity": 256 }"#).unwrap();
/// assert!(config.builtin_rules);
/// assert_eq!(config.parse_cache_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Register the built-in rules (`non-nil`, `non-zero`, `required`, `email`, `len(N)`).
    pub builtin_rules: bool,
    /// Maximum number of parsed rule texts to keep. `0` disables the cache.
    pub parse_cache_capacity: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            builtin_rules: true,
            parse_cache_capacity: 0,
        }
    }
}

impl ValidatorConfig {
    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True if parsed rule texts are cached.
    pub fn caches_parses(&self) -> bool {
        self.parse_cache_capacity > 0
    }
}
