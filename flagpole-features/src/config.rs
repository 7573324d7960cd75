//! Registry configuration.
//!
//! Values come from defaults, a TOML file, or the environment:
//!
//! - `FLAGPOLE_CACHE_ENABLED=1|true|0|false` - load stored definitions at startup

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable controlling [`RegistryConfig::cache_enabled`].
pub const ENV_CACHE_ENABLED: &str = "FLAGPOLE_CACHE_ENABLED";

/// Construction-time registry settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Load stored definitions through the configured loader while building
    pub cache_enabled: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

impl RegistryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Defaults overridden by environment variables.
    ///
    /// Unrecognized values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(ENV_CACHE_ENABLED) {
            config.apply_cache_enabled(&value);
        }
        config
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn apply_cache_enabled(&mut self, value: &str) {
        match parse_switch(value) {
            Some(enabled) => self.cache_enabled = enabled,
            None => tracing::warn!(
                "Ignoring {}={:?}: expected 1, 0, true or false",
                ENV_CACHE_ENABLED,
                value
            ),
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_cache() {
        assert!(RegistryConfig::default().cache_enabled);
        assert!(!RegistryConfig::new().with_cache_enabled(false).cache_enabled);
    }

    #[test]
    fn test_parse_switch() {
        assert_eq!(parse_switch("1"), Some(true));
        assert_eq!(parse_switch(" TRUE "), Some(true));
        assert_eq!(parse_switch("off"), Some(false));
        assert_eq!(parse_switch("0"), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }

    #[test]
    fn test_unrecognized_value_keeps_current() {
        let mut config = RegistryConfig::default().with_cache_enabled(false);
        config.apply_cache_enabled("sometimes");
        assert!(!config.cache_enabled);

        config.apply_cache_enabled("yes");
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_from_toml_str() {
        let config = RegistryConfig::from_toml_str("cache_enabled = false").unwrap();
        assert!(!config.cache_enabled);

        let config = RegistryConfig::from_toml_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());

        assert!(RegistryConfig::from_toml_str("cache_enabled = \"nope\"").is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = RegistryConfig::from_file("/no/such/flagpole.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
