//! Core configuration trait for Stellaris configuration types

use serde::de::DeserializeOwned;
use std::path::Path;

use crate::errors::{Result, StellarisError};

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "STELLARIS_";

/// Core trait for Stellaris configuration types
///
/// Configuration is resolved in three layers: defaults, an optional file
/// (TOML or JSON, chosen by extension), then `STELLARIS_*` environment
/// overrides. The result is validated before use.
pub trait StellarisConfig: Clone + Default + DeserializeOwned + Send + Sync + 'static {
    /// Parse configuration from a TOML document
    fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| StellarisError::config(format!("Invalid TOML: {e}")))
    }

    /// Parse configuration from a JSON document
    fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| StellarisError::config(format!("Invalid JSON: {e}")))
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StellarisError::config(format!("Failed to read {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            other => Err(StellarisError::config(format!(
                "Unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Apply overrides from `(key, value)` pairs. Keys carry the
    /// [`ENV_PREFIX`]; unrelated keys are ignored.
    fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>;

    /// Apply overrides from the process environment
    fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()>;

    /// Resolve defaults, optional file and environment, then validate
    fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }
}

/// Parse an override value as milliseconds
pub fn parse_millis(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| StellarisError::config(format!("{key} must be an integer, got {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_millis() {
        assert_eq!(parse_millis("STELLARIS_RETRACT_MS", " 900 ").unwrap(), 900);
        assert!(matches!(
            parse_millis("STELLARIS_RETRACT_MS", "soon"),
            Err(StellarisError::Config { .. })
        ));
    }
}
