//! Tracer configuration.
//!
//! Loaded from TOML; every field is optional:
//!
//! ```toml
//! naming = "per-session"
//! placeholder_label = "NoneType"
//! title = "Car demo"
//! ```

use crate::domain::naming::DEFAULT_PLACEHOLDER_LABEL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Lifetime of object names and of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingPolicy {
    /// Names and events persist across start/stop cycles of one session
    #[default]
    PerController,
    /// Names and events are reset at every start
    PerSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TracerConfig {
    pub naming: NamingPolicy,
    /// Class label rendered for receiver-less contexts
    pub placeholder_label: String,
    /// Optional `Title:` header of the dumped diagram
    pub title: Option<String>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.to_string(),
            title: None,
        }
    }
}

impl TracerConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let config: TracerConfig = toml::from_str(src).context("Invalid tracer config")?;
        if config.placeholder_label.trim().is_empty() {
            anyhow::bail!("placeholder_label must not be empty");
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let src = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&src)
            .with_context(|| format!("Failed to load config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = TracerConfig::from_toml_str("").unwrap();
        assert_eq!(config, TracerConfig::default());
        assert_eq!(config.placeholder_label, "NoneType");
        assert_eq!(config.naming, NamingPolicy::PerController);
    }

    #[test]
    fn test_full_config() {
        let config = TracerConfig::from_toml_str(
            r#"
naming = "per-session"
placeholder_label = "Module"
title = "Garage"
"#,
        )
        .unwrap();
        assert_eq!(config.naming, NamingPolicy::PerSession);
        assert_eq!(config.placeholder_label, "Module");
        assert_eq!(config.title.as_deref(), Some("Garage"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(TracerConfig::from_toml_str("sampling = 0.5").is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(TracerConfig::from_toml_str("naming = \"global\"").is_err());
    }

    #[test]
    fn test_blank_placeholder_rejected() {
        assert!(TracerConfig::from_toml_str("placeholder_label = \"  \"").is_err());
    }
}
