//! Configuration management.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::client::HAL_SEARCH_ENDPOINT;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HAL search endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Row cap per query
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Author idHAL used when the CLI is given none
    #[serde(default)]
    pub default_author: Option<String>,

    /// HAL ids skipped at the rendering boundary
    #[serde(default)]
    pub excluded_ids: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            rows: default_rows(),
            timeout_secs: default_timeout_secs(),
            default_author: None,
            excluded_ids: HashSet::new(),
        }
    }
}

fn default_endpoint() -> String {
    HAL_SEARCH_ENDPOINT.to_string()
}

fn default_rows() -> usize {
    crate::query::DEFAULT_ROWS
}

fn default_timeout_secs() -> u64 {
    30
}

/// Load configuration from a file, with HALPUB_* environment overrides
pub fn load_config(path: &PathBuf) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("HALPUB"))
        .build()?;

    settings.try_deserialize()
}

/// Look for a config file in the usual places
pub fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from("halpub.toml")];
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home).join(".config/halpub/config.toml"));
    }
    candidates.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint, HAL_SEARCH_ENDPOINT);
        assert_eq!(config.rows, 10_000);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.excluded_ids.is_empty());
    }

    #[test]
    fn test_partial_toml_deserializes_with_defaults() {
        let config: Config =
            toml::from_str("excluded_ids = [\"hal-00000001\"]\nrows = 500").unwrap();
        assert_eq!(config.rows, 500);
        assert!(config.excluded_ids.contains("hal-00000001"));
        assert_eq!(config.endpoint, HAL_SEARCH_ENDPOINT);
    }
}
