//! Application configuration

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fg_catalog::{CatalogConfig, QuerySpec};
use fg_locator::LocatorConfig;
use fg_pool::{GachaConfig, PoolConfig};

/// Default location of the boundary map
pub const DEFAULT_BOUNDARY_FILE: &str = "lastPage.json";

/// Everything the binary can be configured with, loaded from one JSON file.
///
/// Missing sections fall back to production defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Boundary map written by `locate` and read by `pull`
    pub boundary_file: PathBuf,
    pub catalog: CatalogConfig,
    /// Media filter and order shared by the locator and the pool builder
    pub query: QuerySpec,
    pub locator: LocatorConfig,
    pub pool: PoolConfig,
    /// Roll tables; the production tables when absent
    pub gacha: Option<GachaConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            boundary_file: PathBuf::from(DEFAULT_BOUNDARY_FILE),
            catalog: CatalogConfig::default(),
            query: QuerySpec::default(),
            locator: LocatorConfig::default(),
            pool: PoolConfig::default(),
            gacha: None,
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Configured roll tables, or the production ones
    pub fn gacha(&self) -> Result<GachaConfig> {
        match &self.gacha {
            Some(gacha) => Ok(gacha.clone()),
            None => GachaConfig::production().context("Production weight tables are invalid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = AppConfig::from_json("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.boundary_file, PathBuf::from("lastPage.json"));
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_json(
            r#"{ "boundary_file": "/var/lib/fable/lastPage.json", "pool": { "min_pool_size": 5 } }"#,
        )
        .unwrap();

        assert_eq!(config.boundary_file, PathBuf::from("/var/lib/fable/lastPage.json"));
        assert_eq!(config.pool.min_pool_size, 5);
        assert_eq!(config.pool.max_attempts, 3);
        assert_eq!(config.gacha().unwrap().brackets.len(), 5);
    }

    #[test]
    fn test_bad_weight_table_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "gacha": {
                "roles": [ { "weight": 10, "value": "MAIN" }, { "weight": 10, "value": "SUPPORTING" } ],
                "brackets": [ { "weight": 100, "value": { "lower": 0, "upper": null } } ]
            } }"#,
        )
        .unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("sums to 20"));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig {
            query: QuerySpec::by_popularity(),
            ..AppConfig::default()
        };
        let restored = AppConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = AppConfig::load_from("/nonexistent/fable.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fable.json"));
    }
}
