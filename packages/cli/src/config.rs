use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "pagedraft.config.json";

/// Pagedraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Where the dirty-page store and session ledger live
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Root of the generated site; page paths are relative to it
    #[serde(default = "default_baseline_dir")]
    pub baseline_dir: String,

    /// Where change requests are written
    #[serde(default = "default_outbox_dir")]
    pub outbox_dir: String,

    /// Default tracing filter, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_dir() -> String {
    ".pagedraft".to_string()
}

fn default_baseline_dir() -> String {
    ".".to_string()
}

fn default_outbox_dir() -> String {
    ".pagedraft/outbox".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn store_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.store_dir)
    }

    pub fn baseline_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.baseline_dir)
    }

    pub fn outbox_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.outbox_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            baseline_dir: default_baseline_dir(),
            outbox_dir: default_outbox_dir(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "storeDir": "state",
            "baselineDir": "public",
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.store_dir, "state");
        assert_eq!(config.baseline_dir, "public");
        assert_eq!(config.outbox_dir, ".pagedraft/outbox");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.store_dir, ".pagedraft");
        assert_eq!(config.baseline_dir, ".");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "baselineDir": "site" }"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.baseline_dir(dir.path()), dir.path().join("site"));
        assert_eq!(config.store_dir, ".pagedraft");
    }
}
