use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::bank::FallbackPolicy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub question_fallback: FallbackPolicy,
    #[serde(default = "default_auto_advance_ms")]
    pub auto_advance_ms: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_log_to_file")]
    pub log_to_file: bool,
}

fn default_storage_prefix() -> String {
    "logic-training".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logic-drill")
        .to_string_lossy()
        .to_string()
}
fn default_auto_advance_ms() -> u64 {
    700
}
fn default_theme() -> String {
    "dark".to_string()
}
fn default_log_to_file() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_prefix: default_storage_prefix(),
            data_dir: default_data_dir(),
            question_fallback: FallbackPolicy::default(),
            auto_advance_ms: default_auto_advance_ms(),
            theme: default_theme(),
            log_to_file: default_log_to_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Like `load`, but writes the defaults out on first run so there is a
    /// file to edit.
    pub fn load_or_init() -> Result<Self> {
        if Self::config_path().exists() {
            return Self::load();
        }
        let config = Config::default();
        config.save()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logic-drill")
            .join("config.toml")
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn session_key(&self, provider_id: &str) -> String {
        format!("{}:session:{provider_id}", self.storage_prefix)
    }

    pub fn settings_key(&self) -> String {
        format!("{}:settings", self.storage_prefix)
    }

    pub fn theme_key(&self) -> String {
        format!("{}:theme", self.storage_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.storage_prefix, "logic-training");
        assert_eq!(config.question_fallback, FallbackPolicy::Nearest);
        assert_eq!(config.auto_advance_ms, 700);
        assert!(config.data_dir.contains("logic-drill"));
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
question_fallback = "strict"
theme = "light"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.question_fallback, FallbackPolicy::Strict);
        assert_eq!(config.theme, "light");
        assert_eq!(config.auto_advance_ms, 700);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.data_dir, deserialized.data_dir);
        assert_eq!(config.question_fallback, deserialized.question_fallback);
    }

    #[test]
    fn test_storage_keys_are_namespaced() {
        let config = Config::default();
        assert_eq!(config.session_key("logic"), "logic-training:session:logic");
        assert_eq!(config.settings_key(), "logic-training:settings");
        assert_eq!(config.theme_key(), "logic-training:theme");
    }
}
