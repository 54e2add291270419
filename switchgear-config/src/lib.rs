// Configuration management for the Switchgear feature-flag toolkit

pub mod env;
pub mod error;
pub mod loader;
pub mod service;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use service::{ConfigService, ConfigServiceBuilder};

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Main configuration manager
///
/// Holds a flat key/value store merged from files, environment variables
/// and programmatic overrides. Later loads overwrite earlier ones.
#[derive(Clone)]
pub struct ConfigManager {
    config: Arc<RwLock<HashMap<String, serde_json::Value>>>,
    env_prefix: Option<String>,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: None,
        }
    }

    /// Create with environment variable prefix
    pub fn with_prefix(prefix: String) -> Self {
        Self {
            config: Arc::new(RwLock::new(HashMap::new())),
            env_prefix: Some(prefix),
        }
    }

    /// Load configuration from environment variables
    pub fn load_env(&self) -> Result<()> {
        let loader = EnvLoader::new(self.env_prefix.clone());
        let env_vars = loader.load()?;

        let mut config = self.config.write().unwrap();
        for (key, value) in env_vars {
            config.insert(key, serde_json::Value::String(value));
        }

        Ok(())
    }

    /// Load configuration from a .env file
    pub fn load_dotenv(&self, path: Option<&str>) -> Result<()> {
        match path {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            }
            None => {
                // A missing default .env file is not an error
                dotenvy::dotenv().ok();
            }
        }
        self.load_env()
    }

    /// Load configuration from file
    pub fn load_file(&self, path: &str, format: FileFormat) -> Result<()> {
        let data = ConfigLoader::new(format).load_file(path)?;

        let mut config = self.config.write().unwrap();
        if let serde_json::Value::Object(map) = data {
            for (key, value) in map {
                config.insert(key, value);
            }
        }

        Ok(())
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)
            .map_err(|e| ConfigError::SerializationError(e.to_string()))?;

        let mut config = self.config.write().unwrap();
        config.insert(key.to_string(), json_value);

        Ok(())
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let config = self.config.read().unwrap();

        let value = config
            .get(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))?;

        serde_json::from_value(value.clone())
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Get a string value
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    /// Get a boolean value
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    /// Check if a key exists
    pub fn has(&self, key: &str) -> bool {
        let config = self.config.read().unwrap();
        config.contains_key(key)
    }

    /// Get all configuration keys
    pub fn keys(&self) -> Vec<String> {
        let config = self.config.read().unwrap();
        config.keys().cloned().collect()
    }

    /// Merge configuration from another manager
    pub fn merge(&self, other: &ConfigManager) -> Result<()> {
        let other_config = other.config.read().unwrap();
        let mut config = self.config.write().unwrap();

        for (key, value) in other_config.iter() {
            config.insert(key.clone(), value.clone());
        }

        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[test]
    fn test_set_and_get() {
        let manager = ConfigManager::new();
        manager.set("greeting", "hello").unwrap();

        let value: String = manager.get("greeting").unwrap();
        assert_eq!(value, "hello");
    }

    #[test]
    fn test_get_or_default() {
        let manager = ConfigManager::new();

        let value: String = manager.get_or("missing_key", "fallback".to_string());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_missing_key_is_error() {
        let manager = ConfigManager::new();
        let err = manager.get::<String>("missing").unwrap_err();

        assert!(matches!(err, ConfigError::KeyNotFound(_)));
    }

    #[test]
    fn test_has_and_keys() {
        let manager = ConfigManager::new();
        manager.set("present", true).unwrap();

        assert!(manager.has("present"));
        assert!(!manager.has("absent"));
        assert_eq!(manager.keys(), vec!["present".to_string()]);
    }

    #[test]
    fn test_typed_section_deserialization() {
        #[derive(Deserialize)]
        struct Declaration {
            name: String,
            enabled: Option<bool>,
        }

        let manager = ConfigManager::new();
        manager
            .set(
                "features",
                serde_json::json!([
                    {"name": "new-ui", "enabled": true},
                    {"name": "beta-search"},
                ]),
            )
            .unwrap();

        let declarations: Vec<Declaration> = manager.get("features").unwrap();
        assert_eq!(declarations.len(), 2);
        assert_eq!(declarations[0].name, "new-ui");
        assert_eq!(declarations[0].enabled, Some(true));
        assert_eq!(declarations[1].enabled, None);
    }

    #[test]
    fn test_load_file_merges_keys() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "answer = 42").unwrap();

        let manager = ConfigManager::new();
        manager
            .load_file(file.path().to_str().unwrap(), FileFormat::Toml)
            .unwrap();

        let answer: i64 = manager.get("answer").unwrap();
        assert_eq!(answer, 42);
    }

    #[test]
    fn test_merge() {
        let base = ConfigManager::new();
        base.set("kept", 1).unwrap();
        base.set("overwritten", 1).unwrap();

        let overlay = ConfigManager::new();
        overlay.set("overwritten", 2).unwrap();

        base.merge(&overlay).unwrap();
        assert_eq!(base.get::<i64>("kept").unwrap(), 1);
        assert_eq!(base.get::<i64>("overwritten").unwrap(), 2);
    }
}
