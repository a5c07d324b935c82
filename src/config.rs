use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AthError, AthResult};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub yahoo_api: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub adjust_prices: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            yahoo_api: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
            max_retries: 0,
            adjust_prices: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> AthResult<Self> {
        confy::load_path(path).map_err(Into::into)
    }

    pub fn store(&self, path: &Path) -> AthResult<()> {
        confy::store_path(path, self).map_err(Into::into)
    }

    pub fn set(&mut self, key: &str, value: &str) -> AthResult<()> {
        match key.to_lowercase().as_str() {
            "yahoo_api" => {
                url::Url::parse(value)?;
                self.yahoo_api = value.trim_end_matches('/').to_string();
            }
            "timeout_secs" => self.timeout_secs = parse_value(key, value)?,
            "max_retries" => self.max_retries = parse_value(key, value)?,
            "adjust_prices" => self.adjust_prices = parse_value(key, value)?,
            _ => {
                return Err(AthError::Invalid {
                    code: "UNKNOWN_CONFIG_KEY",
                    message: format!("Unknown config key '{key}'"),
                });
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("yahoo_api", self.yahoo_api.to_string()),
            ("timeout_secs", self.timeout_secs.to_string()),
            ("max_retries", self.max_retries.to_string()),
            ("adjust_prices", self.adjust_prices.to_string()),
        ]
    }

    /// Current value of a key, formatted as `entries` shows it
    pub fn get(&self, key: &str) -> Option<String> {
        let key = key.to_lowercase();
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> AthResult<T> {
    value.trim().parse::<T>().map_err(|_| AthError::Invalid {
        code: "INVALID_CONFIG_VALUE",
        message: format!("Invalid value '{value}' for config key '{key}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_config() {
        let mut config = Config::default();
        config.set("TIMEOUT_SECS", "12").unwrap();
        config.set("adjust_prices", "false").unwrap();
        config.set("yahoo_api", "http://127.0.0.1:8000/").unwrap();

        assert_eq!(config.timeout_secs, 12);
        assert!(!config.adjust_prices);
        assert_eq!(config.yahoo_api, "http://127.0.0.1:8000");
        assert_eq!(config.get("Yahoo_API").as_deref(), Some("http://127.0.0.1:8000"));
        assert_eq!(config.get("timeout_secs").as_deref(), Some("12"));
        assert_eq!(config.get("no_such_key"), None);
    }

    #[test]
    fn test_set_config_invalid() {
        let mut config = Config::default();

        assert!(config.set("max_retries", "many").is_err());
        assert!(config.set("no_such_key", "1").is_err());
        assert!(config.set("yahoo_api", "not a url").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_store_and_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.max_retries = 2;
        config.store(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
