use crate::constants::{DEFAULT_BASE_URL, DEFAULT_CASE_ID, DEFAULT_TIMEOUT_SECS};
use crate::errors::{DocketError, DocketResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, path::PathBuf, sync::RwLock};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub case_id: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            case_id: DEFAULT_CASE_ID.to_string(),
            log_level: "info".to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Loads the config file (creating a default one on first run), applies
/// environment overrides and publishes the result into the global slot.
pub fn initialize_config() -> DocketResult<()> {
    let config_path = get_config_path()?;

    let mut config = if config_path.exists() {
        read_config_file(&config_path)?
    } else {
        let config = Config::default();
        write_config_file(&config_path, &config)?;
        config
    };

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    *CONFIG.write().unwrap() = config;
    Ok(())
}

fn get_config_path() -> DocketResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| DocketError::config_error("could not determine home directory"))?;

    Ok(home_dir.join(".config").join("docket").join("config.json"))
}

fn read_config_file(path: &Path) -> DocketResult<Config> {
    let config_str = fs::read_to_string(path)
        .map_err(|e| DocketError::config_error(format!("failed to read config file: {}", e)))?;

    serde_json::from_str(&config_str)
        .map_err(|e| DocketError::config_error(format!("failed to parse config: {}", e)))
}

fn write_config_file(path: &Path, config: &Config) -> DocketResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DocketError::config_error(format!("failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(config)
        .map_err(|e| DocketError::config_error(format!("failed to serialize config: {}", e)))?;

    fs::write(path, config_str)
        .map_err(|e| DocketError::config_error(format!("failed to write config file: {}", e)))
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(url) = env::var("DOCKET_BASE_URL") {
        config.base_url = url;
    }
    if let Ok(key) = env::var("DOCKET_API_KEY") {
        config.api_key = key;
    }
    if let Ok(case) = env::var("DOCKET_CASE_ID") {
        config.case_id = case;
    }
    if let Ok(level) = env::var("DOCKET_LOG_LEVEL") {
        config.log_level = level;
    }
}

fn validate_config(config: &Config) -> DocketResult<()> {
    if !config.base_url.starts_with("http") {
        return Err(DocketError::config_error(
            "base_url must be an http(s) URL",
        ));
    }

    if config.case_id.trim().is_empty() {
        return Err(DocketError::config_error("case_id is required"));
    }

    if config.log_level.trim().is_empty() {
        return Err(DocketError::config_error("log_level is required"));
    }

    if config.request_timeout_secs == 0 {
        return Err(DocketError::config_error(
            "request_timeout_secs must be greater than 0",
        ));
    }

    Ok(())
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}

pub fn update_config(updated_config: Config) -> DocketResult<()> {
    validate_config(&updated_config)?;

    let config_path = get_config_path()?;
    write_config_file(&config_path, &updated_config)?;

    *CONFIG.write().unwrap() = updated_config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_config_valid() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_config_rejects_empty_case_id() {
        let mut config = Config::default();
        config.case_id = "   ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_rejects_bad_base_url() {
        let mut config = Config::default();
        config.base_url = "ftp://evidence.example.com".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_rejects_zero_timeout() {
        let mut config = Config::default();
        config.request_timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.base_url = "https://backend.example.com".to_string();
        config.case_id = "case-4217".to_string();
        config.request_timeout_secs = 5;

        write_config_file(&path, &config).unwrap();
        let loaded = read_config_file(&path).unwrap();

        assert_eq!(loaded.base_url, "https://backend.example.com");
        assert_eq!(loaded.case_id, "case-4217");
        assert_eq!(loaded.request_timeout_secs, 5);
    }
}
