use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local configuration directory.
pub const CONFIG_DIR: &str = ".agentkb";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "AGENTKB_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Platform base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid requests_per_second: {0}. Must be at least 1")]
    InvalidRateLimit(u32),

    #[error("Invalid page_size: {0}. Must be between 1 and 1000")]
    InvalidPageSize(u32),

    #[error("Naming brand cannot be empty")]
    EmptyBrand,

    #[error("Invalid {field}: {value}. Must be between 0.0 and 1.0")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("Invalid {0}: must be at least 1")]
    ZeroSetting(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Demo cache_file cannot be empty")]
    EmptyCacheFile,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .agentkb/config.yaml (project config)
    /// 3. .agentkb/local.yaml (local overrides, optional)
    /// 4. Environment variables (AGENTKB_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Load configuration rooted at a specific config directory
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Self::figment(dir.as_ref())
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment(dir: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let platform = &config.platform;
        if platform.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if platform.requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(platform.requests_per_second));
        }
        if platform.page_size == 0 || platform.page_size > 1000 {
            return Err(ConfigError::InvalidPageSize(platform.page_size));
        }

        if config.naming.brand.trim().is_empty() {
            return Err(ConfigError::EmptyBrand);
        }

        let defaults = &config.agent_defaults;
        for (field, value) in [
            ("temperature", defaults.temperature),
            ("top_p", defaults.top_p),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        if defaults.k == 0 {
            return Err(ConfigError::ZeroSetting("k"));
        }
        if defaults.max_tokens == 0 {
            return Err(ConfigError::ZeroSetting("max_tokens"));
        }

        if config.demo.cache_file.trim().is_empty() {
            return Err(ConfigError::EmptyCacheFile);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::config::{AgentDefaultsConfig, LoggingConfig};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.naming.brand, "Support Agent");
        assert_eq!(config.platform.page_size, 100);
        assert_eq!(config.demo.cache_file, ".agentkb/demo-agent.json");
        assert!(config.platform.api_token.is_none());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
platform:
  base_url: https://platform.internal/v2/gen-ai
  region: nyc3
  page_size: 50
naming:
  brand: Acme Help
agent_defaults:
  k: 4
  temperature: 0.5
demo:
  domain: acme.com
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.platform.base_url, "https://platform.internal/v2/gen-ai");
        assert_eq!(config.platform.region, "nyc3");
        assert_eq!(config.platform.page_size, 50);
        assert_eq!(config.platform.requests_per_second, 10);
        assert_eq!(config.naming.brand, "Acme Help");
        assert_eq!(config.agent_defaults.k, 4);
        assert_eq!(config.agent_defaults.max_tokens, 1024);
        assert_eq!(config.demo.domain.as_deref(), Some("acme.com"));
        assert_eq!(config.logging.level, "debug");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_out_of_range_temperature() {
        let config = Config {
            agent_defaults: AgentDefaultsConfig {
                temperature: 1.5,
                ..AgentDefaultsConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::OutOfRange { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_validate_empty_brand() {
        let mut config = Config::default();
        config.naming.brand = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyBrand)
        ));
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let config = Config {
            logging: LoggingConfig {
                format: "xml".to_string(),
                ..LoggingConfig::default()
            },
            ..Config::default()
        };
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));
    }

    #[test]
    fn test_load_from_dir_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "naming:\n  brand: File Brand\ndemo:\n  domain: file.example\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("local.yaml"), "platform:\n  region: sfo3\n").unwrap();

        temp_env::with_vars(
            [
                ("AGENTKB_DEMO__DOMAIN", Some("env.example")),
                ("AGENTKB_PLATFORM__API_TOKEN", Some("tok")),
            ],
            || {
                let config = ConfigLoader::load_from_dir(dir.path()).unwrap();
                assert_eq!(config.naming.brand, "File Brand");
                assert_eq!(config.platform.region, "sfo3");
                assert_eq!(config.demo.domain.as_deref(), Some("env.example"));
                assert_eq!(config.platform.api_token.as_deref(), Some("tok"));
            },
        );
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::load_from_dir(dir.path().join("nope")).unwrap();
        assert_eq!(config.platform.region, "tor1");
    }
}
