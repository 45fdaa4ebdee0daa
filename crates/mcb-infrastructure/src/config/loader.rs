//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.
//!
//! Uses Figment for configuration management.

use crate::config::AppConfig;
use crate::constants::*;
use crate::error_ext::ErrorContext;
use crate::logging::log_config_loaded;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mcb_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `MCB_LIMITS_INDEXING_CONCURRENCY`)
    pub fn load(&self) -> Result<AppConfig> {
        // Start with default configuration
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        // Add configuration file if specified
        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        // Add environment variables
        // Uses underscore as separator for nested keys (e.g., MCB_LIMITS_CHUNK_MAX_CHARS)
        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("_"));

        // Extract and deserialize configuration
        let app_config: AppConfig = figment
            .extract()
            .context("Failed to extract configuration")?;

        // Validate configuration
        self.validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Reload configuration (useful for hot-reloading)
    pub fn reload(&self) -> Result<AppConfig> {
        self.load()
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find default configuration file paths to try, relative to the
    /// current working directory.
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            current_dir.join(DEFAULT_CONFIG_FILENAME),
            current_dir
                .join(DEFAULT_CONFIG_DIR)
                .join(DEFAULT_CONFIG_FILENAME),
        ];

        candidates.into_iter().find(|path| path.exists())
    }

    /// Validate configuration values
    fn validate_config(&self, config: &AppConfig) -> Result<()> {
        validate_app_config(config)
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_providers_config(config)?;
    validate_limits_config(config)?;
    Ok(())
}

fn validate_providers_config(config: &AppConfig) -> Result<()> {
    if config.providers.embedding.provider.is_empty() {
        return Err(Error::Configuration {
            message: "Embedding provider name cannot be empty".to_string(),
            source: None,
        });
    }
    if config.providers.vector_store.provider.is_empty() {
        return Err(Error::Configuration {
            message: "Vector store provider name cannot be empty".to_string(),
            source: None,
        });
    }
    if config.providers.vector_store.collection.is_empty() {
        return Err(Error::Configuration {
            message: "Vector store collection name cannot be empty".to_string(),
            source: None,
        });
    }
    Ok(())
}

fn validate_limits_config(config: &AppConfig) -> Result<()> {
    if config.limits.indexing_concurrency == 0 {
        return Err(Error::Configuration {
            message: "Indexing concurrency cannot be 0".to_string(),
            source: None,
        });
    }
    if config.limits.evaluator_concurrency == 0 {
        return Err(Error::Configuration {
            message: "Evaluator concurrency cannot be 0".to_string(),
            source: None,
        });
    }
    if config.limits.chunk_max_chars == 0 {
        return Err(Error::Configuration {
            message: "Chunk max chars cannot be 0".to_string(),
            source: None,
        });
    }
    Ok(())
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let loader = ConfigLoader::new();
        let config = AppConfig::default();
        assert!(loader.validate_config(&config).is_ok());
    }

    #[test]
    fn zero_indexing_concurrency_is_rejected() {
        let mut config = AppConfig::default();
        config.limits.indexing_concurrency = 0;
        assert!(validate_app_config(&config).is_err());
    }

    #[test]
    fn empty_embedding_provider_is_rejected() {
        let mut config = AppConfig::default();
        config.providers.embedding.provider = String::new();
        assert!(validate_app_config(&config).is_err());
    }
}
