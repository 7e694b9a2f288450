//! Configuration Loader
//!
//! Layered loading of [`EngineConfig`] through the `config` crate.

use super::error::{ConfigResult, ConfigurationError};
use super::EngineConfig;
use crate::constants::defaults::{CONFIG_ENV_PREFIX, CONFIG_FILE, ENVIRONMENT};
use config::{Config, Environment, File, FileFormat};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: EngineConfig,
    environment: String,
    config_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection.
    ///
    /// The default file is optional; defaults apply when it is absent.
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let path = PathBuf::from(CONFIG_FILE);
        let file = path.exists().then_some(path);
        Self::build(file, Some(CONFIG_ENV_PREFIX))
    }

    /// Load configuration from a specific TOML file, which must exist
    pub fn load_from_file(path: &Path) -> ConfigResult<Arc<ConfigManager>> {
        if !path.is_file() {
            return Err(ConfigurationError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::build(Some(path.to_path_buf()), Some(CONFIG_ENV_PREFIX))
    }

    /// Load configuration from a file without consulting environment
    /// variables; useful for tests that must not see the process environment
    pub fn load_from_file_isolated(path: &Path) -> ConfigResult<Arc<ConfigManager>> {
        if !path.is_file() {
            return Err(ConfigurationError::ConfigFileNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::build(Some(path.to_path_buf()), None)
    }

    fn build(file: Option<PathBuf>, env_prefix: Option<&str>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        let mut builder = Config::builder();

        if let Some(path) = &file {
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path.clone()).format(FileFormat::Toml));
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let source_name = file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "defaults".to_string());

        let config: EngineConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ConfigurationError::load_failed(source_name, e))?;

        config.validate()?;

        debug!(
            environment = %environment,
            config = ?config,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment,
            config_file: file,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// The file the configuration was read from, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    fn detect_environment() -> String {
        env::var("INTERVIEW_CHAIN_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| ENVIRONMENT.to_string())
    }
}
