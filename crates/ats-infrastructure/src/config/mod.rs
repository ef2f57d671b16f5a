//! Configuration loading
//!
//! Configuration sources are merged in order (later overrides earlier):
//! defaults, a TOML file, then environment variables prefixed with `ATS__`
//! (double underscore separates nested keys, e.g. `ATS__DATABASE__URL`).
//! Uses figment for the merge.

use std::env;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use ats_domain::{Error, Result};
use ats_providers::{BackendKind, DatabaseConfig};

use crate::constants::{CONFIG_ENV_PREFIX, DEFAULT_CONFIG_FILENAME};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Persistence backend selection and connection details
    pub database: DatabaseConfig,
    /// RSA key pair locations
    pub keys: KeysConfig,
    /// Sender identity for recovery-code dispatch
    pub mail: MailConfig,
    /// Logging setup
    pub logging: LoggingConfig,
}

/// PEM key pair paths for token signing and verification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeysConfig {
    /// Path to the private key PEM file
    pub private_key_path: PathBuf,
    /// Path to the public key PEM file
    pub public_key_path: PathBuf,
}

/// Sender identity handed to the mail dispatch collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Address recovery codes are sent from
    pub sender: String,
    /// Credential for the sending account
    pub sender_password: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Emit JSON-formatted output
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json_format: false,
        }
    }
}

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
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        let file = self
            .config_path
            .clone()
            .or_else(Self::find_default_config_path);
        if let Some(path) = file {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}__", self.env_prefix)).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| Error::config(format!("failed to extract configuration: {e}")))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Default config file location: the working directory
    fn find_default_config_path() -> Option<PathBuf> {
        env::current_dir()
            .ok()
            .map(|dir| dir.join(DEFAULT_CONFIG_FILENAME))
    }

    fn validate(config: &AppConfig) -> Result<()> {
        if config.database.backend != BackendKind::Memory && config.database.url.is_empty() {
            return Err(Error::config(format!(
                "database.url is required for the {} backend",
                config.database.backend
            )));
        }
        if config.keys.private_key_path.as_os_str().is_empty()
            || config.keys.public_key_path.as_os_str().is_empty()
        {
            return Err(Error::config(
                "keys.private_key_path and keys.public_key_path are required",
            ));
        }
        crate::logging::parse_log_level(&config.logging.level)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
