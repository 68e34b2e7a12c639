//! Configuration loading and management
//!
//! Values come from built-in defaults, overridden by a YAML (or JSON) file.
//! The file only needs the keys it changes: nested maps are merged into the
//! defaults key by key.

pub mod logging;

pub use logging::{LogFormat, LoggingConfig, bootstrap_subscriber, init_logging};

use crate::core::validation::DEFAULT_ILLEGAL_CHARS;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file read when none is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "/etc/restlos/config.yaml";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV: &str = "RESTLOS_CONFIG";

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("the object store declares no object type with a known key attribute")]
    EmptyCatalog,

    #[error("unable to initialise logging: {0}")]
    Logging(String),
}

/// Authentication provider selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Provider id: `dictionary` or `directory`
    pub provider: String,

    /// Provider specific parameters
    pub params: Value,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            provider: "dictionary".to_string(),
            params: json!({ "users": {} }),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Main configuration file of the monitoring core
    pub main_cfg: PathBuf,

    /// Monitoring core binary, run with `-v` to verify the configuration
    pub monitoring_bin: PathBuf,

    /// Run the monitoring binary through `sudo -n`
    pub use_sudo: bool,

    /// Directory new objects are written to
    pub output_dir: PathBuf,

    pub host: String,
    pub port: u16,

    /// Origins allowed to call the API from a browser, none by default
    pub cors_origins: Vec<String>,

    /// Characters forbidden in key attribute values
    pub illegal_object_name_chars: String,

    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            main_cfg: PathBuf::from("/etc/nagios/nagios.cfg"),
            monitoring_bin: PathBuf::from("/usr/sbin/nagios"),
            use_sudo: false,
            output_dir: PathBuf::from("/etc/nagios/objects/api"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            illegal_object_name_chars: DEFAULT_ILLEGAL_CHARS.to_string(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply overrides to the defaults
    pub fn from_overrides(overrides: Value) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(Self::default())?;
        deep_merge(&mut merged, overrides);
        Ok(serde_json::from_value(merged)?)
    }

    /// Parse YAML or JSON config text and apply it to the defaults
    pub fn from_yaml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let overrides: Value = serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_overrides(overrides)
    }

    /// Load configuration from a file
    ///
    /// A missing or unreadable file is not an error: the defaults are used
    /// and a warning is logged.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_yaml_str(&content, path),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "unable to read config file, using defaults"
                );
                Ok(Self::default())
            }
        }
    }
}

/// Merge `overlay` into `base`
///
/// Maps are merged key by key, any other overlay value replaces the base
/// value. A null overlay leaves the base untouched.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}
