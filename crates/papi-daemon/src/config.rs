//! Configuration for papi-daemon

use crate::error::{DaemonError, DaemonResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:6969".parse().unwrap(),
            enable_cors: true,
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Policy type keys (`name:version`) marked system-supplied and
    /// therefore undeletable
    #[serde(default)]
    pub preloaded_policy_types: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Add environment variables with PAPI_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("PAPI")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

/// Check that a configuration file path names an existing, normal, readable
/// file before the listener comes up
pub fn validate_config_file(path: &Path) -> DaemonResult<()> {
    let display = path.display();
    let metadata = std::fs::metadata(path)
        .map_err(|_| DaemonError::Config(format!("file \"{display}\" does not exist")))?;
    if !metadata.is_file() {
        return Err(DaemonError::Config(format!(
            "file \"{display}\" is not a normal file"
        )));
    }
    std::fs::File::open(path)
        .map_err(|_| DaemonError::Config(format!("file \"{display}\" is unreadable")))?;
    Ok(())
}
