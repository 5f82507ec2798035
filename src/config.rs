//! Configuration management for the chartfile client
//!
//! Configuration is resolved from several sources, in priority order:
//!
//! 1. The `CHARTFILE_BASE_URL` environment variable (highest)
//! 2. An explicit `--config` file
//! 3. `./chartfile.toml`, then `./config.toml`
//! 4. The platform config directory (`~/.config/chartfile/config.toml`)
//! 5. Built-in defaults (lowest)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::client::ClientConfig;
use crate::constants::{env as env_keys, http};
use crate::errors::{ConfigError, ConfigResult};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Backend server settings
    #[serde(default)]
    pub server: ServerSection,

    /// HTTP client tuning
    #[serde(default)]
    pub client: ClientSection,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    /// Base URL of the documents backend
    pub base_url: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: http::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// `[client]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Maximum pooled connections per host
    pub pool_max_per_host: usize,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration with the standard source priority
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when an explicit path does not
    /// exist; missing implicit files silently fall through to defaults.
    pub fn load(explicit_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.to_path_buf(),
                    });
                }
                Self::load_from_file(path)?
            }
            None => match find_config_file() {
                Some(path) => Self::load_from_file(&path)?,
                None => {
                    debug!("No configuration file found, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(base_url) = std::env::var(env_keys::BASE_URL) {
            info!(base_url = %base_url, "Base URL overridden from environment");
            config.server.base_url = base_url;
        }

        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// The client settings expressed as a [`ClientConfig`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            request_timeout: Duration::from_secs(self.client.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.client.connect_timeout_secs),
            pool_max_per_host: self.client.pool_max_per_host,
            ..ClientConfig::default()
        }
    }
}

/// Look for a configuration file in the standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = [
        PathBuf::from("chartfile.toml"),
        PathBuf::from("config.toml"),
    ];
    for candidate in candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join("chartfile").join("config.toml");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    None
}

/// Default configuration file content, used by `chartfile config --init`
pub fn generate_default_config_content() -> String {
    r#"# chartfile configuration

[server]
# Base URL of the documents backend
base_url = "http://localhost:8000"

[client]
# Per-request timeout in seconds
request_timeout_secs = 60
# Connection establishment timeout in seconds
connect_timeout_secs = 30
# Maximum pooled connections per host
pool_max_per_host = 8

[logging]
# Log level: trace, debug, info, warn, error
level = "info"
"#
    .to_string()
}
