//! Service configuration
//!
//! Configuration is a plain value built once at startup and handed to the
//! components that need it. Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `quantumsynth.toml` / `config/quantumsynth.toml`)
//! 3. `QUANTUMSYNTH_*` environment variables
//! 4. CLI flags (applied by the binary)
//!
//! [`AppConfig::resolve`] does not log, so the binary can install its log
//! subscriber from the resolved level before reporting the source.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [log]
//! level = "info"
//!
//! [quantum]
//! default_mode = "superposition"
//! max_jobs = 64
//!
//! [security]
//! enable_auth = false
//! jwt_secret = ""
//! allowed_origins = "https://example.com,https://admin.example.com"
//! ```

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuantumSynthError, Result};
use crate::model::Mode;

/// Default config file name searched in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "quantumsynth.toml";

/// Log levels accepted by [`LogConfig::level`]
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
    /// Dispatcher settings
    #[serde(default)]
    pub quantum: QuantumConfig,
    /// Security settings (carried, not enforced)
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// One of [`LOG_LEVELS`]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    /// Advertised default mode, one of [`Mode::AVAILABLE`]. Process requests
    /// without a mode are still labelled `Classic`.
    pub default_mode: String,
    /// Maximum concurrent dispatches
    pub max_jobs: usize,
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            default_mode: "superposition".to_string(),
            max_jobs: 64,
        }
    }
}

/// Security settings
///
/// Loaded and validated for shape only; no endpoint enforces them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Whether authentication would be required
    pub enable_auth: bool,
    /// Token signing secret
    pub jwt_secret: String,
    /// Comma-separated list of allowed CORS origins
    pub allowed_origins: String,
}

impl SecurityConfig {
    /// Allowed origins as a trimmed list, empty entries dropped
    #[must_use]
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| QuantumSynthError::ConfigError {
                message: format!("Failed to read config file '{}': {e}", path.display()),
            })?;
        toml::from_str(&contents).map_err(|e| QuantumSynthError::ConfigError {
            message: format!("Failed to parse TOML in '{}': {e}", path.display()),
        })
    }

    /// Parse configuration from a TOML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| QuantumSynthError::ConfigError {
            message: format!("Failed to parse TOML: {e}"),
        })
    }

    /// Resolve file, then environment, then validate, and log where the
    /// settings came from.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a file is unreadable or the result is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config, source) = Self::resolve(path)?;
        source.log();
        Ok(config)
    }

    /// Like [`AppConfig::load`] but silent, for callers that install the log
    /// subscriber from the resolved config before reporting `source`.
    ///
    /// An explicit `path` must exist. Without one, the default locations are
    /// searched and defaults are used if none is found.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a file is unreadable or the result is invalid
    pub fn resolve(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let source = match path {
            Some(path) => ConfigSource::File(path.to_path_buf()),
            None => Self::discover().map_or(ConfigSource::Defaults, ConfigSource::File),
        };
        let config = match &source {
            ConfigSource::File(path) => Self::from_file(path)?,
            ConfigSource::Defaults => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok((config, source))
    }

    /// First default config location that exists
    #[must_use]
    pub fn discover() -> Option<PathBuf> {
        [
            PathBuf::from(DEFAULT_CONFIG_FILE),
            Path::new("config").join(DEFAULT_CONFIG_FILE),
        ]
        .into_iter()
        .find(|p| p.is_file())
    }

    /// Apply `QUANTUMSYNTH_*` environment overrides.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `QUANTUMSYNTH_SERVER_HOST` | `server.host` |
    /// | `QUANTUMSYNTH_SERVER_PORT` | `server.port` |
    /// | `QUANTUMSYNTH_LOG_LEVEL` | `log.level` |
    /// | `QUANTUMSYNTH_QUANTUM_DEFAULT_MODE` | `quantum.default_mode` |
    /// | `QUANTUMSYNTH_QUANTUM_MAX_JOBS` | `quantum.max_jobs` |
    /// | `QUANTUMSYNTH_SECURITY_ENABLE_AUTH` | `security.enable_auth` |
    /// | `QUANTUMSYNTH_JWT_SECRET` | `security.jwt_secret` |
    /// | `QUANTUMSYNTH_SECURITY_ALLOWED_ORIGINS` | `security.allowed_origins` |
    ///
    /// Values that fail to parse are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("QUANTUMSYNTH_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_SERVER_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_LOG_LEVEL") {
            self.log.level = val;
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_QUANTUM_DEFAULT_MODE") {
            self.quantum.default_mode = val;
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_QUANTUM_MAX_JOBS") {
            if let Ok(n) = val.parse::<usize>() {
                self.quantum.max_jobs = n;
            }
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_SECURITY_ENABLE_AUTH") {
            if let Ok(b) = val.parse::<bool>() {
                self.security.enable_auth = b;
            }
        }
        if self.security.jwt_secret.is_empty() {
            if let Ok(val) = env::var("QUANTUMSYNTH_JWT_SECRET") {
                self.security.jwt_secret = val;
            }
        }
        if let Ok(val) = env::var("QUANTUMSYNTH_SECURITY_ALLOWED_ORIGINS") {
            self.security.allowed_origins = val;
        }
        self
    }

    /// Validate all sections, returning the first problem found
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the offending section
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(config_error("server", "host must not be empty"));
        }
        if self.server.port == 0 {
            return Err(config_error("server", "port must be non-zero"));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(config_error(
                "log",
                &format!(
                    "unknown level '{}', expected one of {}",
                    self.log.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }
        if self.quantum.max_jobs == 0 {
            return Err(config_error("quantum", "max_jobs must be non-zero"));
        }
        if !Mode::AVAILABLE
            .iter()
            .any(|m| m.as_str() == self.quantum.default_mode)
        {
            return Err(config_error(
                "quantum",
                &format!(
                    "unknown default_mode '{}', expected one of {}",
                    self.quantum.default_mode,
                    available_mode_names()
                ),
            ));
        }
        Ok(())
    }

    /// Listener address as `host:port`
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Serialize to a TOML string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| QuantumSynthError::ConfigError {
            message: format!("Failed to serialize to TOML: {e}"),
        })
    }
}

/// Where [`AppConfig::resolve`] found its base settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicit or discovered TOML file
    File(PathBuf),
    /// No file; built-in defaults
    Defaults,
}

impl ConfigSource {
    /// Report the source through the installed subscriber
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => {
                tracing::info!(path = %path.display(), "Using config file");
            },
            ConfigSource::Defaults => {
                tracing::warn!("Config file not found, using environment or defaults");
            },
        }
    }
}

fn available_mode_names() -> String {
    Mode::AVAILABLE
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn config_error(section: &str, message: &str) -> QuantumSynthError {
    QuantumSynthError::ConfigError {
        message: format!("[{section}] {message}"),
    }
}
