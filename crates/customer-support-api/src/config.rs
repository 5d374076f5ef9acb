//! Configuration types for the HTTP service
//!
//! Sources are applied in order, later ones overriding earlier ones:
//! 1. built-in defaults (every field carries a serde default)
//! 2. `config/service.yaml` relative to the working directory, if present
//! 3. the file named by `SUPPORT_CONFIG_FILE`, which must exist when set
//! 4. environment variables prefixed `SUPPORT__` with `__` as the separator,
//!    e.g. `SUPPORT__SERVER__HOST=127.0.0.1`
//! 5. `PORT`, when it holds a non-zero port number

use crate::errors::ConfigError;
use customer_support_core::ExtractionConfig;
use serde::{Deserialize, Serialize};

/// Port used when nothing else is configured
pub const DEFAULT_PORT: u16 = 8000;

/// Prefix for structured environment overrides
pub const ENV_PREFIX: &str = "SUPPORT";

/// Environment variable naming an explicit configuration file
pub const CONFIG_FILE_ENV: &str = "SUPPORT_CONFIG_FILE";

/// Environment variable holding the listen port
pub const PORT_ENV: &str = "PORT";

const LOCAL_CONFIG_FILE: &str = "config/service";

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Warehouse extraction settings
    pub extraction: ExtractionConfig,
}

impl ServiceConfig {
    /// Load configuration from files and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var(CONFIG_FILE_ENV).ok();
        let port = std::env::var(PORT_ENV).ok();
        Self::load_from(config_file.as_deref(), port.as_deref())
    }

    /// Load configuration with an explicit file and raw port value
    pub fn load_from(config_file: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(
            config::File::with_name(LOCAL_CONFIG_FILE)
                .required(false)
                .format(config::FileFormat::Yaml),
        );

        if let Some(path) = config_file.filter(|p| !p.is_empty()) {
            builder = builder.add_source(
                config::File::with_name(path)
                    .required(true)
                    .format(config::FileFormat::Yaml),
            );
        }

        let mut service_config: ServiceConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        service_config.server.port = resolve_port(port, service_config.server.port);
        service_config.validate()?;

        Ok(service_config)
    }

    /// Reject configurations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "server.host must not be empty".to_string(),
            });
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// Parse a raw port value, keeping `fallback` when it is absent, non-numeric or zero
pub fn resolve_port(raw: Option<&str>, fallback: u16) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(fallback)
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub enable_cors: bool,

    /// Enable compression
    pub enable_compression: bool,
}

impl ServerConfig {
    /// `host:port` string for binding and logs
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            shutdown_timeout_seconds: 30,
            max_body_size: 1024 * 1024, // 1MB
            enable_cors: true,
            enable_compression: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
