//! Service settings
//!
//! Settings come from a TOML file, then environment overrides are applied.
//!
//! # Environment Variables
//!
//! - `PAYSLIP_CONFIG`: Settings file (default: `config/settings.toml`)
//! - `API_HOST`: Host to bind to
//! - `API_PORT`: Port to listen on
//! - `PAYSLIP_STATIC_DIR`: Directory holding the front end
//!
//! # Example
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 8000
//! static_dir = "public"
//! request_timeout_secs = 30
//! ```
//!
//! A `[tax]` table replaces the built-in rates and must define every slab
//! (`slab1` to `slab5`).

use payslip_core::TaxTable;
use serde::{Deserialize, Serialize};
use std::{
    env,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::DEFAULT_PORT;

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// Settings file used when `PAYSLIP_CONFIG` is not set.
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.toml";

/// Errors raised while loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {path} - {reason}")]
    FileRead { path: String, reason: String },

    #[error("Failed to parse settings: {reason}")]
    Parse { reason: String },

    #[error("Invalid value for {variable}: '{value}'")]
    InvalidOverride { variable: String, value: String },

    #[error("Invalid listen address: {host}:{port}")]
    InvalidAddress { host: String, port: u16 },
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Runtime settings of the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Directory the front end is served from
    pub static_dir: PathBuf,

    /// Upper bound on the time spent handling one request
    pub request_timeout_secs: u64,

    /// Per-slab tax constants
    pub tax: TaxTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            request_timeout_secs: 30,
            tax: TaxTable::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        toml::from_str(content).map_err(|e| SettingsError::Parse {
            reason: e.to_string(),
        })
    }

    /// Read and parse a settings file.
    pub fn load_file(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            SettingsError::Parse { reason } => SettingsError::Parse {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    /// Load settings the way the binary does.
    ///
    /// An explicit `PAYSLIP_CONFIG` file must exist. The default file is
    /// optional; built-in defaults are used without it.
    pub fn from_env() -> SettingsResult<Self> {
        let settings = match env::var("PAYSLIP_CONFIG") {
            Ok(path) => Self::load_file(path)?,
            Err(_) if Path::new(DEFAULT_SETTINGS_PATH).exists() => {
                Self::load_file(DEFAULT_SETTINGS_PATH)?
            }
            Err(_) => {
                tracing::info!(
                    path = DEFAULT_SETTINGS_PATH,
                    "No settings file found, using defaults"
                );
                Self::default()
            }
        };

        settings.apply_overrides(|name| env::var(name).ok())
    }

    /// Apply `API_HOST`, `API_PORT` and `PAYSLIP_STATIC_DIR` from `lookup`.
    pub fn apply_overrides<F>(mut self, lookup: F) -> SettingsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("API_HOST") {
            self.host = host;
        }

        if let Some(port) = lookup("API_PORT") {
            self.port = port
                .parse()
                .map_err(|_| SettingsError::InvalidOverride {
                    variable: "API_PORT".to_string(),
                    value: port.clone(),
                })?;
        }

        if let Some(static_dir) = lookup("PAYSLIP_STATIC_DIR") {
            self.static_dir = PathBuf::from(static_dir);
        }

        Ok(self)
    }

    /// Address the server listens on.
    pub fn socket_addr(&self) -> SettingsResult<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| SettingsError::InvalidAddress {
                host: self.host.clone(),
                port: self.port,
            })?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}
