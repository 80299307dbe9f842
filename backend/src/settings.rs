//! Process settings loaded via OrthoConfig.
//!
//! Values come from `LEARNHUB_*` environment variables (or matching CLI
//! flags). Session cookie settings are read separately; see
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
}

/// Startup configuration.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "LEARNHUB")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the in-memory adapters are used.
    pub database_url: Option<String>,
    /// Seed the catalog at startup when it is empty.
    pub seed_courses: Option<bool>,
    /// Artificial delay added to every catalog read, in milliseconds.
    pub catalog_latency_ms: Option<u64>,
    /// Comma-separated origins allowed to open `/ws/auth`.
    pub allowed_origins: Option<String>,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddr`] when the configured value is not a
    /// `host:port` socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.trim().parse().map_err(|err: std::net::AddrParseError| {
            SettingsError::BindAddr {
                value: value.to_owned(),
                message: err.to_string(),
            }
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn seed_courses(&self) -> bool {
        self.seed_courses.unwrap_or(true)
    }

    pub fn catalog_latency(&self) -> Duration {
        Duration::from_millis(self.catalog_latency_ms.unwrap_or(0))
    }

    /// Allow-list entries; defaults to the local development frontend.
    pub fn allowed_origins(&self) -> Vec<String> {
        match self.allowed_origins.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_owned)
                .collect(),
            None => vec![DEFAULT_ALLOWED_ORIGIN.to_owned()],
        }
    }
}
