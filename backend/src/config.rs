//! Application settings loaded via OrthoConfig.
//!
//! [`AppSettings`] reads `SOCIAL_*` variables (and matching CLI flags);
//! [`SeedSettings`] reads `SOCIAL_SEED_*`. Cookie session settings are read
//! separately by [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::Password;
use crate::inbound::ws::origin::OriginPolicy;

/// Address used when `SOCIAL_BIND_ADDR` is unset.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5013";

/// Invalid or incomplete settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("SOCIAL_SEED_PASSWORD is required when seeding is enabled")]
    MissingSeedPassword,
    #[error("invalid seed password: {0}")]
    SeedPassword(String),
}

/// Server and storage settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOCIAL")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Comma-separated hosts accepted as HTTPS WebSocket origins.
    pub ws_allowed_hosts: Option<String>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool size, never below one.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.max(1)
    }

    /// Database URL with blank values treated as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        self.ws_allowed_hosts
            .as_deref()
            .map(OriginPolicy::from_list)
            .unwrap_or_default()
    }
}

/// Fixture seeding performed at startup on an empty store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOCIAL_SEED")]
pub struct SeedSettings {
    /// Seed the fixture accounts and posts when no users exist.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// Password shared by every seeded account.
    pub password: Option<String>,
}

impl SeedSettings {
    /// The validated seed password, or `None` when seeding is disabled.
    pub fn password(&self) -> Result<Option<Password>, SettingsError> {
        if !self.enabled {
            return Ok(None);
        }
        let raw = self
            .password
            .as_deref()
            .ok_or(SettingsError::MissingSeedPassword)?;
        Password::new(raw)
            .map(Some)
            .map_err(|err| SettingsError::SeedPassword(err.to_string()))
    }
}
