//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MOVIES_*` environment variables and an
//! optional configuration file, in increasing order of precedence from file
//! to CLI.

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Process configuration for the movie server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MOVIES")]
pub struct ServerSettings {
    /// TCP port bound on all interfaces.
    #[ortho_config(default = 4000)]
    pub port: u16,
    /// Environment label (`development`, `staging`, `production`).
    #[ortho_config(default = "development".into())]
    pub env: String,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Allowed cross-origin caller; hardened headers are sent when absent.
    pub cors_origin: Option<String>,
}

impl ServerSettings {
    /// Return the configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Return the environment label.
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Return the database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the CORS origin, ignoring blank values.
    pub fn cors_origin(&self) -> Option<&str> {
        self.cors_origin
            .as_deref()
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
    }
}
