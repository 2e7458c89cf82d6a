//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::middleware::HeaderPolicy;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) env: String,
    pub(crate) header_policy: HeaderPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with hardened headers and the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, env: impl Into<String>) -> Self {
        Self {
            bind_addr,
            env: env.into(),
            header_policy: HeaderPolicy::Hardened,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the Diesel repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Select the response header policy.
    #[must_use]
    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the environment label.
    #[must_use]
    pub fn env(&self) -> &str {
        &self.env
    }

    /// Return the selected header policy.
    #[must_use]
    pub fn header_policy(&self) -> &HeaderPolicy {
        &self.header_policy
    }
}
