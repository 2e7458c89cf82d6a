//! Backend entry-point: loads settings, selects the store and serves the
//! movie API.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use tracing::{info, info_span, warn};
use tracing_subscriber::{EnvFilter, fmt};

use movies::middleware::HeaderPolicy;
use movies::outbound::persistence::{DbPool, PoolConfig};
use movies::server::{SERVER_VERSION, ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("configuration failed: {e}")))?;
    let root_span = info_span!("movies", version = SERVER_VERSION, env = settings.env());

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], settings.port()));
    let mut config = ServerConfig::new(bind_addr, settings.env());

    if let Some(origin) = settings.cors_origin() {
        let policy = HeaderPolicy::cors(origin).map_err(std::io::Error::other)?;
        config = config.with_header_policy(policy);
    }

    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool setup failed: {e}")))?;
        config = config.with_db_pool(pool);
    }

    root_span.in_scope(|| {
        info!(
            addr = %config.bind_addr(),
            env = config.env(),
            version = SERVER_VERSION,
            "starting server"
        );
    });

    create_server(config, root_span)?.await
}
