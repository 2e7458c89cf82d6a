//! Builders for HTTP state ports.

use std::sync::Arc;

use actix_web::web;
use mockable::Clock;
use tracing::info;

use crate::domain::MovieService;
use crate::domain::ports::MovieRepository;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryMovieRepository;
use crate::outbound::persistence::DieselMovieRepository;

use super::ServerConfig;

/// Select the storage adapter: Diesel when a pool is configured, otherwise
/// the process-local store.
pub(crate) fn build_movie_repository(config: &ServerConfig) -> Arc<dyn MovieRepository> {
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "movie repository selected");
            Arc::new(DieselMovieRepository::new(pool.clone()))
        }
        None => {
            info!(store = "memory", "movie repository selected");
            Arc::new(InMemoryMovieRepository::new())
        }
    }
}

/// Wire the movie service behind both HTTP driving ports.
pub fn build_http_state(
    repo: Arc<dyn MovieRepository>,
    clock: Arc<dyn Clock>,
) -> web::Data<HttpState> {
    let service = Arc::new(MovieService::new(repo, clock));
    web::Data::new(HttpState::new(service.clone(), service))
}
