//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{MoviesCommand, MoviesQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub movies: Arc<dyn MoviesCommand>,
    pub movies_query: Arc<dyn MoviesQuery>,
}

impl HttpState {
    pub fn new(movies: Arc<dyn MoviesCommand>, movies_query: Arc<dyn MoviesQuery>) -> Self {
        Self {
            movies,
            movies_query,
        }
    }
}
