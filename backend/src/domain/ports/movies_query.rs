//! Driving port for movie reads.

use async_trait::async_trait;

use crate::domain::{Error, Movie, MovieId, RequestContext};

/// Domain use-case port for reading movies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoviesQuery: Send + Sync {
    /// Return every movie. Order is not defined.
    async fn list_movies(&self, ctx: &RequestContext) -> Result<Vec<Movie>, Error>;

    /// Return one movie or a not-found error.
    async fn get_movie(&self, ctx: &RequestContext, id: MovieId) -> Result<Movie, Error>;
}
