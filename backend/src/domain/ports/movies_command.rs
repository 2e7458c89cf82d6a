//! Driving port for movie mutations.
//!
//! Inbound adapters (HTTP handlers) use this port to create and update movies
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, Movie, MovieId, MovieInput, PartialMovieUpdate, RequestContext};

/// Domain use-case port for creating and patching movies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MoviesCommand: Send + Sync {
    /// Validate and store a new movie.
    async fn create_movie(&self, ctx: &RequestContext, input: MovieInput) -> Result<Movie, Error>;

    /// Merge `patch` onto the stored movie, validate and store the result.
    async fn update_movie(
        &self,
        ctx: &RequestContext,
        id: MovieId,
        patch: PartialMovieUpdate,
    ) -> Result<Movie, Error>;
}
