//! Movie domain service.
//!
//! [`MovieService`] implements the movie driving ports on top of a
//! [`MovieRepository`]. It validates payloads before any write, merges sparse
//! patches onto the stored movie, translates storage "not found" into a
//! domain error and strips storage-only fields from the rows it returns.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    MovieRepository, MovieRepositoryError, MovieRow, MoviesCommand, MoviesQuery,
};
use crate::domain::{
    Error, Movie, MovieId, MovieInput, PartialMovieUpdate, RequestContext, ValidationError,
};

/// Failures surfaced by [`MovieService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MovieServiceError {
    /// The payload, or the merged update, broke a field rule.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No movie exists for the requested id.
    #[error("movie not found")]
    NotFound,
    /// Any other storage failure, passed through unchanged.
    #[error(transparent)]
    Repository(MovieRepositoryError),
}

impl From<MovieRepositoryError> for MovieServiceError {
    fn from(value: MovieRepositoryError) -> Self {
        match value {
            MovieRepositoryError::NotFound { .. } => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}

impl From<MovieServiceError> for Error {
    fn from(value: MovieServiceError) -> Self {
        match value {
            MovieServiceError::Validation(err) => err.into(),
            MovieServiceError::NotFound => Error::not_found("movie not found"),
            MovieServiceError::Repository(err) => {
                Error::internal(err.to_string()).with_details(json!({ "kind": err.kind() }))
            }
        }
    }
}

/// Movie service implementing [`MoviesCommand`] and [`MoviesQuery`].
pub struct MovieService<R: ?Sized> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for MovieService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> MovieService<R> {
    /// Create a service over `repo`, reading the current year from `clock`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    fn current_year(&self) -> i32 {
        self.clock.utc().year()
    }
}

impl<R> MovieService<R>
where
    R: MovieRepository + ?Sized,
{
    fn transform(row: MovieRow) -> Movie {
        Movie {
            id: row.id,
            title: row.title,
            year: row.year,
            runtime_minutes: row.runtime_minutes,
            genres: row.genres,
            version: row.version,
        }
    }

    /// Validate `input` and store it as a new movie.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: MovieInput,
    ) -> Result<Movie, MovieServiceError> {
        input.validate(self.current_year())?;
        let movie = Self::transform(self.repo.create_movie(&input).await?);
        ctx.span().in_scope(|| {
            info!(movie_id = %movie.id, version = movie.version, "created movie");
        });
        Ok(movie)
    }

    /// Return every stored movie.
    pub async fn list(&self, _ctx: &RequestContext) -> Result<Vec<Movie>, MovieServiceError> {
        let rows = self.repo.list_movies().await?;
        Ok(rows.into_iter().map(Self::transform).collect())
    }

    /// Return the movie stored under `id`.
    pub async fn get(&self, _ctx: &RequestContext, id: MovieId) -> Result<Movie, MovieServiceError> {
        Ok(Self::transform(self.repo.get_movie(id).await?))
    }

    /// Merge `patch` onto the stored movie, validate, then persist.
    ///
    /// The version is bumped on every successful write, including patches
    /// that change nothing.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: MovieId,
        patch: PartialMovieUpdate,
    ) -> Result<Movie, MovieServiceError> {
        let existing = self.get(ctx, id).await?;
        let merged = patch.merge_onto(&existing);
        merged.validate(self.current_year())?;
        let movie = Self::transform(self.repo.update_movie(id, &merged).await?);
        ctx.span().in_scope(|| {
            info!(movie_id = %movie.id, version = movie.version, "updated movie");
        });
        Ok(movie)
    }
}

#[async_trait]
impl<R> MoviesCommand for MovieService<R>
where
    R: MovieRepository + ?Sized,
{
    async fn create_movie(&self, ctx: &RequestContext, input: MovieInput) -> Result<Movie, Error> {
        self.create(ctx, input).await.map_err(Error::from)
    }

    async fn update_movie(
        &self,
        ctx: &RequestContext,
        id: MovieId,
        patch: PartialMovieUpdate,
    ) -> Result<Movie, Error> {
        self.update(ctx, id, patch).await.map_err(Error::from)
    }
}

#[async_trait]
impl<R> MoviesQuery for MovieService<R>
where
    R: MovieRepository + ?Sized,
{
    async fn list_movies(&self, ctx: &RequestContext) -> Result<Vec<Movie>, Error> {
        self.list(ctx).await.map_err(Error::from)
    }

    async fn get_movie(&self, ctx: &RequestContext, id: MovieId) -> Result<Movie, Error> {
        self.get(ctx, id).await.map_err(Error::from)
    }
}

#[cfg(test)]
#[path = "movie_service_tests.rs"]
mod tests;
