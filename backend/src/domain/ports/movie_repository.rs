//! Port for movie persistence.
//!
//! The [`MovieRepository`] trait is the storage capability the movie service
//! depends on. Adapters assign ids, creation timestamps and versions; the
//! service never sees how rows are stored.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{MovieId, MovieInput};

use super::define_port_error;

define_port_error! {
    /// Errors raised by movie repository adapters.
    pub enum MovieRepositoryError {
        /// No row exists for the requested id.
        NotFound { id: MovieId } => "movie {id} not found",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "movie repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "movie repository query failed: {message}",
    }
}

/// A stored movie as the repository returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRow {
    pub id: MovieId,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: Vec<String>,
    pub version: u32,
}

/// Port for movie storage and retrieval.
///
/// # Version semantics
///
/// - `create_movie` stores the row with version 1.
/// - `update_movie` overwrites every field and sets version to the stored
///   version plus one. No expected-version check is made.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Insert a new movie and return the stored row.
    async fn create_movie(&self, fields: &MovieInput) -> Result<MovieRow, MovieRepositoryError>;

    /// Fetch one movie.
    ///
    /// Returns [`MovieRepositoryError::NotFound`] when no row matches `id`.
    async fn get_movie(&self, id: MovieId) -> Result<MovieRow, MovieRepositoryError>;

    /// Fetch every stored movie in storage order.
    async fn list_movies(&self) -> Result<Vec<MovieRow>, MovieRepositoryError>;

    /// Replace the mutable fields of a movie and bump its version.
    ///
    /// Returns [`MovieRepositoryError::NotFound`] when no row matches `id`.
    async fn update_movie(
        &self,
        id: MovieId,
        fields: &MovieInput,
    ) -> Result<MovieRow, MovieRepositoryError>;
}
