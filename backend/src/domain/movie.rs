//! Movie domain model, validation rules and partial-update merging.
//!
//! A [`Movie`] is what clients see. [`MovieInput`] carries the four mutable
//! fields for creation and for the fully merged result of an update, while
//! [`PartialMovieUpdate`] is the sparse patch a client sends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ValidationError, Validator, unique};

/// Earliest year a motion picture could have been made.
pub const EARLIEST_MOVIE_YEAR: i32 = 1888;
/// Upper bound on the byte length of a title.
pub const MAX_TITLE_BYTES: usize = 500;
pub const MIN_GENRES: usize = 1;
pub const MAX_GENRES: usize = 5;

/// Storage-assigned movie identifier.
///
/// # Examples
/// ```
/// use movies::domain::MovieId;
///
/// let id: MovieId = "42".parse().expect("numeric id");
/// assert_eq!(id.get(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u64);

impl MovieId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MovieId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A persisted movie as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: Vec<String>,
    pub version: u32,
}

/// The mutable fields of a movie, validated before any write.
///
/// Zero scalars and `None` genres stand for "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieInput {
    pub title: String,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: Option<Vec<String>>,
}

impl MovieInput {
    /// Genres as a slice; empty when none were provided.
    pub fn genres(&self) -> &[String] {
        self.genres.as_deref().unwrap_or_default()
    }

    /// Check every field rule against `current_year`.
    ///
    /// All fields are checked; each failing field reports its first broken
    /// rule.
    ///
    /// # Errors
    /// Returns [`ValidationError`] listing every invalid field.
    ///
    /// # Examples
    /// ```
    /// use movies::domain::MovieInput;
    ///
    /// let input = MovieInput {
    ///     title: "Casablanca".into(),
    ///     year: 1942,
    ///     runtime_minutes: 102,
    ///     genres: Some(vec!["drama".into(), "romance".into()]),
    /// };
    /// assert!(input.validate(2024).is_ok());
    /// ```
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        let mut v = Validator::new();

        v.check(!self.title.is_empty(), "title", "must be provided");
        v.check(
            self.title.len() <= MAX_TITLE_BYTES,
            "title",
            "must not be more than 500 bytes long",
        );

        v.check(self.year != 0, "year", "must be provided");
        v.check(
            self.year >= EARLIEST_MOVIE_YEAR,
            "year",
            "must not be earlier than 1888",
        );
        v.check(self.year <= current_year, "year", "must not be in the future");

        v.check(self.runtime_minutes != 0, "runtimeMinutes", "must be provided");
        v.check(
            self.runtime_minutes > 0,
            "runtimeMinutes",
            "must be a positive integer",
        );

        let genres = self.genres();
        v.check(self.genres.is_some(), "genres", "must be provided");
        v.check(
            genres.len() >= MIN_GENRES,
            "genres",
            "must contain at least 1 genre",
        );
        v.check(
            genres.len() <= MAX_GENRES,
            "genres",
            "must not contain more than 5 genres",
        );
        v.check(
            unique(genres),
            "genres",
            "must not contain duplicate values",
        );

        v.ok()
    }
}

/// Sparse patch applied to an existing movie.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMovieUpdate {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl PartialMovieUpdate {
    /// Overlay the patch on `existing`, producing a complete input.
    ///
    /// Present fields replace the stored value. `genres` replaces the whole
    /// list.
    pub fn merge_onto(self, existing: &Movie) -> MovieInput {
        MovieInput {
            title: self.title.unwrap_or_else(|| existing.title.clone()),
            year: self.year.unwrap_or(existing.year),
            runtime_minutes: self.runtime_minutes.unwrap_or(existing.runtime_minutes),
            genres: Some(self.genres.unwrap_or_else(|| existing.genres.clone())),
        }
    }

    /// Whether the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.year.is_none()
            && self.runtime_minutes.is_none()
            && self.genres.is_none()
    }
}
