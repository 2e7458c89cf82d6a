//! Diesel row structs for the `movies` table.
//!
//! These types never leave the persistence module; the repository converts
//! them to [`MovieRow`](crate::domain::ports::MovieRow).

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::movies;

/// Row struct for reading from the movies table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = movies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MovieRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: Vec<String>,
    pub version: i32,
}

/// Insertable struct for new movies. `id`, `created_at` and `version` come
/// from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = movies)]
pub(crate) struct NewMovieRecord<'a> {
    pub title: &'a str,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: &'a [String],
}

/// Changeset replacing every mutable column of a movie.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = movies)]
pub(crate) struct MovieChanges<'a> {
    pub title: &'a str,
    pub year: i32,
    pub runtime_minutes: i32,
    pub genres: &'a [String],
}
