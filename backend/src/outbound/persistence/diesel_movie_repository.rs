//! PostgreSQL-backed `MovieRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{MovieRepository, MovieRepositoryError, MovieRow};
use crate::domain::{MovieId, MovieInput};

use super::models::{MovieChanges, MovieRecord, NewMovieRecord};
use super::pool::{DbPool, PoolError};
use super::schema::movies;

/// Diesel-backed implementation of the `MovieRepository` port.
#[derive(Clone)]
pub struct DieselMovieRepository {
    pool: DbPool,
}

impl DieselMovieRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MovieRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MovieRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MovieRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MovieRepositoryError::connection("database connection error")
        }
        DieselError::QueryBuilderError(_) => MovieRepositoryError::query("database query error"),
        _ => MovieRepositoryError::query("database error"),
    }
}

/// Database key for `id`, or `None` when no row could carry it.
fn db_id(id: MovieId) -> Option<i64> {
    i64::try_from(id.get()).ok()
}

fn record_to_row(record: MovieRecord) -> Result<MovieRow, MovieRepositoryError> {
    let id = u64::try_from(record.id)
        .map_err(|_| MovieRepositoryError::query(format!("negative movie id {}", record.id)))?;
    let version = u32::try_from(record.version).map_err(|_| {
        MovieRepositoryError::query(format!("negative version for movie {}", record.id))
    })?;

    Ok(MovieRow {
        id: MovieId::new(id),
        created_at: record.created_at,
        title: record.title,
        year: record.year,
        runtime_minutes: record.runtime_minutes,
        genres: record.genres,
        version,
    })
}

#[async_trait]
impl MovieRepository for DieselMovieRepository {
    async fn create_movie(&self, fields: &MovieInput) -> Result<MovieRow, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_record = NewMovieRecord {
            title: &fields.title,
            year: fields.year,
            runtime_minutes: fields.runtime_minutes,
            genres: fields.genres(),
        };

        let record: MovieRecord = diesel::insert_into(movies::table)
            .values(&new_record)
            .returning(MovieRecord::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        record_to_row(record)
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieRow, MovieRepositoryError> {
        let Some(key) = db_id(id) else {
            return Err(MovieRepositoryError::not_found(id));
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let record: Option<MovieRecord> = movies::table
            .find(key)
            .select(MovieRecord::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        record
            .ok_or_else(|| MovieRepositoryError::not_found(id))
            .and_then(record_to_row)
    }

    async fn list_movies(&self) -> Result<Vec<MovieRow>, MovieRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let records: Vec<MovieRecord> = movies::table
            .select(MovieRecord::as_select())
            .order(movies::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        records.into_iter().map(record_to_row).collect()
    }

    async fn update_movie(
        &self,
        id: MovieId,
        fields: &MovieInput,
    ) -> Result<MovieRow, MovieRepositoryError> {
        let Some(key) = db_id(id) else {
            return Err(MovieRepositoryError::not_found(id));
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = MovieChanges {
            title: &fields.title,
            year: fields.year,
            runtime_minutes: fields.runtime_minutes,
            genres: fields.genres(),
        };

        let record: Option<MovieRecord> = diesel::update(movies::table.find(key))
            .set((&changes, movies::version.eq(movies::version + 1)))
            .returning(MovieRecord::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        record
            .ok_or_else(|| MovieRepositoryError::not_found(id))
            .and_then(record_to_row)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> MovieRecord {
        MovieRecord {
            id: 7,
            created_at: Utc::now(),
            title: "Casablanca".into(),
            year: 1942,
            runtime_minutes: 102,
            genres: vec!["drama".into(), "romance".into()],
            version: 3,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, MovieRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_errors_map_to_query_errors() {
        let repo_err = map_diesel_error(diesel::result::Error::RollbackTransaction);
        assert!(matches!(repo_err, MovieRepositoryError::Query { .. }));
    }

    #[rstest]
    fn record_converts_to_port_row(record: MovieRecord) {
        let row = record_to_row(record).expect("valid record");

        assert_eq!(row.id, MovieId::new(7));
        assert_eq!(row.version, 3);
        assert_eq!(row.genres, vec!["drama", "romance"]);
    }

    #[rstest]
    fn negative_ids_are_rejected(record: MovieRecord) {
        let result = record_to_row(MovieRecord { id: -1, ..record });
        assert!(matches!(result, Err(MovieRepositoryError::Query { .. })));
    }

    #[rstest]
    #[case(0, Some(0))]
    #[case(i64::MAX as u64, Some(i64::MAX))]
    #[case(u64::MAX, None)]
    fn ids_beyond_bigint_have_no_key(#[case] raw: u64, #[case] expected: Option<i64>) {
        assert_eq!(db_id(MovieId::new(raw)), expected);
    }
}
