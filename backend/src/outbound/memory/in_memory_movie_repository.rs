//! In-memory `MovieRepository` used when no database is configured.
//!
//! Ids are assigned sequentially from 1. Contents vanish with the process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::ports::{MovieRepository, MovieRepositoryError, MovieRow};
use crate::domain::{MovieId, MovieInput};

#[derive(Debug, Default)]
struct Store {
    last_id: u64,
    rows: BTreeMap<MovieId, MovieRow>,
}

/// Movie storage backed by a locked ordered map.
#[derive(Debug, Default)]
pub struct InMemoryMovieRepository {
    store: RwLock<Store>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn create_movie(&self, fields: &MovieInput) -> Result<MovieRow, MovieRepositoryError> {
        let mut store = self.store.write().await;
        let next = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| MovieRepositoryError::query("movie id space exhausted"))?;
        store.last_id = next;

        let row = MovieRow {
            id: MovieId::new(next),
            created_at: Utc::now(),
            title: fields.title.clone(),
            year: fields.year,
            runtime_minutes: fields.runtime_minutes,
            genres: fields.genres().to_vec(),
            version: 1,
        };
        store.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn get_movie(&self, id: MovieId) -> Result<MovieRow, MovieRepositoryError> {
        self.store
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| MovieRepositoryError::not_found(id))
    }

    async fn list_movies(&self) -> Result<Vec<MovieRow>, MovieRepositoryError> {
        Ok(self.store.read().await.rows.values().cloned().collect())
    }

    async fn update_movie(
        &self,
        id: MovieId,
        fields: &MovieInput,
    ) -> Result<MovieRow, MovieRepositoryError> {
        let mut store = self.store.write().await;
        let row = store
            .rows
            .get_mut(&id)
            .ok_or_else(|| MovieRepositoryError::not_found(id))?;

        row.title.clone_from(&fields.title);
        row.year = fields.year;
        row.runtime_minutes = fields.runtime_minutes;
        fields.genres().clone_into(&mut row.genres);
        row.version += 1;
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn casablanca() -> MovieInput {
        MovieInput {
            title: "Casablanca".into(),
            year: 1942,
            runtime_minutes: 102,
            genres: Some(vec!["drama".into(), "romance".into(), "war".into()]),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_sequential_from_one(casablanca: MovieInput) {
        let repo = InMemoryMovieRepository::new();

        let first = repo.create_movie(&casablanca).await.expect("first insert");
        let second = repo.create_movie(&casablanca).await.expect("second insert");

        assert_eq!(first.id, MovieId::new(1));
        assert_eq!(second.id, MovieId::new(2));
        assert_eq!(first.version, 1);
    }

    #[rstest]
    #[tokio::test]
    async fn get_returns_not_found_for_unknown_ids() {
        let repo = InMemoryMovieRepository::new();

        let error = repo.get_movie(MovieId::new(999)).await.expect_err("empty store");
        assert_eq!(error, MovieRepositoryError::not_found(999_u64));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_fields_and_bumps_version(casablanca: MovieInput) {
        let repo = InMemoryMovieRepository::new();
        let created = repo.create_movie(&casablanca).await.expect("insert");

        let changed = MovieInput {
            runtime_minutes: 103,
            genres: Some(vec!["romance".into()]),
            ..casablanca
        };
        let updated = repo
            .update_movie(created.id, &changed)
            .await
            .expect("update");

        assert_eq!(updated.version, 2);
        assert_eq!(updated.runtime_minutes, 103);
        assert_eq!(updated.genres, vec!["romance"]);
        assert_eq!(updated.created_at, created.created_at);

        let fetched = repo.get_movie(created.id).await.expect("fetch");
        assert_eq!(fetched, updated);
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_unknown_id_is_not_found(casablanca: MovieInput) {
        let repo = InMemoryMovieRepository::new();

        let error = repo
            .update_movie(MovieId::new(5), &casablanca)
            .await
            .expect_err("nothing stored");
        assert!(matches!(error, MovieRepositoryError::NotFound { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn list_returns_every_row(casablanca: MovieInput) {
        let repo = InMemoryMovieRepository::new();
        assert!(repo.list_movies().await.expect("empty list").is_empty());

        repo.create_movie(&casablanca).await.expect("insert");
        repo.create_movie(&casablanca).await.expect("insert");

        let rows = repo.list_movies().await.expect("list");
        assert_eq!(rows.len(), 2);
    }
}
