//! Tests for the movie service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockMovieRepository;
use chrono::{DateTime, Local, TimeZone, Utc};
use rstest::{fixture, rstest};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn make_service(repo: MockMovieRepository) -> MovieService<MockMovieRepository> {
    let now = Utc
        .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    MovieService::new(Arc::new(repo), Arc::new(FixedClock(now)))
}

fn row(id: u64, input: &MovieInput, version: u32) -> MovieRow {
    MovieRow {
        id: MovieId::new(id),
        created_at: Utc::now(),
        title: input.title.clone(),
        year: input.year,
        runtime_minutes: input.runtime_minutes,
        genres: input.genres().to_vec(),
        version,
    }
}

#[fixture]
fn ctx() -> RequestContext {
    RequestContext::detached()
}

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
async fn create_stores_valid_input(ctx: RequestContext, casablanca: MovieInput) {
    let stored = row(1, &casablanca, 1);
    let mut repo = MockMovieRepository::new();
    repo.expect_create_movie()
        .withf(|fields| fields.title == "Casablanca" && fields.runtime_minutes == 102)
        .times(1)
        .return_once(move |_| Ok(stored));

    let movie = make_service(repo)
        .create(&ctx, casablanca)
        .await
        .expect("movie created");

    assert_eq!(movie.id, MovieId::new(1));
    assert_eq!(movie.version, 1);
    assert_eq!(movie.genres, vec!["drama", "romance", "war"]);
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_input_without_storing(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_create_movie().never();

    let error = make_service(repo)
        .create(&ctx, MovieInput::default())
        .await
        .expect_err("empty input is invalid");

    let MovieServiceError::Validation(validation) = error else {
        panic!("expected validation error, got {error:?}");
    };
    assert_eq!(validation.len(), 4);
    assert_eq!(validation.get("title"), Some("must be provided"));
    assert_eq!(validation.get("year"), Some("must be provided"));
    assert_eq!(validation.get("runtimeMinutes"), Some("must be provided"));
    assert_eq!(validation.get("genres"), Some("must be provided"));
}

#[rstest]
#[tokio::test]
async fn create_rejects_years_after_the_clock(ctx: RequestContext, casablanca: MovieInput) {
    let mut repo = MockMovieRepository::new();
    repo.expect_create_movie().never();
    let input = MovieInput {
        year: 2025,
        ..casablanca
    };

    let error = make_service(repo)
        .create(&ctx, input)
        .await
        .expect_err("future year");

    let MovieServiceError::Validation(validation) = error else {
        panic!("expected validation error, got {error:?}");
    };
    assert_eq!(validation.get("year"), Some("must not be in the future"));
}

#[rstest]
#[tokio::test]
async fn create_passes_storage_errors_through(ctx: RequestContext, casablanca: MovieInput) {
    let mut repo = MockMovieRepository::new();
    repo.expect_create_movie()
        .times(1)
        .return_once(|_| Err(MovieRepositoryError::connection("refused")));

    let error = make_service(repo)
        .create(&ctx, casablanca)
        .await
        .expect_err("storage failure");

    assert_eq!(
        error,
        MovieServiceError::Repository(MovieRepositoryError::connection("refused"))
    );
}

#[rstest]
#[tokio::test]
async fn list_transforms_every_row(ctx: RequestContext, casablanca: MovieInput) {
    let rows = vec![row(1, &casablanca, 1), row(2, &casablanca, 3)];
    let mut repo = MockMovieRepository::new();
    repo.expect_list_movies().times(1).return_once(move || Ok(rows));

    let movies = make_service(repo).list(&ctx).await.expect("movies listed");

    assert_eq!(movies.len(), 2);
    assert_eq!(movies[1].id, MovieId::new(2));
    assert_eq!(movies[1].version, 3);
}

#[rstest]
#[tokio::test]
async fn list_returns_empty_when_nothing_is_stored(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_list_movies().times(1).return_once(|| Ok(Vec::new()));

    let movies = make_service(repo).list(&ctx).await.expect("movies listed");
    assert!(movies.is_empty());
}

#[rstest]
#[tokio::test]
async fn get_maps_missing_rows_to_not_found(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(|id| Err(MovieRepositoryError::not_found(id)));

    let error = make_service(repo)
        .get(&ctx, MovieId::new(999))
        .await
        .expect_err("missing movie");

    assert_eq!(error, MovieServiceError::NotFound);
}

#[rstest]
#[tokio::test]
async fn get_passes_query_errors_through(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(|_| Err(MovieRepositoryError::query("syntax error")));

    let error = make_service(repo)
        .get(&ctx, MovieId::new(1))
        .await
        .expect_err("query failure");

    assert_eq!(
        error,
        MovieServiceError::Repository(MovieRepositoryError::query("syntax error"))
    );
}

#[rstest]
#[tokio::test]
async fn update_merges_patch_and_returns_new_version(ctx: RequestContext, casablanca: MovieInput) {
    let existing = row(1, &casablanca, 1);
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update_movie()
        .withf(|id, fields| {
            *id == MovieId::new(1)
                && fields.title == "Casablanca"
                && fields.runtime_minutes == 102
                && fields.genres() == ["romance".to_owned(), "drama".to_owned()]
        })
        .times(1)
        .return_once(|id, fields| {
            Ok(MovieRow {
                id,
                created_at: Utc::now(),
                title: fields.title.clone(),
                year: fields.year,
                runtime_minutes: fields.runtime_minutes,
                genres: fields.genres().to_vec(),
                version: 2,
            })
        });

    let patch = PartialMovieUpdate {
        genres: Some(vec!["romance".into(), "drama".into()]),
        ..PartialMovieUpdate::default()
    };
    let movie = make_service(repo)
        .update(&ctx, MovieId::new(1), patch)
        .await
        .expect("movie updated");

    assert_eq!(movie.version, 2);
    assert_eq!(movie.year, 1942);
    assert_eq!(movie.genres, vec!["romance", "drama"]);
}

#[rstest]
#[tokio::test]
async fn update_with_empty_patch_still_writes(ctx: RequestContext, casablanca: MovieInput) {
    let existing = row(1, &casablanca, 4);
    let written = row(1, &casablanca, 5);
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update_movie()
        .times(1)
        .return_once(move |_, _| Ok(written));

    let movie = make_service(repo)
        .update(&ctx, MovieId::new(1), PartialMovieUpdate::default())
        .await
        .expect("movie updated");

    assert_eq!(movie.version, 5);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_movie_does_not_write(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(|id| Err(MovieRepositoryError::not_found(id)));
    repo.expect_update_movie().never();

    let error = make_service(repo)
        .update(&ctx, MovieId::new(42), PartialMovieUpdate::default())
        .await
        .expect_err("missing movie");

    assert_eq!(error, MovieServiceError::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_rejects_invalid_merge_without_writing(ctx: RequestContext, casablanca: MovieInput) {
    let existing = row(1, &casablanca, 1);
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update_movie().never();

    let patch = PartialMovieUpdate {
        genres: Some(vec!["drama".into(), "drama".into()]),
        ..PartialMovieUpdate::default()
    };
    let error = make_service(repo)
        .update(&ctx, MovieId::new(1), patch)
        .await
        .expect_err("duplicate genres");

    let MovieServiceError::Validation(validation) = error else {
        panic!("expected validation error, got {error:?}");
    };
    assert_eq!(validation.len(), 1);
    assert_eq!(
        validation.get("genres"),
        Some("must not contain duplicate values")
    );
}

#[rstest]
#[tokio::test]
async fn update_maps_vanished_row_to_not_found(ctx: RequestContext, casablanca: MovieInput) {
    let existing = row(1, &casablanca, 1);
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update_movie()
        .times(1)
        .return_once(|id, _| Err(MovieRepositoryError::not_found(id)));

    let error = make_service(repo)
        .update(&ctx, MovieId::new(1), PartialMovieUpdate::default())
        .await
        .expect_err("row vanished");

    assert_eq!(error, MovieServiceError::NotFound);
}

#[rstest]
#[tokio::test]
async fn driving_ports_map_service_errors_to_domain_codes(ctx: RequestContext) {
    let mut repo = MockMovieRepository::new();
    repo.expect_get_movie()
        .times(1)
        .return_once(|id| Err(MovieRepositoryError::not_found(id)));
    repo.expect_list_movies()
        .times(1)
        .return_once(|| Err(MovieRepositoryError::connection("refused")));
    repo.expect_create_movie().never();
    let service = make_service(repo);

    let missing = MoviesQuery::get_movie(&service, &ctx, MovieId::new(9))
        .await
        .expect_err("missing");
    assert_eq!(missing.code(), ErrorCode::NotFound);

    let broken = MoviesQuery::list_movies(&service, &ctx)
        .await
        .expect_err("storage failure");
    assert_eq!(broken.code(), ErrorCode::InternalError);
    assert!(broken.message().contains("refused"));
    assert_eq!(
        broken.details(),
        Some(&serde_json::json!({ "kind": "connection" }))
    );

    let invalid = MoviesCommand::create_movie(&service, &ctx, MovieInput::default())
        .await
        .expect_err("invalid");
    assert_eq!(invalid.code(), ErrorCode::InvalidRequest);
    assert!(invalid.details().is_some());
}
