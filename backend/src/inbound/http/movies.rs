//! Movie HTTP handlers.
//!
//! ```text
//! GET   /v1/movies
//! POST  /v1/movies
//! GET   /v1/movies/{id}
//! PATCH /v1/movies/{id}
//! ```
//!
//! Handlers decode the body, call the movie ports with the request context
//! and wrap results in `{"movie": ...}` or `{"movies": [...]}`.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Movie, MovieId, MovieInput, PartialMovieUpdate, RequestContext};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, MovieSchema};
use crate::inbound::http::state::HttpState;

/// Request payload for creating a movie. Missing fields fail validation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateMovieRequestBody {
    #[schema(example = "Casablanca")]
    pub title: Option<String>,
    #[schema(example = 1942)]
    pub year: Option<i32>,
    #[schema(example = 102)]
    pub runtime_minutes: Option<i32>,
    #[schema(example = json!(["drama", "romance", "war"]))]
    pub genres: Option<Vec<String>>,
}

impl From<CreateMovieRequestBody> for MovieInput {
    fn from(value: CreateMovieRequestBody) -> Self {
        Self {
            title: value.title.unwrap_or_default(),
            year: value.year.unwrap_or_default(),
            runtime_minutes: value.runtime_minutes.unwrap_or_default(),
            genres: value.genres,
        }
    }
}

/// Request payload for patching a movie. Absent fields keep their value;
/// `genres` replaces the whole list.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateMovieRequestBody {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub runtime_minutes: Option<i32>,
    pub genres: Option<Vec<String>>,
}

impl From<UpdateMovieRequestBody> for PartialMovieUpdate {
    fn from(value: UpdateMovieRequestBody) -> Self {
        Self {
            title: value.title,
            year: value.year,
            runtime_minutes: value.runtime_minutes,
            genres: value.genres,
        }
    }
}

/// Single-movie envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieResponseBody {
    #[schema(value_type = MovieSchema)]
    pub movie: Movie,
}

/// Movie list envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct MovieListResponseBody {
    #[schema(value_type = Vec<MovieSchema>)]
    pub movies: Vec<Movie>,
}

fn location_of(id: MovieId) -> String {
    format!("/v1/movies/{id}")
}

/// Register the movie resources on a `/v1` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/movies")
            .route(web::get().to(list_movies))
            .route(web::post().to(create_movie))
            .default_service(web::to(method_not_allowed)),
    )
    .service(
        web::resource("/movies/{id}")
            .route(web::get().to(get_movie))
            .route(web::patch().to(update_movie))
            .default_service(web::to(method_not_allowed)),
    );
}

/// List every movie.
#[utoipa::path(
    get,
    path = "/v1/movies",
    responses(
        (status = 200, description = "All movies", body = MovieListResponseBody),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "listMovies"
)]
pub async fn list_movies(
    state: web::Data<HttpState>,
    ctx: RequestContext,
) -> ApiResult<web::Json<MovieListResponseBody>> {
    let movies = state.movies_query.list_movies(&ctx).await?;
    Ok(web::Json(MovieListResponseBody { movies }))
}

/// Create a movie.
#[utoipa::path(
    post,
    path = "/v1/movies",
    request_body = CreateMovieRequestBody,
    responses(
        (status = 201, description = "Movie created", body = MovieResponseBody,
            headers(("Location" = String, description = "URL of the new movie"))),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "createMovie"
)]
pub async fn create_movie(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    payload: web::Json<CreateMovieRequestBody>,
) -> ApiResult<HttpResponse> {
    let movie = state
        .movies
        .create_movie(&ctx, payload.into_inner().into())
        .await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location_of(movie.id)))
        .json(MovieResponseBody { movie }))
}

/// Fetch one movie.
#[utoipa::path(
    get,
    path = "/v1/movies/{id}",
    params(("id" = u64, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "The movie", body = MovieResponseBody),
        (status = 404, description = "No such movie", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "getMovie"
)]
pub async fn get_movie(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    id: web::Path<MovieId>,
) -> ApiResult<web::Json<MovieResponseBody>> {
    let movie = state.movies_query.get_movie(&ctx, id.into_inner()).await?;
    Ok(web::Json(MovieResponseBody { movie }))
}

/// Partially update a movie.
#[utoipa::path(
    patch,
    path = "/v1/movies/{id}",
    params(("id" = u64, Path, description = "Movie identifier")),
    request_body = UpdateMovieRequestBody,
    responses(
        (status = 200, description = "The updated movie", body = MovieResponseBody),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 404, description = "No such movie", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "updateMovie"
)]
pub async fn update_movie(
    state: web::Data<HttpState>,
    ctx: RequestContext,
    id: web::Path<MovieId>,
    payload: web::Json<UpdateMovieRequestBody>,
) -> ApiResult<web::Json<MovieResponseBody>> {
    let movie = state
        .movies
        .update_movie(&ctx, id.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(MovieResponseBody { movie }))
}

/// Fallback for known resources hit with an unsupported method.
pub async fn method_not_allowed(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed(req.method().as_str()))
}

/// Fallback for unmatched routes.
pub async fn not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!("no route for {}", req.path())))
}

#[cfg(test)]
#[path = "movies_tests.rs"]
mod tests;
