//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the four movie endpoints, the movie and error schema
//! wrappers, and the request and response envelopes. The document is served
//! by Swagger UI in debug builds and printed by `cargo run --bin openapi-dump`.

use crate::inbound::http::movies::{
    CreateMovieRequestBody, MovieListResponseBody, MovieResponseBody, UpdateMovieRequestBody,
};
use crate::inbound::http::schemas::{ErrorSchema, MovieSchema};
use utoipa::OpenApi;

/// OpenAPI document for the movie API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Movies API",
        description = "Create, list, fetch and partially update movies."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::movies::list_movies,
        crate::inbound::http::movies::create_movie,
        crate::inbound::http::movies::get_movie,
        crate::inbound::http::movies::update_movie,
    ),
    components(schemas(
        MovieSchema,
        ErrorSchema,
        CreateMovieRequestBody,
        UpdateMovieRequestBody,
        MovieResponseBody,
        MovieListResponseBody
    )),
    tags(
        (name = "movies", description = "Movie catalogue operations")
    )
)]
pub struct ApiDoc;
