//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::ServerSettings;
pub use state_builders::build_http_state;

use std::sync::Arc;
use std::time::Duration;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::Span;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::movies::{self, not_found};
use crate::inbound::http::state::HttpState;
use crate::middleware::{HeaderPolicy, Recovery, ResponseLog, SecureHeaders, Trace};
use state_builders::build_movie_repository;

/// Server version reported in the root span and startup log.
pub const SERVER_VERSION: &str = "0.1.0";

const JSON_BODY_LIMIT: usize = 1024 * 1024;
const KEEP_ALIVE: Duration = Duration::from_secs(60);
const CLIENT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Per-worker inputs to [`build_app`].
#[derive(Clone)]
pub struct AppDependencies {
    pub http_state: web::Data<HttpState>,
    pub header_policy: HeaderPolicy,
    pub root_span: Span,
}

/// Assemble the application: middleware, extractor configuration, the `/v1`
/// movie routes and the JSON 404 fallback.
///
/// The pipeline runs recovery, trace assignment, response logging and then
/// the header policy, outermost first.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        header_policy,
        root_span,
    } = deps;

    let app = App::new()
        .app_data(http_state)
        .app_data(
            web::JsonConfig::default()
                .limit(JSON_BODY_LIMIT)
                .error_handler(json_error_handler),
        )
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(SecureHeaders::new(header_policy))
        .wrap(ResponseLog)
        .wrap(Trace::new(root_span))
        .wrap(Recovery)
        .service(web::scope("/v1").configure(movies::configure));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(not_found))
}

/// Construct an Actix HTTP server from a prepared [`ServerConfig`].
///
/// # Parameters
/// - `config`: bind address, header policy and optional database pool.
/// - `root_span`: parent of every per-request span.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig, root_span: Span) -> std::io::Result<Server> {
    let repo = build_movie_repository(&config);
    let http_state = build_http_state(repo, Arc::new(mockable::DefaultClock));
    let ServerConfig {
        bind_addr,
        env: _,
        header_policy,
        db_pool: _,
    } = config;

    let deps = AppDependencies {
        http_state,
        header_policy,
        root_span,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .keep_alive(KEEP_ALIVE)
        .client_request_timeout(CLIENT_REQUEST_TIMEOUT)
        .shutdown_timeout(SHUTDOWN_TIMEOUT_SECS)
        .bind(bind_addr)?
        .run();

    Ok(server)
}
