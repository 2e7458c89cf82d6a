//! HTTP adapter mapping for domain errors.
//!
//! Keeps the domain error type HTTP-agnostic while letting Actix handlers
//! turn domain failures into the `{"error": ...}` envelope and matching
//! status codes.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::{Value, json};
use tracing::error;

use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const NOT_FOUND_MESSAGE: &str = "Not Found";
const INTERNAL_MESSAGE: &str = "Internal Server Error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Client-facing value of the `error` key.
fn client_payload(error: &Error) -> Value {
    match error.code() {
        ErrorCode::InvalidRequest => error
            .details()
            .cloned()
            .unwrap_or_else(|| Value::String(error.message().to_owned())),
        ErrorCode::NotFound => Value::String(NOT_FOUND_MESSAGE.to_owned()),
        ErrorCode::MethodNotAllowed => Value::String(error.message().to_owned()),
        ErrorCode::InternalError => Value::String(INTERNAL_MESSAGE.to_owned()),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": client_payload(self) }))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(err.to_string())
    }
}

/// `JsonConfig` error handler: undecodable bodies are internal errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::internal(format!("failed to decode request body: {err}")).into()
}

/// `PathConfig` error handler: unparsable ids name no resource.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::not_found(format!("unmatched path parameter: {err}")).into()
}
