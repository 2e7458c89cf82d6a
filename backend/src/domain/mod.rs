//! Domain primitives, services and ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.
//! - `Validator` / `ValidationError`: field-level validation.
//! - `Movie`, `MovieInput`, `PartialMovieUpdate`: the movie model.
//! - `MovieService`: implements the movie driving ports.
//! - `TraceId` / `RequestContext`: per-request correlation.

pub mod error;
pub mod movie;
pub mod movie_service;
pub mod ports;
pub mod request_context;
pub mod trace_id;
pub mod validator;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::movie::{Movie, MovieId, MovieInput, PartialMovieUpdate};
pub use self::movie_service::{MovieService, MovieServiceError};
pub use self::request_context::RequestContext;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId, TraceIdError};
pub use self::validator::{ValidationError, Validator, unique};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use movies::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("Not Found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
