//! Request-scoped trace identifier for correlation across logs and errors.
//!
//! `TraceId` is a domain primitive representing a correlation identifier that
//! follows a request through the system. Clients may supply their own value
//! through the [`TRACE_ID_HEADER`]; otherwise a random UUID is generated.

use uuid::Uuid;

/// Header used to receive and echo trace identifiers.
pub const TRACE_ID_HEADER: &str = "X-Trace-ID";

const MAX_TRACE_ID_LEN: usize = 128;

/// Reasons a client-supplied trace identifier is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraceIdError {
    #[error("trace id must not be empty")]
    Empty,
    #[error("trace id must not exceed {MAX_TRACE_ID_LEN} characters")]
    TooLong,
    #[error("trace id must contain only visible ASCII characters")]
    InvalidCharacters,
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use movies::domain::TraceId;
///
/// let trace_id: TraceId = "req-42".parse().expect("valid trace id");
/// assert_eq!(trace_id.as_ref(), "req-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TraceId(String);

impl TraceId {
    /// Generate a new random trace identifier.
    #[must_use]
    #[rustfmt::skip]
    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

    /// Validate a caller-supplied identifier.
    pub fn new(value: impl Into<String>) -> Result<Self, TraceIdError> {
        let value = value.into();
        if value.is_empty() {
            return Err(TraceIdError::Empty);
        }
        if value.len() > MAX_TRACE_ID_LEN {
            return Err(TraceIdError::TooLong);
        }
        if !value.bytes().all(|byte| byte.is_ascii_graphic()) {
            return Err(TraceIdError::InvalidCharacters);
        }
        Ok(Self(value))
    }

    /// Adopt the inbound header value when usable, otherwise generate one.
    #[must_use]
    pub fn from_header_or_generate(header: Option<&str>) -> Self {
        header
            .and_then(|value| Self::new(value).ok())
            .unwrap_or_else(Self::generate)
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TraceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = TraceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
