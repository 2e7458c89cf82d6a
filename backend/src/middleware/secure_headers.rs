//! Response header policies.
//!
//! A deployment uses exactly one [`HeaderPolicy`]. The hardened policy sets
//! browser security headers; the CORS policy allows one origin and answers
//! `OPTIONS` preflights directly.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_SECURITY_POLICY, HeaderMap, HeaderName, HeaderValue,
    REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

const CONTENT_SECURITY_POLICY_VALUE: &str =
    "default-src 'self'; style-src 'self' fonts.googleapis.com; font-src fonts.gstatic.com";
const CORS_ALLOWED_METHODS: &str = "GET, POST, PATCH, OPTIONS";
const CORS_ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Trace-ID";

/// Header set applied to every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Browser hardening headers.
    Hardened,
    /// Cross-origin access for a single origin.
    Cors { origin: HeaderValue },
}

impl HeaderPolicy {
    /// CORS policy for `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidOrigin`] when `origin` cannot be sent as a header value.
    pub fn cors(origin: &str) -> Result<Self, InvalidOrigin> {
        let origin = HeaderValue::from_str(origin).map_err(|_| InvalidOrigin {
            origin: origin.to_owned(),
        })?;
        Ok(Self::Cors { origin })
    }

    fn headers(&self) -> Vec<(HeaderName, HeaderValue)> {
        match self {
            Self::Hardened => vec![
                (
                    CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
                ),
                (
                    REFERRER_POLICY,
                    HeaderValue::from_static("origin-when-cross-origin"),
                ),
                (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
                (X_FRAME_OPTIONS, HeaderValue::from_static("deny")),
                (X_XSS_PROTECTION, HeaderValue::from_static("0")),
            ],
            Self::Cors { origin } => vec![
                (ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone()),
                (
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(CORS_ALLOWED_METHODS),
                ),
                (
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static(CORS_ALLOWED_HEADERS),
                ),
                (
                    ACCESS_CONTROL_ALLOW_CREDENTIALS,
                    HeaderValue::from_static("true"),
                ),
            ],
        }
    }

    fn answers_preflight(&self) -> bool {
        matches!(self, Self::Cors { .. })
    }
}

/// Security header middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use movies::middleware::SecureHeaders;
///
/// let cors = SecureHeaders::cors("https://movies.example").expect("valid origin");
/// let _app = App::new().wrap(cors);
/// ```
#[derive(Debug, Clone)]
pub struct SecureHeaders {
    policy: Rc<HeaderPolicy>,
}

/// Raised when a CORS origin cannot be sent as a header value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CORS origin: {origin}")]
pub struct InvalidOrigin {
    origin: String,
}

impl SecureHeaders {
    pub fn new(policy: HeaderPolicy) -> Self {
        Self {
            policy: Rc::new(policy),
        }
    }

    /// Hardened browser headers.
    pub fn hardened() -> Self {
        Self::new(HeaderPolicy::Hardened)
    }

    /// CORS headers for `origin`.
    pub fn cors(origin: &str) -> Result<Self, InvalidOrigin> {
        HeaderPolicy::cors(origin).map(Self::new)
    }
}

fn apply(policy: &HeaderPolicy, headers: &mut HeaderMap) {
    for (name, value) in policy.headers() {
        headers.insert(name, value);
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecureHeaders
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SecureHeadersMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecureHeadersMiddleware {
            service,
            policy: Rc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`SecureHeaders`].
pub struct SecureHeadersMiddleware<S> {
    service: S,
    policy: Rc<HeaderPolicy>,
}

impl<S, B> Service<ServiceRequest> for SecureHeadersMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let policy = Rc::clone(&self.policy);

        if policy.answers_preflight() && req.method() == Method::OPTIONS {
            let mut res = req
                .into_response(HttpResponse::Ok().finish())
                .map_into_right_body();
            apply(&policy, res.headers_mut());
            return Box::pin(ready(Ok(res)));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            apply(&policy, res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}
