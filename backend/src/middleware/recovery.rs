//! Panic recovery middleware.
//!
//! Converts a panic raised while calling or polling the downstream service
//! into `500 {"error":"Internal Server Error"}` with `Connection: close`. The
//! worker survives and keeps serving later requests.
//!
//! The downstream request is consumed by the panicking call, so the recovery
//! layer leaves a [`RecoverySlot`] in the request extensions. [`Trace`]
//! publishes the request context into it, which lets the recovered response
//! echo the trace id and log inside the request span.
//!
//! [`Trace`]: super::Trace

use std::any::Any;
use std::cell::OnceCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::HeaderValue;
use actix_web::{Error, HttpMessage, HttpResponse, ResponseError};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde_json::json;
use tracing::error;

use crate::domain::{RequestContext, TRACE_ID_HEADER};

/// Request context handed back to the recovery layer.
#[derive(Clone, Default)]
pub struct RecoverySlot(Rc<OnceCell<RequestContext>>);

impl RecoverySlot {
    /// Record the request context; later calls are ignored.
    pub fn publish(&self, ctx: RequestContext) {
        let _ = self.0.set(ctx);
    }

    fn get(&self) -> Option<&RequestContext> {
        self.0.get()
    }
}

/// Error standing in for a panicked request.
#[derive(Debug)]
pub struct RecoveredPanic {
    message: String,
    trace_id: Option<String>,
}

impl fmt::Display for RecoveredPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recovered from panic: {}", self.message)
    }
}

impl ResponseError for RecoveredPanic {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::InternalServerError();
        builder.force_close();
        if let Some(value) = self
            .trace_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            builder.insert_header((TRACE_ID_HEADER, value));
        }
        builder.json(json!({ "error": "Internal Server Error" }))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn recover(slot: &RecoverySlot, payload: &(dyn Any + Send)) -> Error {
    let message = panic_message(payload);
    let ctx = slot.get();
    match ctx {
        Some(ctx) => ctx
            .span()
            .in_scope(|| error!(panic = message, "recovered from panic")),
        None => error!(panic = message, "recovered from panic"),
    }

    RecoveredPanic {
        message: message.to_owned(),
        trace_id: ctx.map(|ctx| ctx.trace_id().to_string()),
    }
    .into()
}

/// Panic recovery middleware factory. Register it outermost.
#[derive(Clone, Copy, Debug, Default)]
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RecoveryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryMiddleware { service }))
    }
}

/// Service wrapper produced by [`Recovery`].
pub struct RecoveryMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RecoveryMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let slot = RecoverySlot::default();
        req.extensions_mut().insert(slot.clone());

        let fut = match catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => return Box::pin(ready(Err(recover(&slot, payload.as_ref())))),
        };

        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(recover(&slot, payload.as_ref())),
            }
        })
    }
}
