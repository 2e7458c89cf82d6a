//! Tracing middleware attaching a request-scoped trace identifier and span.
//!
//! Each request adopts the inbound `X-Trace-ID` header when it is usable and
//! otherwise gets a fresh UUID. A `request` span is opened as a child of the
//! root span handed to [`Trace::new`], and both are stored as a
//! [`RequestContext`] in the request extensions for later middleware and
//! handlers. The context is also published to an enclosing
//! [`Recovery`](super::Recovery) layer when one is present.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, Span, error, info_span};

use super::recovery::RecoverySlot;
use crate::domain::{RequestContext, TRACE_ID_HEADER, TraceId};

/// Tracing middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use movies::Trace;
///
/// let root = tracing::info_span!("movies");
/// let _app = App::new().wrap(Trace::new(root));
/// ```
#[derive(Clone)]
pub struct Trace {
    root: Span,
}

impl Trace {
    /// Create the middleware; request spans become children of `root`.
    pub fn new(root: Span) -> Self {
        Self { root }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware {
            service,
            root: Rc::new(self.root.clone()),
        }))
    }
}

/// Service wrapper produced by [`Trace`].
pub struct TraceMiddleware<S> {
    service: S,
    root: Rc<Span>,
}

impl<S> TraceMiddleware<S> {
    fn request_span(&self, req: &ServiceRequest, trace_id: &TraceId) -> Span {
        let ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or_default()
            .to_owned();
        info_span!(
            parent: self.root.as_ref(),
            "request",
            trace_id = %trace_id,
            ip = %ip,
            proto = ?req.version(),
            method = %req.method(),
            uri = %req.uri(),
        )
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
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
        let inbound = req
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        let trace_id = TraceId::from_header_or_generate(inbound);
        let span = self.request_span(&req, &trace_id);
        let ctx = RequestContext::new(trace_id.clone(), span.clone());
        if let Some(slot) = req.extensions().get::<RecoverySlot>() {
            slot.publish(ctx.clone());
        }
        req.extensions_mut().insert(ctx);

        let fut = self.service.call(req);
        Box::pin(
            async move {
                let mut res = fut.await?;
                match HeaderValue::from_str(trace_id.as_str()) {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static("x-trace-id"), value);
                    }
                    Err(error) => {
                        error!(%error, "failed to encode trace identifier header");
                    }
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use uuid::Uuid;

    async fn echo_context(req: HttpRequest) -> HttpResponse {
        let trace_id = req
            .extensions()
            .get::<RequestContext>()
            .map(|ctx| ctx.trace_id().to_string())
            .unwrap_or_default();
        HttpResponse::Ok().body(trace_id)
    }

    async fn call(req: test::TestRequest) -> (String, String) {
        let app = test::init_service(
            App::new()
                .wrap(Trace::new(Span::none()))
                .route("/", web::get().to(echo_context)),
        )
        .await;
        let res = test::call_service(&app, req.uri("/").to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned();
        let body = test::read_body(res).await;
        let body = String::from_utf8(body.to_vec()).expect("utf8 body");
        (header, body)
    }

    #[actix_web::test]
    async fn generates_uuid_when_header_absent() {
        let (header, body) = call(test::TestRequest::get()).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(header, body);
    }

    #[actix_web::test]
    async fn adopts_inbound_trace_id() {
        let (header, body) =
            call(test::TestRequest::get().insert_header((TRACE_ID_HEADER, "client-trace-1"))).await;
        assert_eq!(header, "client-trace-1");
        assert_eq!(body, "client-trace-1");
    }

    #[actix_web::test]
    async fn replaces_unusable_inbound_trace_id() {
        let (header, _) =
            call(test::TestRequest::get().insert_header((TRACE_ID_HEADER, "two words"))).await;
        assert_ne!(header, "two words");
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[actix_web::test]
    async fn echoes_header_on_unmatched_routes() {
        let app = test::init_service(App::new().wrap(Trace::new(Span::none()))).await;
        let req = test::TestRequest::get().uri("/missing").to_request();
        let res = test::call_service(&app, req).await;
        assert!(res.headers().contains_key(TRACE_ID_HEADER));
    }
}
