//! Response logging middleware.
//!
//! Emits one `sending response` event per request inside the request span,
//! carrying the elapsed time and status code. Error responses also log the
//! unredacted error server-side. Requests without a [`RequestContext`] are
//! rejected as internal errors.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info};

use crate::domain::{self, RequestContext};

/// Response logging middleware factory.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResponseLog;

impl<S, B> Transform<S, ServiceRequest> for ResponseLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ResponseLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ResponseLogMiddleware { service }))
    }
}

/// Service wrapper produced by [`ResponseLog`].
pub struct ResponseLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ResponseLogMiddleware<S>
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
        let ctx = req.extensions().get::<RequestContext>().cloned();
        let Some(ctx) = ctx else {
            error!("request context missing; trace middleware must run first");
            let err = domain::Error::internal("request context missing");
            return Box::pin(ready(Err(err.into())));
        };

        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(async move {
            let result = fut.await;
            let duration = started.elapsed();
            let _entered = ctx.span().enter();
            match &result {
                Ok(res) => {
                    if let Some(err) = res.response().error() {
                        error!(error = %err, "request failed");
                    }
                    info!(?duration, status_code = res.status().as_u16(), "sending response");
                }
                Err(err) => {
                    let status = err.as_response_error().status_code();
                    error!(error = %err, "request failed");
                    info!(?duration, status_code = status.as_u16(), "sending response");
                }
            }
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::Trace;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use tracing::Span;

    #[actix_web::test]
    async fn passes_responses_through() {
        let app = test::init_service(
            App::new()
                .wrap(ResponseLog)
                .wrap(Trace::new(Span::none()))
                .route("/", web::get().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    #[actix_web::test]
    async fn passes_handler_errors_through() {
        let app = test::init_service(
            App::new()
                .wrap(ResponseLog)
                .wrap(Trace::new(Span::none()))
                .route(
                    "/",
                    web::get().to(|| async {
                        Err::<HttpResponse, _>(domain::Error::internal("db down"))
                    }),
                ),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn missing_context_is_an_internal_error() {
        let app = test::init_service(
            App::new()
                .wrap(ResponseLog)
                .route("/", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let err = test::try_call_service(&app, test::TestRequest::get().uri("/").to_request())
            .await
            .err()
            .expect("context is required");
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
