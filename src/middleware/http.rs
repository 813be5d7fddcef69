//! HTTP-level middleware (cross-cutting concerns).
//!
//! Applied once around the whole router:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Access logging / request tracing (TraceLayer)
//! - Panic capture, answered with an Unclassified problem
//! - Body size limit (oversized JSON bodies become MalformedBody)
//!
//! No timeouts: the service has no cancellation semantics beyond token expiry.

use std::any::Any;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::HeaderName;
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::error::AppError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router, max_body_bytes: usize) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response));

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(layers)
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::Unclassified(message).into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::error::{FailureKind, PROBLEM_CONTENT_TYPE};

    async fn boom() -> &'static str {
        panic!("boom\n   at frame 0")
    }

    #[tokio::test]
    async fn panicking_handler_becomes_an_unclassified_problem() {
        let app = apply(Router::new().route("/boom", get(boom)), 1024);
        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.extensions().get::<FailureKind>(),
            Some(&FailureKind::Unclassified)
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PROBLEM_CONTENT_TYPE
        );
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["title"], "Internal server error");
        assert_eq!(body["status"], 500);
        assert_eq!(body["detail"], "boom");
    }
}
