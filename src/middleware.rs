//! Per-request tracing span and `x-request-id` header.
//!
//! Every log line emitted while a request is in flight carries the same
//! UUID, and the client gets that UUID back so a bug report can be matched
//! to the server logs.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

/// Response header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request extension; handlers can extract it to tag their own output.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Opens the `request` span, logs completion, stamps the id header.
///
/// Installed as the outermost layer in `create_router`, so CORS and panic
/// responses are inside the span and get the header as well.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let id = RequestId(Uuid::new_v4());
    request.extensions_mut().insert(id);

    let span = tracing::info_span!(
        "request",
        request_id = %id.0,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let started = Instant::now();
    async move {
        let mut response = next.run(request).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let status = response.status().as_u16();
        tracing::Span::current().record("duration_ms", elapsed_ms);
        if response.status().is_server_error() {
            tracing::warn!(status, duration_ms = elapsed_ms, "Request failed");
        } else {
            tracing::info!(status, duration_ms = elapsed_ms, "Request completed");
        }

        // A hyphenated UUID is always a valid header value
        if let Ok(value) = HeaderValue::from_str(&id.0.hyphenated().to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Extension, Router};
    use tower::util::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/id",
                get(|Extension(id): Extension<RequestId>| async move { id.0.to_string() }),
            )
            .route(
                "/boom",
                get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .layer(axum::middleware::from_fn(request_id_layer))
    }

    fn get_request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_header_matches_id_seen_by_handler() {
        let response = app().oneshot(get_request("/id")).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER].to_str().unwrap().to_string();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(header, String::from_utf8(body.to_vec()).unwrap());
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn test_error_and_unrouted_responses_get_header() {
        let response = app().oneshot(get_request("/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let response = app().oneshot(get_request("/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_each_request_gets_a_fresh_id() {
        let first = app().oneshot(get_request("/id")).await.unwrap();
        let second = app().oneshot(get_request("/id")).await.unwrap();
        assert_ne!(
            first.headers()[REQUEST_ID_HEADER],
            second.headers()[REQUEST_ID_HEADER]
        );
    }
}
