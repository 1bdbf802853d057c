//! HTTP route handlers.
//!
//! All API responses are JSON. `/api/health` is marked `no-store` so no
//! intermediary caches a probe result. Unknown paths and unsupported methods
//! fall through to a structured 404.
//!
//! Every response carries an `x-request-id` header (see `crate::middleware`).

pub mod api_test;
pub mod fallback;
pub mod frontend;
pub mod health;
pub mod home;

use std::any::Any;

use axum::{middleware, response::Response, routing::get, Router};
use http::header::{HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use http::Method;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CorsConfig, CACHE_CONTROL_NO_STORE};
use crate::error::panic_response;
use crate::middleware::request_id_layer;
use crate::state::AppState;

pub const PATH_ROOT: &str = "/";
pub const PATH_TEST: &str = "/api/test";
pub const PATH_HEALTH: &str = "/api/health";
pub const PATH_APP: &str = "/app";

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let expose_details = !state.config.environment.is_production();
    let cors = cors_layer(&state.config.cors);

    // Health check - never cached, every call reprobes
    let health_routes = Router::new()
        .route(
            PATH_HEALTH,
            get(health::health).fallback(fallback::not_found),
        )
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let info_routes = Router::new()
        .route(PATH_ROOT, get(home::index).fallback(fallback::not_found))
        .route(PATH_TEST, get(api_test::api_test).fallback(fallback::not_found))
        .route(PATH_APP, get(frontend::page).fallback(fallback::not_found));

    Router::new()
        .merge(info_routes)
        .merge(health_routes)
        .fallback(fallback::not_found)
        .with_state(state)
        // Turns handler panics into a 500 JSON body instead of a dropped connection
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| -> Response {
                panic_response(panic, expose_details)
            },
        ))
        .layer(cors)
        // Outermost: span and x-request-id cover every response above
        .layer(middleware::from_fn(request_id_layer))
}

/// Cross-origin policy: listed origins only, credentials allowed.
///
/// Origins that are not valid header values are dropped with a warning.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
}
