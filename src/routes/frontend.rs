//! Single-page health check frontend.
//!
//! The page is compiled into the binary and calls `/api/health` on the same
//! origin, so it needs no CORS setup of its own.

use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub async fn page() -> Html<&'static str> {
    Html(INDEX_HTML)
}
