//! Catch-all for unknown paths and unsupported methods.

use axum::extract::OriginalUri;

use crate::error::AppError;

pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    tracing::debug!(%path, "No route matched");
    AppError::NotFound(path)
}
