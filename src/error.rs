//! Request-path errors and their JSON bodies.
//!
//! Every error a client can see is rendered as `{"status": "error", "message": ...}`
//! with a few optional fields. Internal details are only included when the
//! caller opts in, which the router does outside production.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database connection failed")]
    DatabaseUnavailable,

    #[error("Endpoint not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body shared by every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseUnavailable | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Render the error, including the underlying message for internal errors
    /// only when `expose_details` is set.
    pub fn into_response_with(self, expose_details: bool) -> Response {
        let status = self.status_code();
        let body = match self {
            AppError::DatabaseUnavailable => ErrorBody {
                status: "error",
                message: "Database connection failed",
                path: None,
                error: None,
                timestamp: None,
            },
            AppError::NotFound(path) => ErrorBody {
                status: "error",
                message: "Endpoint not found",
                path: Some(path),
                error: None,
                timestamp: Some(now_rfc3339()),
            },
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                ErrorBody {
                    status: "error",
                    message: "Internal server error",
                    path: None,
                    error: expose_details.then_some(detail),
                    timestamp: Some(now_rfc3339()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}

/// Convert a caught handler panic into a 500 JSON response.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, expose_details: bool) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    AppError::Internal(detail).into_response_with(expose_details)
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_database_unavailable_body_is_exact() {
        let response = AppError::DatabaseUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"status": "error", "message": "Database connection failed"})
        );
    }

    #[tokio::test]
    async fn test_not_found_echoes_path() {
        let response = AppError::NotFound("/nonexistent?x=1".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Endpoint not found");
        assert_eq!(json["path"], "/nonexistent?x=1");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_internal_detail_hidden_by_default() {
        let response = AppError::Internal("secret stack".to_string()).into_response();
        let json = body_json(response).await;
        assert_eq!(json["message"], "Internal server error");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_internal_detail_exposed_when_requested() {
        let response = AppError::Internal("boom".to_string()).into_response_with(true);
        let json = body_json(response).await;
        assert_eq!(json["error"], "boom");
    }

    #[tokio::test]
    async fn test_panic_payloads() {
        let response = panic_response(Box::new("static str panic"), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "static str panic");

        let response = panic_response(Box::new(String::from("owned panic")), true);
        assert_eq!(body_json(response).await["error"], "owned panic");

        let response = panic_response(Box::new(42_u8), true);
        assert_eq!(body_json(response).await["error"], "handler panicked");
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = now_rfc3339();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert!(ts.ends_with('Z'));
    }
}
