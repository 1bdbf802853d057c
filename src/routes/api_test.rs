//! Static smoke-test endpoint that never touches the database.

use axum::Json;
use serde::Serialize;

use super::PATH_TEST;
use crate::error::now_rfc3339;

#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub ok: bool,
    pub status: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub endpoint: &'static str,
}

pub async fn api_test() -> Json<TestResponse> {
    Json(TestResponse {
        ok: true,
        status: "success",
        message: "API is working correctly!",
        timestamp: now_rfc3339(),
        endpoint: PATH_TEST,
    })
}
