//! Service description at the root path.

use axum::{extract::State, Json};
use serde::Serialize;

use super::{PATH_HEALTH, PATH_TEST};
use crate::config::{SERVICE_DESCRIPTION, SERVICE_NAME, SERVICE_VERSION};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub description: &'static str,
    pub environment: &'static str,
    pub endpoints: [&'static str; 2],
}

pub async fn index(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: SERVICE_VERSION,
        status: "running",
        description: SERVICE_DESCRIPTION,
        environment: state.config.environment.as_str(),
        endpoints: [PATH_TEST, PATH_HEALTH],
    })
}
