//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::HealthProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The prober is injected here at startup rather than reached through a
/// global, so tests can hand the router a fake.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub prober: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Creates a new application state from the given configuration and prober.
    pub fn new(config: AppConfig, prober: Arc<dyn HealthProbe>) -> Self {
        Self {
            config: Arc::new(config),
            prober,
        }
    }
}
