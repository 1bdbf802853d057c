//! PostgreSQL connection pool and health probing.
//!
//! The pool is created once at startup and handed to the prober; nothing in
//! this module holds global state. Connections are opened lazily so the
//! service comes up even when the database is down.

mod audit;
mod probe;

pub use audit::AuditedProbe;
pub use probe::{HealthDetails, HealthProbe, HealthStatus, PgHealthProbe};

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::{ConfigError, DatabaseConfig, Environment};

/// Build the process-wide connection pool.
///
/// No connection is attempted here; the first acquire opens one.
pub fn create_pool(config: &DatabaseConfig, environment: Environment) -> Result<PgPool, ConfigError> {
    let options = config.connect_options(environment)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(0)
        .idle_timeout(Some(config.idle_timeout()))
        .acquire_timeout(config.connect_timeout())
        .connect_lazy_with(options);

    tracing::debug!(
        max_connections = config.max_connections,
        idle_timeout_secs = config.idle_timeout_seconds,
        connect_timeout_ms = config.connect_timeout_ms,
        "Created lazy PostgreSQL pool"
    );

    Ok(pool)
}

/// Build the prober the HTTP layer talks to, wrapping it in the audit
/// decorator when `audit_health_checks` is set.
pub fn build_prober(
    pool: PgPool,
    config: &DatabaseConfig,
    environment: Environment,
) -> Result<Arc<dyn HealthProbe>, ConfigError> {
    let target = config.target(environment)?;
    let probe = PgHealthProbe::new(pool.clone(), target);

    if config.audit_health_checks {
        tracing::info!("Health check audit logging enabled");
        Ok(Arc::new(AuditedProbe::new(probe, pool)))
    } else {
        Ok(Arc::new(probe))
    }
}
