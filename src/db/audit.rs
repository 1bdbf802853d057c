//! Optional audit trail of health probes.
//!
//! `AuditedProbe` wraps another prober and appends one row per probe to the
//! `health_checks` table. The table is purely observational: the service
//! never reads it back, and a failed write never changes the probe result.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::types::Json;
use tokio::sync::OnceCell;

use super::probe::{HealthProbe, HealthStatus};

/// Endpoint recorded with each audit row
pub const AUDIT_ENDPOINT: &str = "/api/health";

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS health_checks (
    id SERIAL PRIMARY KEY,
    status VARCHAR(20) NOT NULL,
    response_time_ms INTEGER NOT NULL,
    endpoint VARCHAR(100) NOT NULL,
    details JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const INSERT_ROW: &str = "INSERT INTO health_checks (status, response_time_ms, endpoint, details) \
     VALUES ($1, $2, $3, $4)";

pub struct AuditedProbe<P> {
    inner: P,
    pool: PgPool,
    schema_ready: OnceCell<()>,
}

impl<P: HealthProbe> AuditedProbe<P> {
    pub fn new(inner: P, pool: PgPool) -> Self {
        Self {
            inner,
            pool,
            schema_ready: OnceCell::new(),
        }
    }

    /// Create the table once per process. A failure leaves the cell empty so
    /// the next probe tries again.
    async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
                tracing::debug!("health_checks table ready");
                Ok::<(), sqlx::Error>(())
            })
            .await?;
        Ok(())
    }

    async fn record(&self, status: &HealthStatus, response_time_ms: i32) -> Result<(), sqlx::Error> {
        self.ensure_schema().await?;
        sqlx::query(INSERT_ROW)
            .bind(audit_status(status))
            .bind(response_time_ms)
            .bind(AUDIT_ENDPOINT)
            .bind(Json(&status.details))
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<P: HealthProbe> HealthProbe for AuditedProbe<P> {
    async fn probe(&self) -> HealthStatus {
        let start = Instant::now();
        let status = self.inner.probe().await;
        let response_time_ms = i32::try_from(start.elapsed().as_millis()).unwrap_or(i32::MAX);

        // Failed checks are recorded too; the write itself may fail when
        // the database is down, which only logs.
        if let Err(e) = self.record(&status, response_time_ms).await {
            tracing::warn!(error = %e, "Failed to record health check audit row");
        }

        status
    }
}

/// Value stored in the `status` column
fn audit_status(status: &HealthStatus) -> &'static str {
    if status.connected {
        "ok"
    } else {
        "error"
    }
}
