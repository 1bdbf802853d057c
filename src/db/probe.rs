//! Database liveness probe.
//!
//! A probe borrows one pooled connection, runs a trivial query and reports
//! the outcome as a `HealthStatus` value. Failures never escape as errors;
//! they are folded into `connected: false` with the error text and a short
//! code attached.

use std::io;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::PgPool;
use sqlx::{ConnectOptions, Connection};
use tokio::time::{timeout_at, Instant};

use crate::config::DatabaseTarget;

/// Liveness query. The timestamp column lets callers see server time.
const LIVENESS_QUERY: &str = "SELECT 1 AS ping, NOW() AS timestamp";

pub const MESSAGE_CONNECTED: &str = "Database connection successful";
pub const MESSAGE_FAILED: &str = "Database connection failed";

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub connected: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

/// Context attached to a probe result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthDetails {
    pub host: String,
    pub port: u16,
    pub database: String,
    /// Database server time, success only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Error text, failure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// SQLSTATE or transport error code, failure only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl HealthStatus {
    pub fn connected(target: &DatabaseTarget, timestamp: DateTime<Utc>) -> Self {
        Self {
            connected: true,
            message: MESSAGE_CONNECTED.to_string(),
            details: Some(HealthDetails {
                host: target.host.clone(),
                port: target.port,
                database: target.database.clone(),
                timestamp: Some(timestamp),
                error: None,
                code: None,
            }),
        }
    }

    pub fn failed(target: &DatabaseTarget, error: String, code: Option<String>) -> Self {
        Self {
            connected: false,
            message: MESSAGE_FAILED.to_string(),
            details: Some(HealthDetails {
                host: target.host.clone(),
                port: target.port,
                database: target.database.clone(),
                timestamp: None,
                error: Some(error),
                code,
            }),
        }
    }
}

/// Something that can report downstream health on demand.
///
/// The HTTP layer only sees this trait, so tests can swap in a fake.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Run one check. Must not panic on connectivity errors and must not retry.
    async fn probe(&self) -> HealthStatus;
}

/// Probe backed by the shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgHealthProbe {
    pool: PgPool,
    target: DatabaseTarget,
}

impl PgHealthProbe {
    pub fn new(pool: PgPool, target: DatabaseTarget) -> Self {
        Self { pool, target }
    }

    pub fn target(&self) -> &DatabaseTarget {
        &self.target
    }

    /// Borrow a connection, run the liveness query, give the connection back.
    ///
    /// The `PoolConnection` guard returns the connection to the pool when it
    /// drops, on both the success and the error path. The whole call shares
    /// one `acquire_timeout` budget.
    async fn ping(&self) -> Result<DateTime<Utc>, sqlx::Error> {
        let deadline = Instant::now() + self.pool.options().get_acquire_timeout();

        if self.pool.size() == 0 && !self.pool.is_closed() {
            self.connect_once(deadline).await?;
        }

        let mut conn = timeout_at(deadline, self.pool.acquire())
            .await
            .map_err(|_| sqlx::Error::PoolTimedOut)??;
        let (_ping, timestamp): (i32, DateTime<Utc>) =
            sqlx::query_as(LIVENESS_QUERY).fetch_one(&mut *conn).await?;
        Ok(timestamp)
    }

    /// Single direct connection attempt for an empty pool.
    ///
    /// `acquire()` on an empty pool keeps reconnecting until its timeout and
    /// then reports `PoolTimedOut`, hiding a refused or rejected connection.
    /// Going around the pool once surfaces the driver's own error.
    async fn connect_once(&self, deadline: Instant) -> Result<(), sqlx::Error> {
        let options = self.pool.connect_options();
        let conn = timeout_at(deadline, options.connect()).await.map_err(|_| {
            sqlx::Error::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "timed out connecting to database",
            ))
        })??;
        if let Err(e) = conn.close().await {
            tracing::debug!(error = %e, "Closing direct connection failed");
        }
        Ok(())
    }
}

#[async_trait]
impl HealthProbe for PgHealthProbe {
    async fn probe(&self) -> HealthStatus {
        tracing::debug!(
            host = %self.target.host,
            port = self.target.port,
            database = %self.target.database,
            "Testing database connection"
        );

        match self.ping().await {
            Ok(timestamp) => {
                tracing::info!(database = %self.target.database, "Database ping successful");
                HealthStatus::connected(&self.target, timestamp)
            }
            Err(e) => {
                let code = error_code(&e);
                tracing::error!(
                    error = %e,
                    code = code.as_deref().unwrap_or("-"),
                    host = %self.target.host,
                    port = self.target.port,
                    "Database ping failed"
                );
                HealthStatus::failed(&self.target, e.to_string(), code)
            }
        }
    }
}

/// Short, stable code for a probe failure.
pub(crate) fn error_code(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.code().map(|code| code.into_owned()),
        sqlx::Error::PoolTimedOut => Some("POOL_TIMEOUT".to_string()),
        sqlx::Error::PoolClosed => Some("POOL_CLOSED".to_string()),
        sqlx::Error::Io(e) => Some(io_error_code(e).to_string()),
        sqlx::Error::Tls(_) => Some("TLS_ERROR".to_string()),
        _ => None,
    }
}

fn io_error_code(err: &io::Error) -> &'static str {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => "ECONNREFUSED",
        io::ErrorKind::TimedOut => "ETIMEDOUT",
        io::ErrorKind::ConnectionReset => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        _ => "IO_ERROR",
    }
}
