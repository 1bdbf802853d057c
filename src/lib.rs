//! GymArt API - HTTP service with a database health check.
//!
//! Serves a small fixed set of JSON endpoints plus a one-page frontend. The
//! `/api/health` endpoint probes PostgreSQL through a shared connection pool
//! and maps the outcome to a status code.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
