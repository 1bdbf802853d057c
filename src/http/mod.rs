//! HTTP server module.
//!
//! Binds the listener, serves the router, and handles graceful shutdown on
//! SIGTERM/SIGINT. TLS is expected to terminate in front of the service.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
