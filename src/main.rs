//! GymArt API entry point.
//!
//! Loads `.env` and configuration, initializes tracing, builds the lazy
//! PostgreSQL pool and health prober, sets up the Axum router and serves it
//! until a termination signal arrives. The pool is closed after the server
//! has drained.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gymart_api::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use gymart_api::db::{self, HealthProbe, PgHealthProbe};
use gymart_api::http::start_server;
use gymart_api::{create_router, AppState};

/// GymArt API: JSON endpoints and a database health check
#[derive(Parser, Debug)]
#[command(name = "gymart-api", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level filter (e.g., "gymart_api=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside local development
    let _ = dotenv::dotenv();

    let args = Args::parse();

    let config_path = args.config.or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });
    let config = AppConfig::load(config_path.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging.format);

    tracing::info!(
        config_file = ?config_path,
        environment = config.environment.as_str(),
        "Loaded configuration"
    );
    tracing::info!(database = ?config.database, "Database configuration");
    tracing::info!(origins = ?config.cors.allowed_origins, "CORS allowed origins");

    let pool = db::create_pool(&config.database, config.environment)?;
    let prober = db::build_prober(pool.clone(), &config.database, config.environment)?;

    // Startup connectivity check: logged, never fatal, never audited
    let startup_probe = PgHealthProbe::new(pool.clone(), config.database.target(config.environment)?);
    tokio::spawn(async move {
        let status = startup_probe.probe().await;
        if status.connected {
            tracing::info!("Connected to PostgreSQL database");
        } else {
            tracing::error!("Error connecting to PostgreSQL, serving with degraded health");
        }
    });

    let state = AppState::new(config.clone(), prober);
    let app = create_router(state);

    let served = start_server(app, &config.http).await;

    pool.close().await;
    tracing::info!("Database pool closed");

    served?;
    Ok(())
}

fn init_tracing(filter: &str, format: &str) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
