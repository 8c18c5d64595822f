//! Letrero: a MySQL-backed message page.
//!
//! This is the application entry point. It loads configuration from a TOML
//! file plus `DB_*` environment overrides, initializes tracing, blocks on
//! the database readiness gate, creates the connection pool, sets up the
//! Axum router, and starts the HTTP server.

mod config;
mod db;
mod error;
mod middleware;
mod routes;
mod shutdown;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use db::MySqlMessageRepository;
use routes::create_router;
use state::AppState;
use templates::init_templates;

/// Letrero: a web page that displays a message stored in MySQL
#[derive(Parser, Debug)]
#[command(name = "letrero", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "letrero=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (file is optional; DB_* environment variables win)
    dotenvy::dotenv().ok();
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        host = %config.database.host,
        database = %config.database.name,
        format = ?config.ui.format,
        "Loaded configuration"
    );

    // Initialize Tera templates
    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    // Readiness gate: block until the database accepts a connection,
    // before the listener binds
    db::wait_for_database(&config.database).await;

    // Create the connection pool and repository
    let pool = db::create_pool(&config.database).await?;
    let messages = Arc::new(MySqlMessageRepository::new(pool));

    // Create application state
    let state = AppState::new(config.clone(), tera, messages);

    // Create router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .expect("Invalid http.host or http.port in config");
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    Ok(())
}
