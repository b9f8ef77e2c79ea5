//! deedlog-server - HTTP API for the deedlog bad-deed tracker
//!
//! Serves the record/list/stats endpoints over a single SQLite database.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/deedlog/deeds.db (~/.local/share/deedlog/deeds.db)
//! - Logs: $XDG_STATE_HOME/deedlog/deedlog.log (~/.local/state/deedlog/deedlog.log)
//! - Config: $XDG_CONFIG_HOME/deedlog/config.toml (~/.config/deedlog/config.toml)

use anyhow::{Context, Result};
use clap::Parser;
use deedlog_core::{Config, Database};
use deedlog_server::routes;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "deedlog-server")]
#[command(about = "HTTP API server for the deedlog bad-deed tracker")]
#[command(version)]
struct Args {
    /// Bind address (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Database file (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        deedlog_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("deedlog-server starting");

    // Open database
    let db_path = args.db.unwrap_or_else(|| config.resolve_database_path());
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    // Bind and serve
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("invalid bind address")?;

    let app = routes::router(Arc::new(db));

    tracing::info!("deedlog API listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
