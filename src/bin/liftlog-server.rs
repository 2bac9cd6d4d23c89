// ABOUTME: Server binary entry point
// ABOUTME: Parses CLI flags, loads config, and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Fitness-tracking API server binary.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use liftlog::auth::AuthManager;
use liftlog::config::ServerConfig;
use liftlog::database::Database;
use liftlog::routes;
use liftlog::state::AppState;

#[derive(Parser)]
#[command(name = "liftlog-server", about = "Fitness tracking API server")]
struct Args {
    /// HTTP listen port (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database URL (overrides DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    let auth = AuthManager::new(config.jwt_secret.as_bytes(), config.token_expiry_hours);
    let state = Arc::new(AppState::new(database, auth));

    let app = routes::router(state);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "liftlog server listening");
    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
