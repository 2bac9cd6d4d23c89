// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Supports .env files for local development with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Server configuration from environment variables.

use std::env;

use anyhow::{Context, Result};

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// SQLite connection URL
    pub database_url: String,
    /// Secret used to sign access tokens
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub token_expiry_hours: i64,
}

impl ServerConfig {
    /// Load configuration from the environment, falling back to development
    /// defaults. A `.env` file is honored when present.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but not parseable
    pub fn from_env() -> Result<Self> {
        // Absent .env files are fine; only load errors matter.
        dotenvy::dotenv().ok();

        let http_port = match env::var("HTTP_PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT: {value}"))?,
            Err(_) => 8081,
        };

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./data/liftlog.db".to_owned());

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".to_owned());

        let token_expiry_hours = match env::var("TOKEN_EXPIRY_HOURS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid TOKEN_EXPIRY_HOURS: {value}"))?,
            Err(_) => 24,
        };

        Ok(Self {
            http_port,
            database_url,
            jwt_secret,
            token_expiry_hours,
        })
    }
}
