// ABOUTME: SQLite connection pool setup and embedded migrations
// ABOUTME: Entity operations extend the Database handle from per-entity files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! SQLite persistence layer.
//!
//! One `Database` handle wraps the connection pool; entity operations live in
//! per-entity files that extend it with `impl Database` blocks. Schema setup
//! runs through migrations embedded at compile time from `./migrations`.

/// Exercise storage, tag/tutorial get-or-create, ownership lookups
pub mod exercises;
/// Fork engine: transactional deep copy of exercises and routines
pub mod forks;
/// Routine storage with clear-and-recreate unit replacement
pub mod routines;
/// User account storage
pub mod users;
/// Workout storage with delete-and-recreate log entries
pub mod workouts;

pub use exercises::{ExerciseData, ExerciseFilter};
pub use routines::{RoutineData, RoutineFilter, RoutineUnitData};
pub use workouts::{LogEntryData, WorkoutData, WorkoutFilter};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and run pending migrations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database URL is invalid or malformed
    /// - The connection fails
    /// - The migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:") && !database_url.contains(":memory:") {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // An in-memory SQLite database is private to its connection, so the
        // pool must never open a second one.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run all pending migrations embedded from `./migrations`
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails or the connection is lost
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed");
        Ok(())
    }

    /// Get a reference to the pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
