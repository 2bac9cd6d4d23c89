// ABOUTME: Workout database operations with log entry management
// ABOUTME: Log entries are deleted and recreated on every update
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Workout database operations.
//!
//! A workout stores a date, a completion flag, an optional routine reference
//! and a list of log entries keyed by `(exercise, set_number)`. Entry updates
//! follow the same rule as routine units: delete everything, recreate from the
//! submitted payload.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Workout, WorkoutLogEntry};

/// Validated workout fields ready for persistence
#[derive(Debug, Clone)]
pub struct WorkoutData {
    pub date: NaiveDate,
    pub completed: bool,
    pub routine_id: Option<Uuid>,
    pub entries: Vec<LogEntryData>,
}

/// One validated log entry
#[derive(Debug, Clone)]
pub struct LogEntryData {
    pub exercise_id: Uuid,
    pub set_number: i64,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub time: Option<i64>,
    pub distance: Option<f64>,
}

/// Listing filters for workouts
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    /// Only workouts owned by this user
    pub owner: Option<Uuid>,
    /// Only workouts with this completion state
    pub completed: Option<bool>,
    /// Cap on returned rows
    pub limit: Option<u32>,
}

const WORKOUT_SELECT: &str = r"
    SELECT id, owner_id, date, completed, routine_id
    FROM workouts
";

impl Database {
    /// Create a workout with its log entries owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a database error if the operation fails
    pub async fn create_workout(&self, owner_id: Uuid, data: &WorkoutData) -> AppResult<Workout> {
        let id = Uuid::new_v4();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO workouts (id, owner_id, date, completed, routine_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(owner_id.to_string())
        .bind(data.date.to_string())
        .bind(data.completed)
        .bind(data.routine_id.map(|r| r.to_string()))
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;

        insert_log_entries(&mut tx, id, &data.entries).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit workout create: {e}")))?;

        self.get_workout(id)
            .await?
            .ok_or_else(|| AppError::internal("Workout missing after create"))
    }

    /// Replace a workout's fields and log entries. Ownership is checked by
    /// the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the workout does not exist, or a database error
    pub async fn update_workout(&self, workout_id: Uuid, data: &WorkoutData) -> AppResult<Workout> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE workouts SET date = $1, completed = $2, routine_id = $3
            WHERE id = $4
            ",
        )
        .bind(data.date.to_string())
        .bind(data.completed)
        .bind(data.routine_id.map(|r| r.to_string()))
        .bind(workout_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout {workout_id}")));
        }

        sqlx::query("DELETE FROM workout_log_entries WHERE workout_id = $1")
            .bind(workout_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear log entries: {e}")))?;

        insert_log_entries(&mut tx, workout_id, &data.entries).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit workout update: {e}")))?;

        self.get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))
    }

    /// Get a workout by ID with its log entries
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_workout(&self, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let query = format!("{WORKOUT_SELECT} WHERE id = $1");
        let row = sqlx::query(&query)
            .bind(workout_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        match row {
            Some(row) => {
                let mut workout = row_to_workout(&row)?;
                workout.log_entries = self.load_log_entries(workout.id).await?;
                Ok(Some(workout))
            }
            None => Ok(None),
        }
    }

    /// List workouts, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_workouts(&self, filter: &WorkoutFilter) -> AppResult<Vec<Workout>> {
        let mut sql = WORKOUT_SELECT.to_owned();
        let mut clauses = Vec::new();
        if filter.owner.is_some() {
            clauses.push("owner_id = $1");
        }
        if let Some(completed) = filter.completed {
            clauses.push(if completed {
                "completed = 1"
            } else {
                "completed = 0"
            });
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date DESC, created_at DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", i64::from(limit)));
        }

        let mut query = sqlx::query(&sql);
        if let Some(owner) = filter.owner {
            query = query.bind(owner.to_string());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        let mut workouts = Vec::with_capacity(rows.len());
        for row in rows {
            let mut workout = row_to_workout(&row)?;
            workout.log_entries = self.load_log_entries(workout.id).await?;
            workouts.push(workout);
        }
        Ok(workouts)
    }

    /// Delete a workout. Ownership is checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the workout does not exist
    pub async fn delete_workout(&self, workout_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(workout_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout {workout_id}")));
        }
        Ok(())
    }

    async fn load_log_entries(&self, workout_id: Uuid) -> AppResult<Vec<WorkoutLogEntry>> {
        let rows = sqlx::query(
            r"
            SELECT wle.exercise_id, wle.set_number, wle.reps, wle.weight,
                   wle.time, wle.distance, e.name AS exercise_name
            FROM workout_log_entries wle
            JOIN exercises e ON e.id = wle.exercise_id
            WHERE wle.workout_id = $1
            ORDER BY e.name, wle.set_number
            ",
        )
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load log entries: {e}")))?;

        rows.iter().map(row_to_log_entry).collect()
    }
}

fn row_to_workout(row: &SqliteRow) -> AppResult<Workout> {
    let id: String = row.get("id");
    let owner_id: String = row.get("owner_id");
    let date: String = row.get("date");
    let routine_id: Option<String> = row.get("routine_id");

    Ok(Workout {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::internal(format!("Failed to parse workout id UUID: {e}")))?,
        owner_id: Uuid::parse_str(&owner_id)
            .map_err(|e| AppError::internal(format!("Failed to parse owner id UUID: {e}")))?,
        date: date
            .parse()
            .map_err(|e| AppError::internal(format!("Failed to parse workout date: {e}")))?,
        completed: row.get("completed"),
        routine_id: routine_id
            .map(|r| Uuid::parse_str(&r))
            .transpose()
            .map_err(|e| AppError::internal(format!("Failed to parse routine id UUID: {e}")))?,
        log_entries: Vec::new(),
    })
}

fn row_to_log_entry(row: &SqliteRow) -> AppResult<WorkoutLogEntry> {
    let exercise_id: String = row.get("exercise_id");
    Ok(WorkoutLogEntry {
        exercise_id: Uuid::parse_str(&exercise_id)
            .map_err(|e| AppError::internal(format!("Failed to parse exercise id UUID: {e}")))?,
        exercise_name: row.get("exercise_name"),
        set_number: row.get("set_number"),
        reps: row.get("reps"),
        weight: row.get("weight"),
        time: row.get("time"),
        distance: row.get("distance"),
    })
}

async fn insert_log_entries(
    conn: &mut SqliteConnection,
    workout_id: Uuid,
    entries: &[LogEntryData],
) -> AppResult<()> {
    for entry in entries {
        sqlx::query(
            r"
            INSERT INTO workout_log_entries
                (workout_id, exercise_id, set_number, reps, weight, time, distance)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(workout_id.to_string())
        .bind(entry.exercise_id.to_string())
        .bind(entry.set_number)
        .bind(entry.reps)
        .bind(entry.weight)
        .bind(entry.time)
        .bind(entry.distance)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert log entry: {e}")))?;
    }
    Ok(())
}
