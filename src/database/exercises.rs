// ABOUTME: Exercise database operations with tag, tutorial, and muscle relations
// ABOUTME: Tags and links are global and deduplicated through get-or-create
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Exercise database operations.
//!
//! Exercises reference shared tag/tutorial/muscle rows through join tables.
//! Tags and tutorial links are global and deduplicated by natural key, so
//! writes go through get-or-create; muscles are a closed enumeration and are
//! only ever looked up.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::Database;
use crate::errors::{is_unique_violation, AppError, AppResult, ValidationErrors};
use crate::models::{Exercise, ExerciseKind, Muscle};

/// Validated exercise fields ready for persistence
#[derive(Debug, Clone)]
pub struct ExerciseData {
    pub name: String,
    pub kind: ExerciseKind,
    pub instructions: String,
    pub tags: Vec<String>,
    pub tutorials: Vec<String>,
    pub muscles: Vec<Muscle>,
}

/// Listing filters for exercises
#[derive(Debug, Clone, Copy, Default)]
pub struct ExerciseFilter {
    /// Only exercises owned by this user
    pub owner: Option<Uuid>,
    /// Only exercises NOT owned by this user (discover view)
    pub exclude_owner: Option<Uuid>,
    /// Cap on returned rows
    pub limit: Option<u32>,
}

const EXERCISE_SELECT: &str = r"
    SELECT e.id, e.name, e.kind, e.instructions, e.owner_id, e.forks_count,
           u.username AS owner_username
    FROM exercises e
    JOIN users u ON u.id = e.owner_id
";

impl Database {
    /// Create a new exercise owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error if the owner already has an exercise with
    /// this name, or a database error if the operation fails.
    pub async fn create_exercise(&self, owner_id: Uuid, data: &ExerciseData) -> AppResult<Exercise> {
        let id = Uuid::new_v4();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let insert = sqlx::query(
            r"
            INSERT INTO exercises (id, name, kind, instructions, owner_id, forks_count, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            ",
        )
        .bind(id.to_string())
        .bind(&data.name)
        .bind(data.kind.as_str())
        .bind(&data.instructions)
        .bind(owner_id.to_string())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e) {
                return Err(AppError::validation(ValidationErrors::single(
                    "name",
                    "You already own this exercise.",
                )));
            }
            return Err(AppError::database(format!("Failed to create exercise: {e}")));
        }

        attach_exercise_relations(&mut *tx, id, data).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exercise create: {e}")))?;

        self.get_exercise(id)
            .await?
            .ok_or_else(|| AppError::internal("Exercise missing after create"))
    }

    /// Replace an exercise's fields and relations. Ownership is checked by
    /// the caller; relations are cleared and re-attached as a unit.
    ///
    /// # Errors
    ///
    /// Returns a validation error on a name collision, `NotFound` if the
    /// exercise does not exist, or a database error.
    pub async fn update_exercise(&self, exercise_id: Uuid, data: &ExerciseData) -> AppResult<Exercise> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let update = sqlx::query(
            r"
            UPDATE exercises SET name = $1, kind = $2, instructions = $3
            WHERE id = $4
            ",
        )
        .bind(&data.name)
        .bind(data.kind.as_str())
        .bind(&data.instructions)
        .bind(exercise_id.to_string())
        .execute(&mut *tx)
        .await;

        match update {
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::validation(ValidationErrors::single(
                    "name",
                    "You already own this exercise.",
                )));
            }
            Err(e) => {
                return Err(AppError::database(format!("Failed to update exercise: {e}")));
            }
            Ok(result) if result.rows_affected() == 0 => {
                return Err(AppError::not_found(format!("Exercise {exercise_id}")));
            }
            Ok(_) => {}
        }

        clear_exercise_relations(&mut *tx, exercise_id).await?;
        attach_exercise_relations(&mut *tx, exercise_id, data).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exercise update: {e}")))?;

        self.get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))
    }

    /// Get an exercise by ID with its tag/tutorial/muscle associations
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_exercise(&self, exercise_id: Uuid) -> AppResult<Option<Exercise>> {
        let query = format!("{EXERCISE_SELECT} WHERE e.id = $1");
        let row = sqlx::query(&query)
            .bind(exercise_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        match row {
            Some(row) => {
                let mut exercise = row_to_exercise(&row)?;
                self.load_exercise_relations(&mut exercise).await?;
                Ok(Some(exercise))
            }
            None => Ok(None),
        }
    }

    /// List exercises with optional ownership filters, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_exercises(&self, filter: &ExerciseFilter) -> AppResult<Vec<Exercise>> {
        let mut sql = EXERCISE_SELECT.to_owned();
        if filter.owner.is_some() {
            sql.push_str(" WHERE e.owner_id = $1");
        } else if filter.exclude_owner.is_some() {
            sql.push_str(" WHERE e.owner_id != $1");
        }
        sql.push_str(" ORDER BY e.created_at DESC, e.id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", i64::from(limit)));
        }

        let mut query = sqlx::query(&sql);
        if let Some(owner) = filter.owner.or(filter.exclude_owner) {
            query = query.bind(owner.to_string());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        let mut exercises = Vec::with_capacity(rows.len());
        for row in rows {
            let mut exercise = row_to_exercise(&row)?;
            self.load_exercise_relations(&mut exercise).await?;
            exercises.push(exercise);
        }
        Ok(exercises)
    }

    /// Delete an exercise. Ownership is checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the exercise does not exist
    pub async fn delete_exercise(&self, exercise_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM exercises WHERE id = $1")
            .bind(exercise_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete exercise: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Exercise {exercise_id}")));
        }
        Ok(())
    }

    /// True if `user_id` already owns an exercise with this name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn user_owns_exercise_named(&self, user_id: Uuid, name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM exercises WHERE owner_id = $1 AND name = $2",
        )
        .bind(user_id.to_string())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check exercise ownership: {e}")))?;

        Ok(count > 0)
    }

    /// Total number of stored exercises
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn count_exercises(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count exercises: {e}")))
    }

    async fn load_exercise_relations(&self, exercise: &mut Exercise) -> AppResult<()> {
        let id = exercise.id.to_string();

        exercise.tags = sqlx::query_scalar(
            r"
            SELECT t.name FROM tags t
            JOIN exercise_tags et ON et.tag_id = t.id
            WHERE et.exercise_id = $1
            ORDER BY t.name
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load exercise tags: {e}")))?;

        exercise.tutorials = sqlx::query_scalar(
            r"
            SELECT l.url FROM youtube_links l
            JOIN exercise_tutorials et ON et.link_id = l.id
            WHERE et.exercise_id = $1
            ORDER BY l.url
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load exercise tutorials: {e}")))?;

        exercise.muscles = sqlx::query_scalar(
            r"
            SELECT muscle_code FROM exercise_muscles
            WHERE exercise_id = $1
            ORDER BY muscle_code
            ",
        )
        .bind(&id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load exercise muscles: {e}")))?;

        Ok(())
    }
}

pub(super) fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let id: String = row.get("id");
    let kind: String = row.get("kind");
    let owner_id: String = row.get("owner_id");

    Ok(Exercise {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::internal(format!("Failed to parse exercise id UUID: {e}")))?,
        name: row.get("name"),
        kind: ExerciseKind::parse(&kind)
            .ok_or_else(|| AppError::internal(format!("Unknown exercise kind: {kind}")))?,
        instructions: row.get("instructions"),
        owner_id: Uuid::parse_str(&owner_id)
            .map_err(|e| AppError::internal(format!("Failed to parse owner id UUID: {e}")))?,
        owner_username: row.get("owner_username"),
        forks_count: row.get("forks_count"),
        tags: Vec::new(),
        tutorials: Vec::new(),
        muscles: Vec::new(),
    })
}

/// Get or create a tag by name, returning its id. Insert-then-select keeps
/// the operation race-safe under the unique index on `name`.
pub(super) async fn get_or_create_tag(conn: &mut SqliteConnection, name: &str) -> AppResult<String> {
    sqlx::query("INSERT OR IGNORE INTO tags (id, name) VALUES ($1, $2)")
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to create tag: {e}")))?;

    sqlx::query_scalar("SELECT id FROM tags WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))
}

/// Get or create a tutorial link by URL, returning its id
pub(super) async fn get_or_create_link(conn: &mut SqliteConnection, url: &str) -> AppResult<String> {
    sqlx::query("INSERT OR IGNORE INTO youtube_links (id, url) VALUES ($1, $2)")
        .bind(Uuid::new_v4().to_string())
        .bind(url)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to create youtube link: {e}")))?;

    sqlx::query_scalar("SELECT id FROM youtube_links WHERE url = $1")
        .bind(url)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to get youtube link: {e}")))
}

pub(super) async fn attach_exercise_relations(
    conn: &mut SqliteConnection,
    exercise_id: Uuid,
    data: &ExerciseData,
) -> AppResult<()> {
    let exercise_id = exercise_id.to_string();

    for tag in &data.tags {
        let tag_id = get_or_create_tag(conn, tag).await?;
        sqlx::query("INSERT OR IGNORE INTO exercise_tags (exercise_id, tag_id) VALUES ($1, $2)")
            .bind(&exercise_id)
            .bind(&tag_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to attach tag: {e}")))?;
    }

    for url in &data.tutorials {
        let link_id = get_or_create_link(conn, url).await?;
        sqlx::query(
            "INSERT OR IGNORE INTO exercise_tutorials (exercise_id, link_id) VALUES ($1, $2)",
        )
        .bind(&exercise_id)
        .bind(&link_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to attach tutorial: {e}")))?;
    }

    for muscle in &data.muscles {
        sqlx::query(
            "INSERT OR IGNORE INTO exercise_muscles (exercise_id, muscle_code) VALUES ($1, $2)",
        )
        .bind(&exercise_id)
        .bind(muscle.code())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to attach muscle: {e}")))?;
    }

    Ok(())
}

pub(super) async fn clear_exercise_relations(
    conn: &mut SqliteConnection,
    exercise_id: Uuid,
) -> AppResult<()> {
    let exercise_id = exercise_id.to_string();
    for table in ["exercise_tags", "exercise_tutorials", "exercise_muscles"] {
        let sql = format!("DELETE FROM {table} WHERE exercise_id = $1");
        sqlx::query(&sql)
            .bind(&exercise_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear {table}: {e}")))?;
    }
    Ok(())
}
