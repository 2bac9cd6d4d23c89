// ABOUTME: Fork engine: transactional deep copy of exercises and routines
// ABOUTME: Copies relations from a static descriptor list and bumps fork counters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Fork engine: transactional deep copy of exercises and routines.
//!
//! Forking copies an entity into the caller's account and bumps the
//! original's fork counter. Everything runs in one transaction so a
//! mid-fork failure leaves both counters and copies untouched. A fork is
//! refused when the caller already owns an entity with the same name, which
//! also covers forking your own entity.

use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::Database;
use crate::errors::{is_unique_violation, AppError, AppResult};
use crate::models::{Exercise, Routine};

/// One exercise relation copied verbatim during a fork
struct CopyRelation {
    join_table: &'static str,
    fk_column: &'static str,
}

/// Every exercise join table the fork engine copies. Adding a relation to
/// the schema means adding a row here.
const EXERCISE_COPY_RELATIONS: &[CopyRelation] = &[
    CopyRelation {
        join_table: "exercise_tags",
        fk_column: "tag_id",
    },
    CopyRelation {
        join_table: "exercise_tutorials",
        fk_column: "link_id",
    },
    CopyRelation {
        join_table: "exercise_muscles",
        fk_column: "muscle_code",
    },
];

impl Database {
    /// Fork an exercise into `new_owner`'s account
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the exercise does not exist, `NameCollision` if
    /// the new owner already has an exercise with this name, or a database
    /// error.
    pub async fn fork_exercise(&self, exercise_id: Uuid, new_owner: Uuid) -> AppResult<Exercise> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let copy_id = fork_exercise_in_tx(&mut tx, exercise_id, new_owner).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit exercise fork: {e}")))?;

        self.get_exercise(copy_id)
            .await?
            .ok_or_else(|| AppError::internal("Exercise missing after fork"))
    }

    /// Fork a routine into `new_owner`'s account.
    ///
    /// Each unit resolves to an exercise the new owner already has with the
    /// same name, or forks the unit's exercise first. Unit order, sets and
    /// instructions carry over unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the routine does not exist, `NameCollision` if
    /// the new owner already has a routine with this name, or a database
    /// error.
    pub async fn fork_routine(&self, routine_id: Uuid, new_owner: Uuid) -> AppResult<Routine> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let source = sqlx::query(
            "SELECT name, kind, instructions FROM routines WHERE id = $1",
        )
        .bind(routine_id.to_string())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to load routine: {e}")))?
        .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;

        let name: String = source.get("name");
        let kind: String = source.get("kind");
        let instructions: String = source.get("instructions");

        let copy_id = Uuid::new_v4();
        let insert = sqlx::query(
            r"
            INSERT INTO routines (id, name, kind, instructions, owner_id, forks_count, created_at)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            ",
        )
        .bind(copy_id.to_string())
        .bind(&name)
        .bind(&kind)
        .bind(&instructions)
        .bind(new_owner.to_string())
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&mut *tx)
        .await;

        if let Err(e) = insert {
            if is_unique_violation(&e) {
                return Err(AppError::name_collision(
                    "You already own routine with this name.",
                ));
            }
            return Err(AppError::database(format!("Failed to copy routine: {e}")));
        }

        let units = sqlx::query(
            r"
            SELECT ru.exercise_id, ru.sets, ru.instructions, e.name AS exercise_name
            FROM routine_units ru
            JOIN exercises e ON e.id = ru.exercise_id
            WHERE ru.routine_id = $1
            ORDER BY ru.id
            ",
        )
        .bind(routine_id.to_string())
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to load routine units: {e}")))?;

        for unit in units {
            let source_exercise_id: String = unit.get("exercise_id");
            let exercise_name: String = unit.get("exercise_name");
            let sets: i64 = unit.get("sets");
            let unit_instructions: String = unit.get("instructions");

            let owned: Option<String> = sqlx::query_scalar(
                "SELECT id FROM exercises WHERE owner_id = $1 AND name = $2",
            )
            .bind(new_owner.to_string())
            .bind(&exercise_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve unit exercise: {e}")))?;

            let target_exercise_id = match owned {
                Some(id) => Uuid::parse_str(&id).map_err(|e| {
                    AppError::internal(format!("Failed to parse exercise id UUID: {e}"))
                })?,
                None => {
                    let source_id = Uuid::parse_str(&source_exercise_id).map_err(|e| {
                        AppError::internal(format!("Failed to parse exercise id UUID: {e}"))
                    })?;
                    fork_exercise_in_tx(&mut tx, source_id, new_owner).await?
                }
            };

            sqlx::query(
                r"
                INSERT INTO routine_units (routine_id, exercise_id, sets, instructions)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(copy_id.to_string())
            .bind(target_exercise_id.to_string())
            .bind(sets)
            .bind(&unit_instructions)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to copy routine unit: {e}")))?;
        }

        sqlx::query("UPDATE routines SET forks_count = forks_count + 1 WHERE id = $1")
            .bind(routine_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to bump routine forks: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit routine fork: {e}")))?;

        self.get_routine(copy_id)
            .await?
            .ok_or_else(|| AppError::internal("Routine missing after fork"))
    }
}

/// Copy one exercise inside an open transaction and bump the original's fork
/// counter. Returns the copy's ID.
async fn fork_exercise_in_tx(
    conn: &mut SqliteConnection,
    exercise_id: Uuid,
    new_owner: Uuid,
) -> AppResult<Uuid> {
    let source = sqlx::query(
        "SELECT name, kind, instructions FROM exercises WHERE id = $1",
    )
    .bind(exercise_id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to load exercise: {e}")))?
    .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))?;

    let name: String = source.get("name");
    let kind: String = source.get("kind");
    let instructions: String = source.get("instructions");

    let copy_id = Uuid::new_v4();
    let insert = sqlx::query(
        r"
        INSERT INTO exercises (id, name, kind, instructions, owner_id, forks_count, created_at)
        VALUES ($1, $2, $3, $4, $5, 0, $6)
        ",
    )
    .bind(copy_id.to_string())
    .bind(&name)
    .bind(&kind)
    .bind(&instructions)
    .bind(new_owner.to_string())
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *conn)
    .await;

    if let Err(e) = insert {
        if is_unique_violation(&e) {
            return Err(AppError::name_collision(
                "You already own an exercise with this name",
            ));
        }
        return Err(AppError::database(format!("Failed to copy exercise: {e}")));
    }

    for relation in EXERCISE_COPY_RELATIONS {
        let sql = format!(
            "INSERT INTO {table} (exercise_id, {column}) \
             SELECT $1, {column} FROM {table} WHERE exercise_id = $2",
            table = relation.join_table,
            column = relation.fk_column,
        );
        sqlx::query(&sql)
            .bind(copy_id.to_string())
            .bind(exercise_id.to_string())
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to copy {table}: {e}",
                    table = relation.join_table
                ))
            })?;
    }

    sqlx::query("UPDATE exercises SET forks_count = forks_count + 1 WHERE id = $1")
        .bind(exercise_id.to_string())
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to bump exercise forks: {e}")))?;

    Ok(copy_id)
}
