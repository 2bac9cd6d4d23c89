// ABOUTME: Routine database operations with nested unit management
// ABOUTME: Units are cleared and recreated on every edit, preserving order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Routine database operations.
//!
//! Routine units are the join entity between routines and exercises. Editing
//! a routine never patches units in place: the whole unit list is cleared and
//! recreated, so the stored order always reflects the submitted order.

use std::collections::BTreeMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

use super::Database;
use crate::errors::{is_unique_violation, AppError, AppResult, ValidationErrors};
use crate::models::{Routine, RoutineKind, RoutineUnit};

/// Validated routine fields ready for persistence
#[derive(Debug, Clone)]
pub struct RoutineData {
    pub name: String,
    pub kind: RoutineKind,
    pub instructions: String,
    pub units: Vec<RoutineUnitData>,
}

/// One validated routine unit
#[derive(Debug, Clone)]
pub struct RoutineUnitData {
    pub exercise_id: Uuid,
    pub sets: i64,
    pub instructions: String,
}

/// Listing filters for routines
#[derive(Debug, Clone, Default)]
pub struct RoutineFilter {
    /// Only routines owned by this user
    pub owner: Option<Uuid>,
    /// Only routines NOT owned by this user (discover view)
    pub exclude_owner: Option<Uuid>,
    /// Column to order by; leading `-` means descending
    pub order_by: Option<String>,
    /// Cap on returned rows
    pub limit: Option<u32>,
}

/// Columns callers may order routine listings by
pub const ROUTINE_ORDER_COLUMNS: [&str; 4] = ["name", "kind", "forks_count", "created_at"];

const ROUTINE_SELECT: &str = r"
    SELECT r.id, r.name, r.kind, r.instructions, r.owner_id, r.forks_count,
           u.username AS owner_username
    FROM routines r
    JOIN users u ON u.id = r.owner_id
";

impl Database {
    /// Create a new routine with its units owned by `owner_id`
    ///
    /// # Errors
    ///
    /// Returns a validation error if the owner already has a routine with
    /// this name, or a database error if the operation fails.
    pub async fn create_routine(&self, owner_id: Uuid, data: &RoutineData) -> AppResult<Routine> {
        let id = Uuid::new_v4();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let insert = sqlx::query(
            r"
            INSERT INTO routines (id, name, kind, instructions, owner_id, forks_count, created_at)
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
                    "You already own this routine.",
                )));
            }
            return Err(AppError::database(format!("Failed to create routine: {e}")));
        }

        insert_routine_units(&mut tx, id, &data.units).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit routine create: {e}")))?;

        self.get_routine(id)
            .await?
            .ok_or_else(|| AppError::internal("Routine missing after create"))
    }

    /// Replace a routine's fields and units. Ownership is checked by the
    /// caller. Units are cleared and recreated, never patched.
    ///
    /// # Errors
    ///
    /// Returns a validation error on a name collision, `NotFound` if the
    /// routine does not exist, or a database error.
    pub async fn update_routine(&self, routine_id: Uuid, data: &RoutineData) -> AppResult<Routine> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let update = sqlx::query(
            r"
            UPDATE routines SET name = $1, kind = $2, instructions = $3
            WHERE id = $4
            ",
        )
        .bind(&data.name)
        .bind(data.kind.as_str())
        .bind(&data.instructions)
        .bind(routine_id.to_string())
        .execute(&mut *tx)
        .await;

        match update {
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::validation(ValidationErrors::single(
                    "name",
                    "You already own this routine.",
                )));
            }
            Err(e) => {
                return Err(AppError::database(format!("Failed to update routine: {e}")));
            }
            Ok(result) if result.rows_affected() == 0 => {
                return Err(AppError::not_found(format!("Routine {routine_id}")));
            }
            Ok(_) => {}
        }

        sqlx::query("DELETE FROM routine_units WHERE routine_id = $1")
            .bind(routine_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear routine units: {e}")))?;

        insert_routine_units(&mut tx, routine_id, &data.units).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit routine update: {e}")))?;

        self.get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))
    }

    /// Get a routine by ID with its units in creation order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_routine(&self, routine_id: Uuid) -> AppResult<Option<Routine>> {
        let query = format!("{ROUTINE_SELECT} WHERE r.id = $1");
        let row = sqlx::query(&query)
            .bind(routine_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get routine: {e}")))?;

        match row {
            Some(row) => {
                let mut routine = row_to_routine(&row)?;
                routine.units = self.load_routine_units(routine.id).await?;
                Ok(Some(routine))
            }
            None => Ok(None),
        }
    }

    /// List routines with optional ownership filters and ordering
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown `order_by` column, or a database
    /// error if the query fails.
    pub async fn list_routines(&self, filter: &RoutineFilter) -> AppResult<Vec<Routine>> {
        let mut sql = ROUTINE_SELECT.to_owned();
        if filter.owner.is_some() {
            sql.push_str(" WHERE r.owner_id = $1");
        } else if filter.exclude_owner.is_some() {
            sql.push_str(" WHERE r.owner_id != $1");
        }

        if let Some(order_by) = filter.order_by.as_deref() {
            let (column, direction) = match order_by.strip_prefix('-') {
                Some(column) => (column, "DESC"),
                None => (order_by, "ASC"),
            };
            if !ROUTINE_ORDER_COLUMNS.contains(&column) {
                return Err(AppError::invalid_input(format!(
                    "Cannot order by {order_by}"
                )));
            }
            sql.push_str(&format!(" ORDER BY r.{column} {direction}"));
        } else {
            sql.push_str(" ORDER BY r.created_at DESC, r.id DESC");
        }

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
            .map_err(|e| AppError::database(format!("Failed to list routines: {e}")))?;

        let mut routines = Vec::with_capacity(rows.len());
        for row in rows {
            let mut routine = row_to_routine(&row)?;
            routine.units = self.load_routine_units(routine.id).await?;
            routines.push(routine);
        }
        Ok(routines)
    }

    /// Delete a routine. Ownership is checked by the caller.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the routine does not exist
    pub async fn delete_routine(&self, routine_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(routine_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete routine: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Routine {routine_id}")));
        }
        Ok(())
    }

    /// True if `user_id` already owns a routine with this name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn user_owns_routine_named(&self, user_id: Uuid, name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM routines WHERE owner_id = $1 AND name = $2",
        )
        .bind(user_id.to_string())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check routine ownership: {e}")))?;

        Ok(count > 0)
    }

    /// Count how many of a routine's exercises target each muscle, keyed by
    /// muscle code
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn routine_muscles_count(&self, routine_id: Uuid) -> AppResult<BTreeMap<String, i64>> {
        let rows = sqlx::query(
            r"
            SELECT em.muscle_code AS code, COUNT(*) AS exercise_count
            FROM routine_units ru
            JOIN exercise_muscles em ON em.exercise_id = ru.exercise_id
            WHERE ru.routine_id = $1
            GROUP BY em.muscle_code
            ",
        )
        .bind(routine_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count routine muscles: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("code"), row.get("exercise_count")))
            .collect())
    }

    async fn load_routine_units(&self, routine_id: Uuid) -> AppResult<Vec<RoutineUnit>> {
        let rows = sqlx::query(
            r"
            SELECT ru.exercise_id, ru.sets, ru.instructions, e.name AS exercise_name
            FROM routine_units ru
            JOIN exercises e ON e.id = ru.exercise_id
            WHERE ru.routine_id = $1
            ORDER BY ru.id
            ",
        )
        .bind(routine_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load routine units: {e}")))?;

        rows.iter().map(row_to_routine_unit).collect()
    }
}

fn row_to_routine(row: &SqliteRow) -> AppResult<Routine> {
    let id: String = row.get("id");
    let kind: String = row.get("kind");
    let owner_id: String = row.get("owner_id");

    Ok(Routine {
        id: Uuid::parse_str(&id)
            .map_err(|e| AppError::internal(format!("Failed to parse routine id UUID: {e}")))?,
        name: row.get("name"),
        kind: RoutineKind::parse(&kind)
            .ok_or_else(|| AppError::internal(format!("Unknown routine kind: {kind}")))?,
        instructions: row.get("instructions"),
        owner_id: Uuid::parse_str(&owner_id)
            .map_err(|e| AppError::internal(format!("Failed to parse owner id UUID: {e}")))?,
        owner_username: row.get("owner_username"),
        forks_count: row.get("forks_count"),
        units: Vec::new(),
    })
}

fn row_to_routine_unit(row: &SqliteRow) -> AppResult<RoutineUnit> {
    let exercise_id: String = row.get("exercise_id");
    Ok(RoutineUnit {
        exercise_id: Uuid::parse_str(&exercise_id)
            .map_err(|e| AppError::internal(format!("Failed to parse exercise id UUID: {e}")))?,
        exercise_name: row.get("exercise_name"),
        sets: row.get("sets"),
        instructions: row.get("instructions"),
    })
}

pub(super) async fn insert_routine_units(
    conn: &mut SqliteConnection,
    routine_id: Uuid,
    units: &[RoutineUnitData],
) -> AppResult<()> {
    for unit in units {
        sqlx::query(
            r"
            INSERT INTO routine_units (routine_id, exercise_id, sets, instructions)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(routine_id.to_string())
        .bind(unit.exercise_id.to_string())
        .bind(unit.sets)
        .bind(&unit.instructions)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert routine unit: {e}")))?;
    }
    Ok(())
}
