// ABOUTME: Workout CRUD route handlers
// ABOUTME: Runs unit validation and routine reconciliation before any write
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Workout CRUD endpoints.
//!
//! Create and update share one validation pipeline: routine ownership, then
//! per-entry checks (exercise existence and ownership, unit fields for the
//! exercise kind, duplicate sets), then whole-payload reconciliation against
//! the routine template. Nothing is written unless every stage passes.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::authenticate;
use crate::database::{Database, LogEntryData, WorkoutData, WorkoutFilter};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::integrity::{reconcile, RequiredUnit, SubmittedSet};
use crate::models::Workout;
use crate::policy::can_be_modified;
use crate::state::AppState;
use crate::validation::{validate_units, LogEntryUnits};

/// Workout routes
pub struct WorkoutRoutes;

#[derive(Debug, Deserialize)]
struct WorkoutPayload {
    date: NaiveDate,
    #[serde(default)]
    completed: bool,
    routine: Option<Uuid>,
    #[serde(default)]
    log_entries: Vec<LogEntryPayload>,
}

#[derive(Debug, Deserialize)]
struct LogEntryPayload {
    exercise: Uuid,
    set_number: i64,
    reps: Option<i64>,
    weight: Option<f64>,
    time: Option<i64>,
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WorkoutListQuery {
    user: Option<Uuid>,
    completed: Option<bool>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct LogEntryResponse {
    exercise: Uuid,
    exercise_name: String,
    set_number: i64,
    reps: Option<i64>,
    weight: Option<f64>,
    time: Option<i64>,
    distance: Option<f64>,
}

#[derive(Debug, Serialize)]
struct WorkoutResponse {
    id: Uuid,
    owner: Uuid,
    date: NaiveDate,
    completed: bool,
    routine: Option<Uuid>,
    log_entries: Vec<LogEntryResponse>,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            owner: workout.owner_id,
            date: workout.date,
            completed: workout.completed,
            routine: workout.routine_id,
            log_entries: workout
                .log_entries
                .into_iter()
                .map(|entry| LogEntryResponse {
                    exercise: entry.exercise_id,
                    exercise_name: entry.exercise_name,
                    set_number: entry.set_number,
                    reps: entry.reps,
                    weight: entry.weight,
                    time: entry.time,
                    distance: entry.distance,
                })
                .collect(),
        }
    }
}

impl WorkoutRoutes {
    /// Create all workout routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/workouts",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/workouts/:workout_id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Query(query): Query<WorkoutListQuery>,
    ) -> AppResult<Response> {
        authenticate(&headers, &state.auth)?;

        let filter = WorkoutFilter {
            owner: query.user,
            completed: query.completed,
            limit: query.limit,
        };

        let workouts = state.database.list_workouts(&filter).await?;
        let body: Vec<WorkoutResponse> = workouts.into_iter().map(Into::into).collect();
        Ok(Json(body).into_response())
    }

    async fn handle_create(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(payload): Json<WorkoutPayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let data = validate_payload(&state.database, &payload, auth.user_id).await?;

        let workout = state.database.create_workout(auth.user_id, &data).await?;
        tracing::info!(workout_id = %workout.id, owner = %auth.user_id, "Created workout");

        Ok((StatusCode::CREATED, Json(WorkoutResponse::from(workout))).into_response())
    }

    async fn handle_get(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(workout_id): Path<Uuid>,
    ) -> AppResult<Response> {
        authenticate(&headers, &state.auth)?;
        let workout = state
            .database
            .get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))?;

        Ok(Json(WorkoutResponse::from(workout)).into_response())
    }

    async fn handle_update(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(workout_id): Path<Uuid>,
        Json(payload): Json<WorkoutPayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let workout = state
            .database
            .get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))?;

        if !can_be_modified(workout.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your workout."));
        }

        let data = validate_payload(&state.database, &payload, auth.user_id).await?;
        let workout = state.database.update_workout(workout_id, &data).await?;

        Ok(Json(WorkoutResponse::from(workout)).into_response())
    }

    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(workout_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let workout = state
            .database
            .get_workout(workout_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Workout {workout_id}")))?;

        if !can_be_modified(workout.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your workout."));
        }

        state.database.delete_workout(workout_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn validate_payload(
    db: &Database,
    payload: &WorkoutPayload,
    user_id: Uuid,
) -> AppResult<WorkoutData> {
    let mut errors = ValidationErrors::new();

    // The routine template, loaded only when referenced and owned.
    let mut routine_units: Option<Vec<RequiredUnit>> = None;
    if let Some(routine_id) = payload.routine {
        match db.get_routine(routine_id).await? {
            None => errors.add(
                "routine",
                format!("Invalid pk \"{routine_id}\" - object does not exist."),
            ),
            Some(routine) if routine.owner_id != user_id => {
                errors.add("routine", "This is not your routine.");
            }
            Some(routine) => {
                routine_units = Some(
                    routine
                        .units
                        .into_iter()
                        .map(|unit| RequiredUnit {
                            exercise_id: unit.exercise_id,
                            exercise_name: unit.exercise_name,
                            sets: unit.sets,
                        })
                        .collect(),
                );
            }
        }
    }

    let mut entry_errors: Vec<Value> = Vec::with_capacity(payload.log_entries.len());
    let mut any_entry_error = false;
    let mut seen_sets: BTreeSet<(Uuid, i64)> = BTreeSet::new();
    let mut submitted: Vec<SubmittedSet> = Vec::with_capacity(payload.log_entries.len());
    let mut entries = Vec::with_capacity(payload.log_entries.len());

    for entry in &payload.log_entries {
        let mut entry_map = serde_json::Map::new();

        match db.get_exercise(entry.exercise).await? {
            None => {
                entry_map.insert(
                    "exercise".to_owned(),
                    json!([format!(
                        "Invalid pk \"{}\" - object does not exist.",
                        entry.exercise
                    )]),
                );
            }
            Some(exercise) if exercise.owner_id != user_id => {
                entry_map.insert("exercise".to_owned(), json!(["This is not your exercise."]));
            }
            Some(exercise) => {
                let units = LogEntryUnits {
                    reps: entry.reps,
                    weight: entry.weight,
                    time: entry.time,
                    distance: entry.distance,
                };
                for issue in validate_units(exercise.kind, &units) {
                    let slot = entry_map
                        .entry(issue.field.to_owned())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    if let Value::Array(messages) = slot {
                        messages.push(Value::String(issue.message));
                    }
                }
                submitted.push(SubmittedSet {
                    exercise_id: exercise.id,
                    exercise_name: exercise.name,
                    set_number: entry.set_number,
                });
            }
        }

        if entry.set_number < 1 {
            entry_map.insert(
                "set_number".to_owned(),
                json!(["Ensure this value is greater than or equal to 1."]),
            );
        }

        if !seen_sets.insert((entry.exercise, entry.set_number)) {
            entry_map.insert(
                "non_field_errors".to_owned(),
                json!(["You already created entry for this set."]),
            );
        }

        if !entry_map.is_empty() {
            any_entry_error = true;
        }
        entry_errors.push(Value::Object(entry_map));

        entries.push(LogEntryData {
            exercise_id: entry.exercise,
            set_number: entry.set_number,
            reps: entry.reps,
            weight: entry.weight,
            time: entry.time,
            distance: entry.distance,
        });
    }

    if any_entry_error {
        errors.insert_value("log_entries", Value::Array(entry_errors));
    }

    // Reconciliation runs only on otherwise well-formed payloads so its
    // messages never duplicate per-entry errors.
    if errors.is_empty() {
        let issues = reconcile(routine_units.as_deref(), &submitted);
        if !issues.is_empty() {
            errors.insert_value("integrity", json!(issues));
        }
    }

    if errors.is_empty() {
        Ok(WorkoutData {
            date: payload.date,
            completed: payload.completed,
            routine_id: payload.routine,
            entries,
        })
    } else {
        Err(AppError::validation(errors))
    }
}
