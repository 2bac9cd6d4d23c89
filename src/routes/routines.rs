// ABOUTME: Routine CRUD and fork route handlers
// ABOUTME: Reports nested unit validation errors positionally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Routine CRUD and fork endpoints.
//!
//! Nested unit payloads are validated against the acting user before any
//! write: every referenced exercise must exist and be owned by the routine's
//! owner. Unit errors are reported positionally, one error map per submitted
//! unit, so clients can line failures up with their input.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::authenticate;
use crate::database::{Database, RoutineData, RoutineFilter, RoutineUnitData};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{Routine, RoutineKind};
use crate::policy::{self, can_be_modified};
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 100;
const MIN_SETS: i64 = 1;
const MAX_SETS: i64 = 100;

/// Routine routes
pub struct RoutineRoutes;

#[derive(Debug, Deserialize)]
struct RoutinePayload {
    name: String,
    kind: String,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    exercises: Vec<UnitPayload>,
}

#[derive(Debug, Deserialize)]
struct UnitPayload {
    exercise: Uuid,
    sets: i64,
    #[serde(default)]
    instructions: String,
}

#[derive(Debug, Deserialize)]
struct RoutineListQuery {
    #[serde(rename = "user.eq")]
    user_eq: Option<Uuid>,
    #[serde(rename = "user.neq")]
    user_neq: Option<Uuid>,
    orderby: Option<String>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct UnitResponse {
    exercise: Uuid,
    exercise_name: String,
    sets: i64,
    instructions: String,
}

#[derive(Debug, Serialize)]
struct RoutineResponse {
    id: Uuid,
    name: String,
    kind: RoutineKind,
    kind_display: &'static str,
    instructions: String,
    owner: Uuid,
    owner_username: String,
    forks_count: i64,
    can_be_forked: bool,
    can_be_modified: bool,
    exercises: Vec<UnitResponse>,
    muscles_count: BTreeMap<String, i64>,
}

impl RoutineResponse {
    async fn build(db: &Database, routine: Routine, user_id: Uuid) -> AppResult<Self> {
        let can_be_forked = policy::routine_can_be_forked(db, &routine, user_id).await?;
        let muscles_count = db.routine_muscles_count(routine.id).await?;
        Ok(Self {
            id: routine.id,
            name: routine.name,
            kind: routine.kind,
            kind_display: routine.kind.display_name(),
            instructions: routine.instructions,
            owner: routine.owner_id,
            owner_username: routine.owner_username,
            forks_count: routine.forks_count,
            can_be_forked,
            can_be_modified: can_be_modified(routine.owner_id, user_id),
            exercises: routine
                .units
                .into_iter()
                .map(|unit| UnitResponse {
                    exercise: unit.exercise_id,
                    exercise_name: unit.exercise_name,
                    sets: unit.sets,
                    instructions: unit.instructions,
                })
                .collect(),
            muscles_count,
        })
    }
}

impl RoutineRoutes {
    /// Create all routine routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/routines",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/routines/:routine_id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/routines/:routine_id/fork", post(Self::handle_fork))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Query(query): Query<RoutineListQuery>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;

        let filter = RoutineFilter {
            owner: query.user_eq,
            exclude_owner: query.user_neq,
            order_by: query.orderby,
            limit: query.limit,
        };

        let routines = state.database.list_routines(&filter).await?;
        let mut body = Vec::with_capacity(routines.len());
        for routine in routines {
            body.push(RoutineResponse::build(&state.database, routine, auth.user_id).await?);
        }
        Ok(Json(body).into_response())
    }

    async fn handle_create(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(payload): Json<RoutinePayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let data = validate_payload(&state.database, &payload, auth.user_id).await?;

        let routine = state.database.create_routine(auth.user_id, &data).await?;
        tracing::info!(routine_id = %routine.id, owner = %auth.user_id, "Created routine");

        let body = RoutineResponse::build(&state.database, routine, auth.user_id).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn handle_get(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(routine_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let routine = state
            .database
            .get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;

        let body = RoutineResponse::build(&state.database, routine, auth.user_id).await?;
        Ok(Json(body).into_response())
    }

    async fn handle_update(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(routine_id): Path<Uuid>,
        Json(payload): Json<RoutinePayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let routine = state
            .database
            .get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;

        if !can_be_modified(routine.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your routine."));
        }

        let data = validate_payload(&state.database, &payload, auth.user_id).await?;
        let routine = state.database.update_routine(routine_id, &data).await?;

        let body = RoutineResponse::build(&state.database, routine, auth.user_id).await?;
        Ok(Json(body).into_response())
    }

    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(routine_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let routine = state
            .database
            .get_routine(routine_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Routine {routine_id}")))?;

        if !can_be_modified(routine.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your routine."));
        }

        state.database.delete_routine(routine_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_fork(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(routine_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let forked = state.database.fork_routine(routine_id, auth.user_id).await?;
        tracing::info!(
            source = %routine_id,
            copy = %forked.id,
            new_owner = %auth.user_id,
            "Forked routine"
        );

        let body = RoutineResponse::build(&state.database, forked, auth.user_id).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }
}

async fn validate_payload(
    db: &Database,
    payload: &RoutinePayload,
    user_id: Uuid,
) -> AppResult<RoutineData> {
    let mut errors = ValidationErrors::new();

    if payload.name.is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if payload.name.len() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("Ensure this field has no more than {MAX_NAME_LENGTH} characters."),
        );
    }

    let kind = RoutineKind::parse(&payload.kind);
    if kind.is_none() {
        errors.add("kind", format!("\"{}\" is not a valid choice.", payload.kind));
    }

    // One error map per submitted unit, empty when the unit is fine.
    let mut unit_errors: Vec<Value> = Vec::with_capacity(payload.exercises.len());
    let mut any_unit_error = false;
    let mut units = Vec::with_capacity(payload.exercises.len());

    for unit in &payload.exercises {
        let mut entry = serde_json::Map::new();

        match db.get_exercise(unit.exercise).await? {
            None => {
                entry.insert(
                    "exercise".to_owned(),
                    json!([format!(
                        "Invalid pk \"{}\" - object does not exist.",
                        unit.exercise
                    )]),
                );
            }
            Some(exercise) if exercise.owner_id != user_id => {
                entry.insert("exercise".to_owned(), json!(["This is not your exercise."]));
            }
            Some(_) => {}
        }

        if unit.sets < MIN_SETS {
            entry.insert(
                "sets".to_owned(),
                json!([format!("Ensure this value is greater than or equal to {MIN_SETS}.")]),
            );
        } else if unit.sets > MAX_SETS {
            entry.insert(
                "sets".to_owned(),
                json!([format!("Ensure this value is less than or equal to {MAX_SETS}.")]),
            );
        }

        if !entry.is_empty() {
            any_unit_error = true;
        }
        unit_errors.push(Value::Object(entry));

        units.push(RoutineUnitData {
            exercise_id: unit.exercise,
            sets: unit.sets,
            instructions: unit.instructions.clone(),
        });
    }

    if any_unit_error {
        errors.insert_value("exercises", Value::Array(unit_errors));
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok(RoutineData {
            name: payload.name.clone(),
            kind,
            instructions: payload.instructions.clone(),
            units,
        }),
        _ => Err(AppError::validation(errors)),
    }
}
