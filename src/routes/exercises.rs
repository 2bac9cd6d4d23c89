// ABOUTME: Exercise CRUD and fork route handlers
// ABOUTME: Validates payload fields and enforces owner-only modification
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Exercise CRUD and fork endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::authenticate;
use crate::database::{Database, ExerciseData, ExerciseFilter};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{Exercise, ExerciseKind, Muscle};
use crate::policy::{self, can_be_modified};
use crate::state::AppState;
use crate::validation::{is_valid_tag_name, is_youtube_link};

const MAX_NAME_LENGTH: usize = 100;

/// Exercise routes
pub struct ExerciseRoutes;

#[derive(Debug, Deserialize)]
struct ExercisePayload {
    name: String,
    kind: String,
    #[serde(default)]
    instructions: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    tutorials: Vec<String>,
    #[serde(default)]
    muscles: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ExerciseListQuery {
    user: Option<Uuid>,
    discover: Option<bool>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ExerciseResponse {
    id: Uuid,
    name: String,
    kind: ExerciseKind,
    kind_display: &'static str,
    instructions: String,
    owner: Uuid,
    owner_username: String,
    forks_count: i64,
    can_be_forked: bool,
    tags: Vec<String>,
    tutorials: Vec<String>,
    muscles: Vec<String>,
}

impl ExerciseResponse {
    async fn build(db: &Database, exercise: Exercise, user_id: Uuid) -> AppResult<Self> {
        let can_be_forked = policy::exercise_can_be_forked(db, &exercise, user_id).await?;
        Ok(Self {
            id: exercise.id,
            name: exercise.name,
            kind: exercise.kind,
            kind_display: exercise.kind.display_name(),
            instructions: exercise.instructions,
            owner: exercise.owner_id,
            owner_username: exercise.owner_username,
            forks_count: exercise.forks_count,
            can_be_forked,
            tags: exercise.tags,
            tutorials: exercise.tutorials,
            muscles: exercise.muscles,
        })
    }
}

impl ExerciseRoutes {
    /// Create all exercise routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route(
                "/api/exercises",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/exercises/:exercise_id",
                get(Self::handle_get)
                    .put(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/api/exercises/:exercise_id/fork", post(Self::handle_fork))
            .with_state(state)
    }

    async fn handle_list(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Query(query): Query<ExerciseListQuery>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;

        let filter = if query.discover.unwrap_or(false) {
            ExerciseFilter {
                exclude_owner: Some(query.user.unwrap_or(auth.user_id)),
                limit: query.limit,
                ..Default::default()
            }
        } else {
            ExerciseFilter {
                owner: query.user,
                limit: query.limit,
                ..Default::default()
            }
        };

        let exercises = state.database.list_exercises(&filter).await?;
        let mut body = Vec::with_capacity(exercises.len());
        for exercise in exercises {
            body.push(ExerciseResponse::build(&state.database, exercise, auth.user_id).await?);
        }
        Ok(Json(body).into_response())
    }

    async fn handle_create(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Json(payload): Json<ExercisePayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let data = validate_payload(&payload)?;

        let exercise = state.database.create_exercise(auth.user_id, &data).await?;
        tracing::info!(exercise_id = %exercise.id, owner = %auth.user_id, "Created exercise");

        let body = ExerciseResponse::build(&state.database, exercise, auth.user_id).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn handle_get(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let exercise = state
            .database
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))?;

        let body = ExerciseResponse::build(&state.database, exercise, auth.user_id).await?;
        Ok(Json(body).into_response())
    }

    async fn handle_update(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
        Json(payload): Json<ExercisePayload>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let exercise = state
            .database
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))?;

        if !can_be_modified(exercise.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your exercise."));
        }

        let data = validate_payload(&payload)?;
        let exercise = state.database.update_exercise(exercise_id, &data).await?;

        let body = ExerciseResponse::build(&state.database, exercise, auth.user_id).await?;
        Ok(Json(body).into_response())
    }

    async fn handle_delete(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let exercise = state
            .database
            .get_exercise(exercise_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Exercise {exercise_id}")))?;

        if !can_be_modified(exercise.owner_id, auth.user_id) {
            return Err(AppError::permission_denied("This is not your exercise."));
        }

        state.database.delete_exercise(exercise_id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn handle_fork(
        State(state): State<Arc<AppState>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
    ) -> AppResult<Response> {
        let auth = authenticate(&headers, &state.auth)?;
        let forked = state.database.fork_exercise(exercise_id, auth.user_id).await?;
        tracing::info!(
            source = %exercise_id,
            copy = %forked.id,
            new_owner = %auth.user_id,
            "Forked exercise"
        );

        let body = ExerciseResponse::build(&state.database, forked, auth.user_id).await?;
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }
}

fn validate_payload(payload: &ExercisePayload) -> AppResult<ExerciseData> {
    let mut errors = ValidationErrors::new();

    if payload.name.is_empty() {
        errors.add("name", "This field may not be blank.");
    } else if payload.name.len() > MAX_NAME_LENGTH {
        errors.add(
            "name",
            format!("Ensure this field has no more than {MAX_NAME_LENGTH} characters."),
        );
    }

    let kind = ExerciseKind::parse(&payload.kind);
    if kind.is_none() {
        errors.add("kind", format!("\"{}\" is not a valid choice.", payload.kind));
    }

    for tag in &payload.tags {
        if !is_valid_tag_name(tag) {
            errors.add("tags", "This can only contain letters and digits");
        }
    }

    for url in &payload.tutorials {
        if !is_youtube_link(url) {
            errors.add("tutorials", "Invalid YouTube link");
        }
    }

    let mut muscles = Vec::with_capacity(payload.muscles.len());
    for code in &payload.muscles {
        match Muscle::parse(code) {
            Some(muscle) => muscles.push(muscle),
            None => errors.add("muscles", format!("\"{code}\" is not a valid choice.")),
        }
    }

    match kind {
        Some(kind) if errors.is_empty() => Ok(ExerciseData {
            name: payload.name.clone(),
            kind,
            instructions: payload.instructions.clone(),
            tags: payload.tags.clone(),
            tutorials: payload.tutorials.clone(),
            muscles,
        }),
        _ => Err(AppError::validation(errors)),
    }
}
