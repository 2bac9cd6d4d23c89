// ABOUTME: Registration and login endpoint handlers
// ABOUTME: Issues JWT bearer tokens after validating credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Registration and login endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::state::AppState;
use crate::validation::is_valid_tag_name;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Auth routes
pub struct AuthRoutes;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user_id: Uuid,
    username: String,
    email: String,
}

impl AuthRoutes {
    /// Create all auth routes
    pub fn routes(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .with_state(state)
    }

    async fn handle_register(
        State(state): State<Arc<AppState>>,
        Json(request): Json<RegisterRequest>,
    ) -> AppResult<Response> {
        let mut errors = ValidationErrors::new();
        if request.username.is_empty() {
            errors.add("username", "This field may not be blank.");
        } else if !is_valid_tag_name(&request.username) {
            errors.add("username", "This can only contain letters and digits");
        }
        if !request.email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            errors.add(
                "password",
                format!("Ensure this field has at least {MIN_PASSWORD_LENGTH} characters."),
            );
        }
        if !errors.is_empty() {
            return Err(AppError::validation(errors));
        }

        let password_hash = hash_password(&request.password)?;
        let user = state
            .database
            .create_user(&request.username, &request.email, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Registered new user");

        let token = state.auth.generate_token(user.id)?;
        Ok((
            StatusCode::CREATED,
            Json(AuthResponse {
                token,
                user_id: user.id,
                username: user.username,
                email: user.email,
            }),
        )
            .into_response())
    }

    async fn handle_login(
        State(state): State<Arc<AppState>>,
        Json(request): Json<LoginRequest>,
    ) -> AppResult<Response> {
        let user = state
            .database
            .get_user_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Invalid email or password"))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let token = state.auth.generate_token(user.id)?;
        Ok(Json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
            email: user.email,
        })
        .into_response())
    }
}
