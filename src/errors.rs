// ABOUTME: Unified application error type with HTTP response mapping
// ABOUTME: Carries field-keyed validation errors in the API's JSON wire format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Unified error handling with HTTP response mapping.
//!
//! `AppError` is the single error type flowing through the database layer and
//! route handlers. Validation failures carry a field-keyed map of messages so
//! callers see exactly which part of a payload was rejected; name collisions
//! on fork render as a `403` with the colliding field, matching the API
//! contract for fork endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Result type used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Field-keyed validation errors, serialized as `{"field": ["msg", ...]}`.
///
/// Values are arbitrary JSON so nested per-entry error lists (e.g. one map per
/// workout log entry) can be attached alongside plain message lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors(pub serde_json::Map<String, Value>);

impl ValidationErrors {
    /// Create an empty error map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the list stored under `field`
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let entry = self
            .0
            .entry(field.to_owned())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(messages) = entry {
            messages.push(Value::String(message.into()));
        }
    }

    /// Attach an arbitrary JSON value under `field` (used for nested
    /// per-entry error lists)
    pub fn insert_value(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_owned(), value);
    }

    /// True if no errors have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Single-field convenience constructor
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }
}

/// Application error type that converts to HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed or out-of-range client input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or invalid credentials
    #[error("authentication failed: {0}")]
    AuthInvalid(String),

    /// Caller is not allowed to act on this resource
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Payload failed unit/integrity/ownership validation
    #[error("validation failed")]
    Validation(ValidationErrors),

    /// A fork or create would duplicate a (name, owner) pair.
    /// Holds the message reported under the `name` field.
    #[error("name collision: {0}")]
    NameCollision(String),

    /// Database operation failed
    #[error("database error: {0}")]
    Database(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Entity lookup came back empty
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Client input is malformed
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Authentication failure
    pub fn auth_invalid(msg: impl Into<String>) -> Self {
        Self::AuthInvalid(msg.into())
    }

    /// Ownership check failed
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Fork/create name collision; `msg` is surfaced under the `name` field
    pub fn name_collision(msg: impl Into<String>) -> Self {
        Self::NameCollision(msg.into())
    }

    /// Database operation failed
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// Unexpected internal failure
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Field-keyed validation failure
    #[must_use]
    pub fn validation(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "detail": msg })),
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "detail": msg })),
            Self::AuthInvalid(msg) => (StatusCode::UNAUTHORIZED, json!({ "detail": msg })),
            Self::PermissionDenied(msg) => (StatusCode::FORBIDDEN, json!({ "detail": msg })),
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Value::Object(errors.0),
            ),
            Self::NameCollision(msg) => (StatusCode::FORBIDDEN, json!({ "name": [msg] })),
            Self::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "internal server error" }),
                )
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// True if the error is a unique-constraint violation raised by the store.
///
/// Fork operations rely on this to translate a losing race on the
/// `(name, owner_id)` index into a name collision instead of a 500.
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "too long");
        errors.add("name", "bad characters");
        errors.add("kind", "unknown kind");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["name"], json!(["too long", "bad characters"]));
        assert_eq!(value["kind"], json!(["unknown kind"]));
    }

    #[test]
    fn empty_map_reports_empty() {
        assert!(ValidationErrors::new().is_empty());
        assert!(!ValidationErrors::single("name", "taken").is_empty());
    }
}
