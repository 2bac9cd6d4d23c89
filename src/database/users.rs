// ABOUTME: User account database operations
// ABOUTME: Provides create and lookup helpers with unique email and username handling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! User account database operations.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

use super::Database;
use crate::errors::{is_unique_violation, AppError, AppResult, ValidationErrors};
use crate::models::User;

impl Database {
    /// Create a new user
    ///
    /// # Errors
    ///
    /// Returns a validation error if the email or username is already taken,
    /// or a database error if the operation fails.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> AppResult<User> {
        let id = Uuid::new_v4();
        let created_at = chrono::Utc::now();

        let result = sqlx::query(
            r"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(id.to_string())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if is_unique_violation(&e) {
                // The schema cannot tell us which column collided without
                // parsing the message, so check the email first.
                let field = if self.get_user_by_email(email).await?.is_some() {
                    "email"
                } else {
                    "username"
                };
                return Err(AppError::validation(ValidationErrors::single(
                    field,
                    format!("A user with this {field} already exists."),
                )));
            }
            return Err(AppError::database(format!("Failed to create user: {e}")));
        }

        Ok(User {
            id,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at,
        })
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user_id_str = user_id.to_string();
        self.get_user_by_field("id", &user_id_str).await
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.get_user_by_field("email", email).await
    }

    async fn get_user_by_field(&self, field: &str, value: &str) -> AppResult<Option<User>> {
        let query = format!(
            r"
            SELECT id, username, email, password_hash, created_at
            FROM users WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by {field}: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let id: String = row.get("id");
        let created_at: String = row.get("created_at");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::internal(format!("Failed to parse user id UUID: {e}")))?,
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: chrono::DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| AppError::internal(format!("Failed to parse created_at: {e}")))?
                .with_timezone(&chrono::Utc),
        })
    }
}
