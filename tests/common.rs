// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, user, and router creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(dead_code)]

//! Shared test fixtures: in-memory database, users, and a full router.

use std::sync::Arc;

use uuid::Uuid;

use liftlog::auth::{hash_password, AuthManager};
use liftlog::database::{Database, ExerciseData};
use liftlog::models::{Exercise, ExerciseKind, Muscle, User};
use liftlog::routes;
use liftlog::state::AppState;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret";

pub async fn create_test_database() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

pub async fn create_test_user(db: &Database, username: &str) -> User {
    let password_hash = hash_password("password123").unwrap();
    db.create_user(username, &format!("{username}@example.com"), &password_hash)
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_exercise(
    db: &Database,
    owner: Uuid,
    name: &str,
    kind: ExerciseKind,
) -> Exercise {
    db.create_exercise(
        owner,
        &ExerciseData {
            name: name.to_owned(),
            kind,
            instructions: String::new(),
            tags: vec![],
            tutorials: vec![],
            muscles: vec![],
        },
    )
    .await
    .expect("Failed to create test exercise")
}

pub async fn create_test_exercise_with_relations(
    db: &Database,
    owner: Uuid,
    name: &str,
) -> Exercise {
    db.create_exercise(
        owner,
        &ExerciseData {
            name: name.to_owned(),
            kind: ExerciseKind::Rew,
            instructions: "Keep your back straight".to_owned(),
            tags: vec!["strength".to_owned(), "legs".to_owned()],
            tutorials: vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_owned()],
            muscles: vec![Muscle::Quadriceps, Muscle::Gluteus],
        },
    )
    .await
    .expect("Failed to create test exercise")
}

/// Full application router plus a bearer token for `username`
pub async fn setup_test_app(username: &str) -> (axum::Router, String, User, Database) {
    let database = create_test_database().await;
    let user = create_test_user(&database, username).await;

    let auth = AuthManager::new(TEST_JWT_SECRET, 1);
    let token = auth.generate_token(user.id).unwrap();

    let state = Arc::new(AppState::new(database.clone(), auth));
    let router = routes::router(state);

    (router, format!("Bearer {token}"), user, database)
}

/// A second authenticated user on an existing app's database
pub fn bearer_for(user_id: Uuid) -> String {
    let auth = AuthManager::new(TEST_JWT_SECRET, 1);
    format!("Bearer {}", auth.generate_token(user_id).unwrap())
}
