// ABOUTME: Integration tests for the workout route handlers
// ABOUTME: Covers the unit validation and integrity reconciliation pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Workout endpoint tests: the full validation pipeline from unit fields
//! through integrity reconciliation.

mod common;
mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

use common::{bearer_for, create_test_exercise, create_test_user, setup_test_app};
use liftlog::models::ExerciseKind;

#[tokio::test]
async fn freeform_workout_with_contiguous_sets_succeeds() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "completed": true,
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 },
                { "exercise": rows.id, "set_number": 2, "reps": 10 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["date"], "2026-08-28");
    assert_eq!(body["completed"], true);
    assert_eq!(body["routine"], Value::Null);
    let entries = body["log_entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["exercise_name"], "rows");
    assert_eq!(entries[0]["reps"], 10);
    assert_eq!(entries[0]["weight"], Value::Null);
}

#[tokio::test]
async fn freeform_workout_with_a_gap_reports_integrity() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "log_entries": [
                { "exercise": rows.id, "set_number": 2, "reps": 10 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["integrity"], json!(["Exercise rows: set 1 is missing."]));
}

#[tokio::test]
async fn unit_fields_must_match_the_exercise_kind() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "weight": 60.0 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let entry = &body["log_entries"][0];
    assert_eq!(
        entry["reps"],
        json!(["reps should be specified for this exercise"])
    );
    assert_eq!(
        entry["weight"],
        json!(["weight should not be specified for this exercise"])
    );
}

#[tokio::test]
async fn duplicate_sets_and_foreign_exercises_are_rejected() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let bob = create_test_user(&db, "bob").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;
    let theirs = create_test_exercise(&db, bob.id, "plank", ExerciseKind::Tim).await;

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 },
                { "exercise": rows.id, "set_number": 1, "reps": 12 },
                { "exercise": theirs.id, "set_number": 1, "time": 60 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let entries = body["log_entries"].as_array().unwrap();
    assert_eq!(entries[0], json!({}));
    assert_eq!(
        entries[1]["non_field_errors"],
        json!(["You already created entry for this set."])
    );
    assert_eq!(
        entries[2]["exercise"],
        json!(["This is not your exercise."])
    );
}

#[tokio::test]
async fn routine_workout_is_reconciled_against_the_template() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;
    let plank = create_test_exercise(&db, user.id, "plank", ExerciseKind::Tim).await;

    let response = AxumTestRequest::post("/api/routines")
        .header("authorization", &token)
        .json(&json!({
            "name": "pull day",
            "kind": "sta",
            "exercises": [{ "exercise": rows.id, "sets": 2 }]
        }))
        .send(router.clone())
        .await;
    let routine: Value = response.json();
    let routine_id = routine["id"].as_str().unwrap().to_owned();

    // Matching submission passes.
    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "routine": routine_id,
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 },
                { "exercise": rows.id, "set_number": 2, "reps": 8 }
            ]
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    // Excess exercise and missing set are both reported, sorted.
    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-29",
            "routine": routine_id,
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 },
                { "exercise": plank.id, "set_number": 1, "time": 60 }
            ]
        }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["integrity"],
        json!([
            "Exercise plank: set 1 should not be specified for this routine.",
            "Exercise rows: set 2 is missing.",
        ])
    );
}

#[tokio::test]
async fn someone_elses_routine_cannot_be_referenced() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let bob = create_test_user(&db, "bob").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;
    let bobs_plank = create_test_exercise(&db, bob.id, "plank", ExerciseKind::Tim).await;

    let response = AxumTestRequest::post("/api/routines")
        .header("authorization", &bearer_for(bob.id))
        .json(&json!({
            "name": "core day",
            "kind": "sta",
            "exercises": [{ "exercise": bobs_plank.id, "sets": 1 }]
        }))
        .send(router.clone())
        .await;
    let routine: Value = response.json();
    let routine_id = routine["id"].as_str().unwrap().to_owned();

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "routine": routine_id,
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["routine"][0], "This is not your routine.");
}

#[tokio::test]
async fn update_replaces_log_entries() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;
    let plank = create_test_exercise(&db, user.id, "plank", ExerciseKind::Tim).await;

    let response = AxumTestRequest::post("/api/workouts")
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "log_entries": [
                { "exercise": rows.id, "set_number": 1, "reps": 10 }
            ]
        }))
        .send(router.clone())
        .await;
    let created: Value = response.json();
    let workout_id = created["id"].as_str().unwrap().to_owned();

    let response = AxumTestRequest::put(&format!("/api/workouts/{workout_id}"))
        .header("authorization", &token)
        .json(&json!({
            "date": "2026-08-28",
            "completed": true,
            "log_entries": [
                { "exercise": plank.id, "set_number": 1, "time": 90 }
            ]
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["completed"], true);
    let entries = body["log_entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["exercise_name"], "plank");
    assert_eq!(entries[0]["time"], 90);
}

#[tokio::test]
async fn list_filters_by_owner_and_completion() {
    let (router, token, user, db) = setup_test_app("alice").await;
    let rows = create_test_exercise(&db, user.id, "rows", ExerciseKind::Rep).await;

    for (date, completed) in [("2026-08-27", true), ("2026-08-28", false)] {
        AxumTestRequest::post("/api/workouts")
            .header("authorization", &token)
            .json(&json!({
                "date": date,
                "completed": completed,
                "log_entries": [
                    { "exercise": rows.id, "set_number": 1, "reps": 10 }
                ]
            }))
            .send(router.clone())
            .await;
    }

    let response = AxumTestRequest::get(&format!(
        "/api/workouts?user={}&completed=true",
        user.id
    ))
    .header("authorization", &token)
    .send(router.clone())
    .await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["date"], "2026-08-27");

    let response = AxumTestRequest::delete(&format!(
        "/api/workouts/{}",
        body[0]["id"].as_str().unwrap()
    ))
    .header("authorization", &token)
    .send(router)
    .await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);
}
