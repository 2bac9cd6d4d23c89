// ABOUTME: Integration tests for registration and login endpoints
// ABOUTME: Covers field validation, duplicate emails, and token requirements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Registration and login endpoint tests.

mod common;
mod helpers;

use axum::http::StatusCode;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

use common::setup_test_app;

#[tokio::test]
async fn register_and_login_round_trip() {
    let (router, _token, _user, _db) = setup_test_app("alice").await;

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "hunter2hunter2"
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["username"], "bob");
    assert!(body["token"].as_str().is_some());

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "bob@example.com",
            "password": "hunter2hunter2"
        }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn register_rejects_bad_fields() {
    let (router, _token, _user, _db) = setup_test_app("alice").await;

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "username": "bad name!",
            "email": "not-an-email",
            "password": "short"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["username"][0],
        "This can only contain letters and digits"
    );
    assert_eq!(body["email"][0], "Enter a valid email address.");
    assert!(body["password"][0].as_str().unwrap().starts_with("Ensure"));
}

#[tokio::test]
async fn register_rejects_duplicate_email() {
    let (router, _token, _user, _db) = setup_test_app("alice").await;

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "username": "alice2",
            "email": "alice@example.com",
            "password": "hunter2hunter2"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["email"][0], "A user with this email already exists.");
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let (router, _token, _user, _db) = setup_test_app("alice").await;

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "wrong-password"
        }))
        .send(router)
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (router, _token, _user, _db) = setup_test_app("alice").await;

    let response = AxumTestRequest::get("/api/exercises").send(router).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}
