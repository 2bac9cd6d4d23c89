// ABOUTME: Library crate root for the liftlog fitness-tracking backend
// ABOUTME: Wires together the database, engine, and HTTP route modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![deny(unsafe_code)]

//! # liftlog
//!
//! A fitness-tracking backend. Users manage a library of exercises, compose
//! them into routines, and log workouts against those routines. Everything is
//! exposed over an authenticated REST API with ownership-based authorization.
//!
//! ## Architecture
//!
//! - **Database**: SQLite via `sqlx` with embedded migrations; one `Database`
//!   handle, per-entity operation files
//! - **Validation**: pure unit-requirement checks per exercise kind
//! - **Integrity**: reconciliation of workout log entries against routines
//! - **Forking**: transactional deep copy of exercises and routines between
//!   users with fork-count tracking
//! - **Routes**: axum routers, one module per resource

/// Authentication: JWT issuance and validation, password hashing
pub mod auth;

/// Server configuration loaded from environment variables
pub mod config;

/// SQLite persistence layer and entity operations
pub mod database;

/// Unified error handling with HTTP response mapping
pub mod errors;

/// Workout/routine integrity reconciliation
pub mod integrity;

/// Domain models shared across the database and HTTP layers
pub mod models;

/// Ownership and fork-eligibility policy
pub mod policy;

/// HTTP route handlers
pub mod routes;

/// Shared state handed to route handlers
pub mod state;

/// Per-entry unit validation and payload format checks
pub mod validation;
