// ABOUTME: Router assembly for all HTTP route groups
// ABOUTME: Applies trace and CORS layers over the merged per-entity routers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! HTTP route handlers.
//!
//! Each entity gets a route-group struct whose `routes` constructor wires its
//! paths onto a router sharing one `Arc<AppState>`. Handlers authenticate
//! explicitly from the `authorization` header; there is no auth middleware
//! layer.

pub mod auth;
pub mod exercises;
pub mod routines;
pub mod workouts;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(auth::AuthRoutes::routes(state.clone()))
        .merge(exercises::ExerciseRoutes::routes(state.clone()))
        .merge(routines::RoutineRoutes::routes(state.clone()))
        .merge(workouts::WorkoutRoutes::routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
