// ABOUTME: Shared application state handed to every route handler
// ABOUTME: Bundles the database handle with the token manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Shared application state handed to every route handler.

use crate::auth::AuthManager;
use crate::database::Database;

/// Resources shared across requests, wrapped in an `Arc` by the router
pub struct AppState {
    pub database: Database,
    pub auth: AuthManager,
}

impl AppState {
    #[must_use]
    pub fn new(database: Database, auth: AuthManager) -> Self {
        Self { database, auth }
    }
}
