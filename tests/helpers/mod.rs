// ABOUTME: Helper module declarations for integration tests
// ABOUTME: Exposes the axum request builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(dead_code)]

pub mod axum_test;
