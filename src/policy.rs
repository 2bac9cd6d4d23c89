// ABOUTME: Ownership policy for modification and fork eligibility
// ABOUTME: Name collisions are checked per-owner, never globally
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Ownership policy for modification and forking.
//!
//! Modification is owner-only. Forking is the inverse with one extra rule:
//! a fork is pointless if the caller already owns an entity with the same
//! name, since the copy could never be stored.

use uuid::Uuid;

use crate::database::Database;
use crate::errors::AppResult;
use crate::models::{Exercise, Routine};

/// Only the owner may modify or delete an entity
#[must_use]
pub const fn can_be_modified(owner_id: Uuid, user_id: Uuid) -> bool {
    owner_id.as_u128() == user_id.as_u128()
}

/// Whether `user_id` could successfully fork this exercise
///
/// # Errors
///
/// Returns an error if the ownership lookup fails
pub async fn exercise_can_be_forked(
    db: &Database,
    exercise: &Exercise,
    user_id: Uuid,
) -> AppResult<bool> {
    if exercise.owner_id == user_id {
        return Ok(false);
    }
    Ok(!db.user_owns_exercise_named(user_id, &exercise.name).await?)
}

/// Whether `user_id` could successfully fork this routine
///
/// # Errors
///
/// Returns an error if the ownership lookup fails
pub async fn routine_can_be_forked(
    db: &Database,
    routine: &Routine,
    user_id: Uuid,
) -> AppResult<bool> {
    if routine.owner_id == user_id {
        return Ok(false);
    }
    Ok(!db.user_owns_routine_named(user_id, &routine.name).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_owner_modifies() {
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(can_be_modified(owner, owner));
        assert!(!can_be_modified(owner, other));
    }
}
