// ABOUTME: Integration tests for the fork engine
// ABOUTME: Covers collision handling, counter invariants, and routine-fork resolution
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Fork engine tests: collision handling, counter invariants, and
//! routine-fork exercise resolution.

mod common;

use common::{
    create_test_database, create_test_exercise, create_test_exercise_with_relations,
    create_test_user,
};
use liftlog::database::{RoutineData, RoutineUnitData};
use liftlog::errors::AppError;
use liftlog::models::{ExerciseKind, RoutineKind};

#[tokio::test]
async fn fork_copies_exercise_with_relations() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let original = create_test_exercise_with_relations(&db, alice.id, "squat").await;

    let copy = db.fork_exercise(original.id, bob.id).await.unwrap();

    assert_eq!(copy.name, "squat");
    assert_eq!(copy.owner_id, bob.id);
    assert_eq!(copy.kind, ExerciseKind::Rew);
    assert_eq!(copy.forks_count, 0);
    assert_eq!(copy.tags, original.tags);
    assert_eq!(copy.tutorials, original.tutorials);
    assert_eq!(copy.muscles, original.muscles);

    let original = db.get_exercise(original.id).await.unwrap().unwrap();
    assert_eq!(original.forks_count, 1);
}

#[tokio::test]
async fn fork_collision_leaves_store_untouched() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let original = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;
    create_test_exercise(&db, bob.id, "squat", ExerciseKind::Rep).await;

    let count_before = db.count_exercises().await.unwrap();
    let result = db.fork_exercise(original.id, bob.id).await;

    assert!(matches!(result, Err(AppError::NameCollision(_))));
    assert_eq!(db.count_exercises().await.unwrap(), count_before);
    let original = db.get_exercise(original.id).await.unwrap().unwrap();
    assert_eq!(original.forks_count, 0);
}

#[tokio::test]
async fn self_fork_is_a_collision() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let exercise = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;

    let result = db.fork_exercise(exercise.id, alice.id).await;
    assert!(matches!(result, Err(AppError::NameCollision(_))));
}

#[tokio::test]
async fn fork_counter_only_touches_the_original() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let squat = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;
    let plank = create_test_exercise(&db, alice.id, "plank", ExerciseKind::Tim).await;

    db.fork_exercise(squat.id, bob.id).await.unwrap();

    let squat = db.get_exercise(squat.id).await.unwrap().unwrap();
    let plank = db.get_exercise(plank.id).await.unwrap().unwrap();
    assert_eq!(squat.forks_count, 1);
    assert_eq!(plank.forks_count, 0);
}

#[tokio::test]
async fn routine_fork_forks_missing_exercises_along() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let squat = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;
    let routine = db
        .create_routine(
            alice.id,
            &RoutineData {
                name: "leg day".to_owned(),
                kind: RoutineKind::Standard,
                instructions: String::new(),
                units: vec![RoutineUnitData {
                    exercise_id: squat.id,
                    sets: 2,
                    instructions: "slow tempo".to_owned(),
                }],
            },
        )
        .await
        .unwrap();

    let count_before = db.count_exercises().await.unwrap();
    let copy = db.fork_routine(routine.id, bob.id).await.unwrap();

    // Exactly one new exercise, owned by bob, referenced by the copied unit.
    assert_eq!(db.count_exercises().await.unwrap(), count_before + 1);
    assert_eq!(copy.owner_id, bob.id);
    assert_eq!(copy.forks_count, 0);
    assert_eq!(copy.units.len(), 1);
    assert_eq!(copy.units[0].sets, 2);
    assert_eq!(copy.units[0].instructions, "slow tempo");
    assert_ne!(copy.units[0].exercise_id, squat.id);

    let forked_exercise = db
        .get_exercise(copy.units[0].exercise_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(forked_exercise.owner_id, bob.id);
    assert_eq!(forked_exercise.name, "squat");

    let squat = db.get_exercise(squat.id).await.unwrap().unwrap();
    let routine = db.get_routine(routine.id).await.unwrap().unwrap();
    assert_eq!(squat.forks_count, 1);
    assert_eq!(routine.forks_count, 1);
}

#[tokio::test]
async fn routine_fork_reuses_same_name_exercise() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let alices_squat = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;
    let bobs_squat = create_test_exercise(&db, bob.id, "squat", ExerciseKind::Rep).await;

    let routine = db
        .create_routine(
            alice.id,
            &RoutineData {
                name: "leg day".to_owned(),
                kind: RoutineKind::Circuit,
                instructions: String::new(),
                units: vec![RoutineUnitData {
                    exercise_id: alices_squat.id,
                    sets: 3,
                    instructions: String::new(),
                }],
            },
        )
        .await
        .unwrap();

    let count_before = db.count_exercises().await.unwrap();
    let copy = db.fork_routine(routine.id, bob.id).await.unwrap();

    // No exercise was duplicated; the unit points at bob's own squat.
    assert_eq!(db.count_exercises().await.unwrap(), count_before);
    assert_eq!(copy.units[0].exercise_id, bobs_squat.id);
    assert_eq!(copy.kind, RoutineKind::Circuit);

    let alices_squat = db.get_exercise(alices_squat.id).await.unwrap().unwrap();
    assert_eq!(alices_squat.forks_count, 0);
}

#[tokio::test]
async fn routine_fork_collision_rolls_back() {
    let db = create_test_database().await;
    let alice = create_test_user(&db, "alice").await;
    let bob = create_test_user(&db, "bob").await;

    let squat = create_test_exercise(&db, alice.id, "squat", ExerciseKind::Rep).await;
    let routine = db
        .create_routine(
            alice.id,
            &RoutineData {
                name: "leg day".to_owned(),
                kind: RoutineKind::Standard,
                instructions: String::new(),
                units: vec![RoutineUnitData {
                    exercise_id: squat.id,
                    sets: 2,
                    instructions: String::new(),
                }],
            },
        )
        .await
        .unwrap();

    // Bob already owns a routine with this name.
    db.create_routine(
        bob.id,
        &RoutineData {
            name: "leg day".to_owned(),
            kind: RoutineKind::Standard,
            instructions: String::new(),
            units: vec![],
        },
    )
    .await
    .unwrap();

    let count_before = db.count_exercises().await.unwrap();
    let result = db.fork_routine(routine.id, bob.id).await;

    assert!(matches!(result, Err(AppError::NameCollision(_))));
    assert_eq!(db.count_exercises().await.unwrap(), count_before);
    let routine = db.get_routine(routine.id).await.unwrap().unwrap();
    assert_eq!(routine.forks_count, 0);
}
