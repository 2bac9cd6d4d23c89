// ABOUTME: Reconciles workout log entries against routine templates
// ABOUTME: Produces sorted human-readable lists of missing and excess sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Workout/routine integrity reconciliation.
//!
//! A workout's log entries are reconciled against its routine template: every
//! `(exercise, set_number)` pair the routine requires must be present, and
//! nothing beyond those pairs is allowed. Without a routine the rules relax:
//! any set numbers are fine as long as each exercise's sets are gap-free from
//! one up to its highest submitted set. The asymmetry is deliberate; freeform
//! workouts are not constrained to any template.

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

/// One `(exercise, set_number)` pair submitted in a workout payload
#[derive(Debug, Clone)]
pub struct SubmittedSet {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub set_number: i64,
}

/// One routine unit's requirement: sets one through `sets` for the exercise
#[derive(Debug, Clone)]
pub struct RequiredUnit {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub sets: i64,
}

/// Compare submitted log entries against a routine's required sets (or, with
/// no routine, against their own per-exercise contiguity) and return a sorted
/// list of human-readable discrepancies. Empty means integrity holds.
#[must_use]
pub fn reconcile(routine_units: Option<&[RequiredUnit]>, submitted: &[SubmittedSet]) -> Vec<String> {
    let mut names: BTreeMap<Uuid, &str> = BTreeMap::new();
    let mut submitted_pairs: BTreeSet<(Uuid, i64)> = BTreeSet::new();
    for entry in submitted {
        names.insert(entry.exercise_id, &entry.exercise_name);
        submitted_pairs.insert((entry.exercise_id, entry.set_number));
    }

    let mut issues = Vec::new();

    if let Some(units) = routine_units {
        let mut required_pairs: BTreeSet<(Uuid, i64)> = BTreeSet::new();
        for unit in units {
            names.insert(unit.exercise_id, &unit.exercise_name);
            for set_number in 1..=unit.sets {
                required_pairs.insert((unit.exercise_id, set_number));
            }
        }

        for (exercise_id, set_number) in submitted_pairs.difference(&required_pairs) {
            issues.push(format!(
                "Exercise {}: set {set_number} should not be specified for this routine.",
                names[exercise_id]
            ));
        }
        for (exercise_id, set_number) in required_pairs.difference(&submitted_pairs) {
            issues.push(format!(
                "Exercise {}: set {set_number} is missing.",
                names[exercise_id]
            ));
        }
    } else {
        // No template: only gaps below each exercise's highest set are errors.
        let mut max_sets: BTreeMap<Uuid, i64> = BTreeMap::new();
        for (exercise_id, set_number) in &submitted_pairs {
            let max = max_sets.entry(*exercise_id).or_insert(0);
            *max = (*max).max(*set_number);
        }

        for (exercise_id, max) in max_sets {
            for set_number in 1..=max {
                if !submitted_pairs.contains(&(exercise_id, set_number)) {
                    issues.push(format!(
                        "Exercise {}: set {set_number} is missing.",
                        names[&exercise_id]
                    ));
                }
            }
        }
    }

    issues.sort();
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(name: &str, id: Uuid, sets: &[i64]) -> Vec<SubmittedSet> {
        sets.iter()
            .map(|&set_number| SubmittedSet {
                exercise_id: id,
                exercise_name: name.to_owned(),
                set_number,
            })
            .collect()
    }

    fn unit(name: &str, id: Uuid, sets: i64) -> RequiredUnit {
        RequiredUnit {
            exercise_id: id,
            exercise_name: name.to_owned(),
            sets,
        }
    }

    #[test]
    fn matching_submission_produces_no_issues() {
        let id = Uuid::new_v4();
        let units = [unit("squat", id, 3)];
        let entries = submitted("squat", id, &[1, 2, 3]);
        assert!(reconcile(Some(&units), &entries).is_empty());
    }

    #[test]
    fn gap_against_routine_is_reported_exactly_once() {
        let id = Uuid::new_v4();
        let units = [unit("squat", id, 3)];
        let entries = submitted("squat", id, &[1, 3]);
        assert_eq!(
            reconcile(Some(&units), &entries),
            vec!["Exercise squat: set 2 is missing."]
        );
    }

    #[test]
    fn excess_and_missing_reported_together() {
        let rep = Uuid::new_v4();
        let tim = Uuid::new_v4();
        let units = [unit("rows", rep, 3)];
        let mut entries = submitted("rows", rep, &[1, 2]);
        entries.extend(submitted("plank", tim, &[3]));

        assert_eq!(
            reconcile(Some(&units), &entries),
            vec![
                "Exercise plank: set 3 should not be specified for this routine.",
                "Exercise rows: set 3 is missing.",
            ]
        );
    }

    #[test]
    fn without_routine_only_gaps_are_errors() {
        let rep = Uuid::new_v4();
        let tim = Uuid::new_v4();
        let mut entries = submitted("rows", rep, &[1, 3]);
        entries.extend(submitted("plank", tim, &[5]));

        assert_eq!(
            reconcile(None, &entries),
            vec![
                "Exercise plank: set 1 is missing.",
                "Exercise plank: set 2 is missing.",
                "Exercise plank: set 3 is missing.",
                "Exercise plank: set 4 is missing.",
                "Exercise rows: set 2 is missing.",
            ]
        );
    }

    #[test]
    fn empty_input_is_clean() {
        assert!(reconcile(None, &[]).is_empty());
        let units = [unit("squat", Uuid::new_v4(), 2)];
        assert_eq!(reconcile(Some(&units), &[]).len(), 2);
    }
}
