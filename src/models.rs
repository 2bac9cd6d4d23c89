// ABOUTME: Domain models for exercises, routines, workouts, and reference data
// ABOUTME: Defines the closed kind and muscle enumerations with their storage codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Domain models shared across the database and HTTP layers.
//!
//! Exercises, routines, and workouts are exclusively owned by one user; tags,
//! tutorial links, and muscles are shared, unowned reference data. Name
//! uniqueness for exercises and routines is per-owner, never global.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exercise kind, deciding which numeric units a log entry must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExerciseKind {
    /// Repetitions only
    #[serde(rename = "rep")]
    Rep,
    /// Repetitions under load
    #[serde(rename = "rew")]
    Rew,
    /// Timed hold or interval
    #[serde(rename = "tim")]
    Tim,
    /// Distance covered
    #[serde(rename = "dis")]
    Dis,
}

impl ExerciseKind {
    /// Three-letter storage code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rep => "rep",
            Self::Rew => "rew",
            Self::Tim => "tim",
            Self::Dis => "dis",
        }
    }

    /// Human-readable label used in API responses
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Rep => "reps",
            Self::Rew => "reps x weight",
            Self::Tim => "time",
            Self::Dis => "distance",
        }
    }

    /// Parse a storage code
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "rep" => Some(Self::Rep),
            "rew" => Some(Self::Rew),
            "tim" => Some(Self::Tim),
            "dis" => Some(Self::Dis),
            _ => None,
        }
    }
}

/// Routine kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutineKind {
    /// Straight sets, one exercise at a time
    #[serde(rename = "sta")]
    Standard,
    /// Exercises rotated in a circuit
    #[serde(rename = "cir")]
    Circuit,
}

impl RoutineKind {
    /// Three-letter storage code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "sta",
            Self::Circuit => "cir",
        }
    }

    /// Human-readable label used in API responses
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Circuit => "circuit",
        }
    }

    /// Parse a storage code
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "sta" => Some(Self::Standard),
            "cir" => Some(Self::Circuit),
            _ => None,
        }
    }
}

/// Closed enumeration of muscle groups. Reference data only; rows are seeded
/// by migration and never created or deleted at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Muscle {
    Calves,
    Quadriceps,
    Hamstrings,
    Gluteus,
    LowerBack,
    Lats,
    ScapularMuscles,
    Abdominals,
    Pectorals,
    Trapezius,
    Deltoids,
    Triceps,
    Biceps,
    Forearms,
}

impl Muscle {
    /// All fourteen muscle codes, in seed order
    pub const ALL: [Self; 14] = [
        Self::Calves,
        Self::Quadriceps,
        Self::Hamstrings,
        Self::Gluteus,
        Self::LowerBack,
        Self::Lats,
        Self::ScapularMuscles,
        Self::Abdominals,
        Self::Pectorals,
        Self::Trapezius,
        Self::Deltoids,
        Self::Triceps,
        Self::Biceps,
        Self::Forearms,
    ];

    /// Three-letter storage code
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Calves => "cal",
            Self::Quadriceps => "qua",
            Self::Hamstrings => "ham",
            Self::Gluteus => "glu",
            Self::LowerBack => "lob",
            Self::Lats => "lat",
            Self::ScapularMuscles => "sca",
            Self::Abdominals => "abs",
            Self::Pectorals => "pec",
            Self::Trapezius => "tra",
            Self::Deltoids => "del",
            Self::Triceps => "tri",
            Self::Biceps => "bic",
            Self::Forearms => "for",
        }
    }

    /// Display name matching the seeded reference rows
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Calves => "Calves",
            Self::Quadriceps => "Quadriceps",
            Self::Hamstrings => "Hamstrings",
            Self::Gluteus => "Gluteus",
            Self::LowerBack => "Lower back",
            Self::Lats => "Lats",
            Self::ScapularMuscles => "Scapular muscles",
            Self::Abdominals => "Abdominals",
            Self::Pectorals => "Pectorals",
            Self::Trapezius => "Trapezius",
            Self::Deltoids => "Deltoids",
            Self::Triceps => "Triceps",
            Self::Biceps => "Biceps",
            Self::Forearms => "Forearms",
        }
    }

    /// Parse a storage code
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }
}

/// Registered user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Single exercise with its shared reference-data associations
#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub kind: ExerciseKind,
    pub instructions: String,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub forks_count: i64,
    /// Tag names, deduplicated globally by name
    pub tags: Vec<String>,
    /// Tutorial video URLs, deduplicated globally by URL
    pub tutorials: Vec<String>,
    /// Muscle codes targeted by this exercise
    pub muscles: Vec<String>,
}

/// Exercise-within-routine association with a target set count
#[derive(Debug, Clone, Serialize)]
pub struct RoutineUnit {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub sets: i64,
    pub instructions: String,
}

/// Collection of exercises representing a workout template
#[derive(Debug, Clone, Serialize)]
pub struct Routine {
    pub id: Uuid,
    pub name: String,
    pub kind: RoutineKind,
    pub instructions: String,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub forks_count: i64,
    /// Units in creation order
    pub units: Vec<RoutineUnit>,
}

/// One logged set within a workout
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutLogEntry {
    pub exercise_id: Uuid,
    pub exercise_name: String,
    pub set_number: i64,
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub time: Option<i64>,
    pub distance: Option<f64>,
}

/// Completed or planned training session, optionally tied to a routine
#[derive(Debug, Clone, Serialize)]
pub struct Workout {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub routine_id: Option<Uuid>,
    pub log_entries: Vec<WorkoutLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_kind_round_trips_through_codes() {
        for kind in [
            ExerciseKind::Rep,
            ExerciseKind::Rew,
            ExerciseKind::Tim,
            ExerciseKind::Dis,
        ] {
            assert_eq!(ExerciseKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ExerciseKind::parse("xyz"), None);
    }

    #[test]
    fn muscle_codes_are_unique_and_complete() {
        let codes: std::collections::HashSet<_> =
            Muscle::ALL.iter().map(|m| m.code()).collect();
        assert_eq!(codes.len(), 14);
        assert_eq!(Muscle::parse("lob"), Some(Muscle::LowerBack));
        assert_eq!(Muscle::parse("xx"), None);
    }

    #[test]
    fn kind_display_names_match_api_contract() {
        assert_eq!(ExerciseKind::Rew.display_name(), "reps x weight");
        assert_eq!(RoutineKind::Circuit.display_name(), "circuit");
    }
}
