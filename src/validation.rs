// ABOUTME: Pure unit-field validation for workout log entries
// ABOUTME: Also hosts YouTube-link and tag-name format checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Per-entry unit validation and payload format checks.
//!
//! Every exercise kind requires exactly one subset of the numeric units
//! (reps, weight, time, distance) on its log entries; all other units must be
//! null. `validate_units` is a pure function so it can be checked exhaustively
//! against every kind/subset combination.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ExerciseKind;

/// The four numeric unit fields a workout log entry may carry
pub const UNIT_FIELDS: [&str; 4] = ["reps", "weight", "time", "distance"];

/// Nullable unit values submitted for one log entry
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEntryUnits {
    pub reps: Option<i64>,
    pub weight: Option<f64>,
    pub time: Option<i64>,
    pub distance: Option<f64>,
}

impl LogEntryUnits {
    fn is_present(&self, field: &str) -> bool {
        match field {
            "reps" => self.reps.is_some(),
            "weight" => self.weight.is_some(),
            "time" => self.time.is_some(),
            "distance" => self.distance.is_some(),
            _ => false,
        }
    }
}

/// A validation failure attached to one unit field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Units required for an exercise kind; every other unit is forbidden
const fn required_units(kind: ExerciseKind) -> &'static [&'static str] {
    match kind {
        ExerciseKind::Rep => &["reps"],
        ExerciseKind::Rew => &["reps", "weight"],
        ExerciseKind::Tim => &["time"],
        ExerciseKind::Dis => &["distance"],
    }
}

/// Validate that a log entry's unit fields match the requirements of the
/// exercise kind. Returns one error per offending field; an empty vector
/// means the entry is well-formed.
#[must_use]
pub fn validate_units(kind: ExerciseKind, units: &LogEntryUnits) -> Vec<FieldError> {
    let required = required_units(kind);
    let mut errors = Vec::new();

    for field in UNIT_FIELDS {
        let is_required = required.contains(&field);
        let is_present = units.is_present(field);

        if is_required && !is_present {
            errors.push(FieldError {
                field,
                message: format!("{field} should be specified for this exercise"),
            });
        } else if !is_required && is_present {
            errors.push(FieldError {
                field,
                message: format!("{field} should not be specified for this exercise"),
            });
        }
    }

    errors
}

static YOUTUBE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?[^&=%?]{11}",
    )
    .unwrap_or_else(|e| unreachable!("invalid YouTube pattern: {e}"))
});

/// Check that a tutorial URL points at YouTube
#[must_use]
pub fn is_youtube_link(url: &str) -> bool {
    YOUTUBE_PATTERN.is_match(url)
}

/// Check that a tag name contains only ASCII letters and digits
#[must_use]
pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|ch| ch.is_ascii_alphanumeric())
}
