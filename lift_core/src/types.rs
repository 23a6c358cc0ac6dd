//! Core domain types for the lift workout log.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercises and their identifiers
//! - Workouts (one per training day)
//! - Parsed quick entries and the set records they expand into

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Stable identifier of an exercise (e.g. "back_squat")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ExerciseId(pub String);

impl ExerciseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExerciseId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WorkoutId(pub Uuid);

impl WorkoutId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkoutId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// Exercise and Workout
// ============================================================================

/// An exercise definition (e.g. "Back Squat", shortcut "sq")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub shortcut: String,
    pub category: Option<String>,
    pub equipment: Option<String>,
}

/// The container of all sets logged on a given day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub id: WorkoutId,
    pub name: String,
    pub day: NaiveDate,
    pub started_at: DateTime<Utc>,
}

// ============================================================================
// Quick Entry and Set Types
// ============================================================================

/// Structured result of tokenizing one quick-entry line
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedIntent {
    /// Lowercased exercise shortcut
    pub shortcut: String,
    pub weight: f64,
    pub set_count: u32,
    pub rep_count: u32,
    /// Text of the last `!flag`, lowercased
    pub difficulty: Option<String>,
    /// `#tag` values in order of appearance, duplicates kept
    pub tags: Vec<String>,
    /// Remaining tokens joined by single spaces
    pub notes: Option<String>,
}

/// One logged set, not yet bound to a store
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetRecord {
    pub exercise_id: ExerciseId,
    pub weight: f64,
    pub reps: u32,
    pub set_number: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub difficulty: Option<String>,
    pub notes: Option<String>,
}

/// A set record after it has been persisted
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct StoredSet {
    pub id: Uuid,
    pub workout_id: WorkoutId,
    #[serde(flatten)]
    pub record: SetRecord,
    pub completed_at: DateTime<Utc>,
}

impl StoredSet {
    /// Bind a record to a workout, stamping it with a fresh id and time
    pub fn new(workout_id: WorkoutId, record: SetRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            workout_id,
            record,
            completed_at: Utc::now(),
        }
    }
}
