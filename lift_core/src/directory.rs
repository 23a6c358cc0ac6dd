//! Exercise directory: shortcut lookup over the known exercises.
//!
//! The quick-entry parser only sees the [`ExerciseDirectory`] trait, so any
//! backing (the in-memory catalog here, a database elsewhere) can resolve
//! shortcuts.

use crate::config::CustomExercise;
use crate::types::{Exercise, ExerciseId};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Maximum length of an exercise shortcut
pub const MAX_SHORTCUT_LEN: usize = 20;

/// Resolves user-typed shortcuts to exercises
pub trait ExerciseDirectory {
    /// Case-insensitive lookup. Returns `None` for unknown text, never fails.
    fn resolve_shortcut(&self, text: &str) -> Option<ExerciseId>;
}

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<ExerciseCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static ExerciseCatalog {
    &DEFAULT_CATALOG
}

/// In-memory exercise directory
#[derive(Clone, Debug, Default)]
pub struct ExerciseCatalog {
    exercises: Vec<Exercise>,
    by_shortcut: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
}

impl ExerciseCatalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        let mut catalog = Self::default();
        for exercise in exercises {
            catalog.insert(exercise);
        }
        catalog
    }

    /// Add an exercise. A later exercise with the same shortcut or name
    /// shadows the earlier one for lookups; `validate` reports the clash.
    pub fn insert(&mut self, exercise: Exercise) {
        let idx = self.exercises.len();
        self.by_shortcut
            .insert(exercise.shortcut.to_lowercase(), idx);
        self.by_name.insert(normalize_name(&exercise.name), idx);
        self.exercises.push(exercise);
    }

    /// The default catalog extended with exercises from config
    pub fn with_custom(custom: &[CustomExercise]) -> Self {
        let mut catalog = get_default_catalog().clone();
        for c in custom {
            catalog.insert(Exercise {
                id: ExerciseId::new(c.id.clone()),
                name: c.name.clone(),
                shortcut: c.shortcut.to_lowercase(),
                category: c.category.clone(),
                equipment: c.equipment.clone(),
            });
        }
        catalog
    }

    pub fn get(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().rev().find(|e| &e.id == id)
    }

    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    /// Display name for an exercise id, falling back to the id itself
    pub fn name_of(&self, id: &ExerciseId) -> String {
        self.get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_shortcuts = HashSet::new();
        let mut seen_ids = HashSet::new();

        for exercise in &self.exercises {
            let shortcut = exercise.shortcut.to_lowercase();
            if shortcut.is_empty() {
                errors.push(format!("Exercise '{}' has an empty shortcut", exercise.id));
            } else {
                if shortcut.len() > MAX_SHORTCUT_LEN {
                    errors.push(format!(
                        "Shortcut '{}' of '{}' exceeds {} characters",
                        shortcut, exercise.id, MAX_SHORTCUT_LEN
                    ));
                }
                if !shortcut.chars().all(|c| c.is_ascii_alphanumeric()) {
                    errors.push(format!(
                        "Shortcut '{}' of '{}' must be alphanumeric",
                        shortcut, exercise.id
                    ));
                }
            }

            if !seen_shortcuts.insert(shortcut.clone()) {
                errors.push(format!("Shortcut '{}' is used more than once", shortcut));
            }
            if !seen_ids.insert(exercise.id.clone()) {
                errors.push(format!("Exercise id '{}' is used more than once", exercise.id));
            }
        }

        errors
    }
}

impl ExerciseDirectory for ExerciseCatalog {
    fn resolve_shortcut(&self, text: &str) -> Option<ExerciseId> {
        let key = text.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }

        let idx = self
            .by_shortcut
            .get(&key)
            .or_else(|| self.by_name.get(&normalize_name(&key)))?;
        self.exercises.get(*idx).map(|e| e.id.clone())
    }
}

/// Lowercase and drop everything that is not alphanumeric
/// ("Bench Press" -> "benchpress")
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Builds the default catalog with the common barbell and bodyweight lifts
fn build_default_catalog() -> ExerciseCatalog {
    let entries: [(&str, &str, &str, &str, &str); 12] = [
        ("back_squat", "Back Squat", "sq", "legs", "barbell"),
        ("front_squat", "Front Squat", "fs", "legs", "barbell"),
        ("bench_press", "Bench Press", "bp", "chest", "barbell"),
        ("incline_bench_press", "Incline Bench Press", "ibp", "chest", "barbell"),
        ("deadlift", "Deadlift", "dl", "back", "barbell"),
        ("romanian_deadlift", "Romanian Deadlift", "rdl", "legs", "barbell"),
        ("overhead_press", "Overhead Press", "ohp", "shoulders", "barbell"),
        ("barbell_row", "Barbell Row", "row", "back", "barbell"),
        ("pullup", "Pull-up", "pu", "back", "bodyweight"),
        ("chinup", "Chin-up", "cu", "back", "bodyweight"),
        ("dip", "Dip", "dip", "chest", "bodyweight"),
        ("hip_thrust", "Hip Thrust", "ht", "legs", "barbell"),
    ];

    ExerciseCatalog::new(
        entries
            .iter()
            .map(|(id, name, shortcut, category, equipment)| Exercise {
                id: ExerciseId::new(*id),
                name: (*name).into(),
                shortcut: (*shortcut).into(),
                category: Some((*category).into()),
                equipment: Some((*equipment).into()),
            })
            .collect(),
    )
}
