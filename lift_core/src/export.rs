//! CSV export of logged sets.

use crate::directory::ExerciseCatalog;
use crate::{Result, StoredSet};
use std::fs::File;
use std::path::Path;

/// Column names, in `CsvRow` field order
const HEADERS: [&str; 11] = [
    "id",
    "workout_id",
    "completed_at",
    "exercise_id",
    "exercise",
    "set_number",
    "weight",
    "reps",
    "difficulty",
    "tags",
    "notes",
];

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    workout_id: String,
    completed_at: String,
    exercise_id: String,
    exercise: String,
    set_number: u32,
    weight: f64,
    reps: u32,
    difficulty: Option<String>,
    tags: String,
    notes: Option<String>,
}

impl CsvRow {
    fn new(set: &StoredSet, catalog: &ExerciseCatalog) -> Self {
        CsvRow {
            id: set.id.to_string(),
            workout_id: set.workout_id.to_string(),
            completed_at: set.completed_at.to_rfc3339(),
            exercise_id: set.record.exercise_id.to_string(),
            exercise: catalog.name_of(&set.record.exercise_id),
            set_number: set.record.set_number,
            weight: set.record.weight,
            reps: set.record.reps,
            difficulty: set.record.difficulty.clone(),
            tags: set.record.tags.join(","),
            notes: set.record.notes.clone(),
        }
    }
}

/// Write sets to `path` as CSV, replacing any existing file
///
/// The file is synced to disk before returning. Returns the number of rows
/// written.
pub fn export_sets_csv(sets: &[StoredSet], catalog: &ExerciseCatalog, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    // Header written by hand so an empty export still has one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(HEADERS)?;

    for set in sets {
        writer.serialize(CsvRow::new(set, catalog))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", sets.len(), path);
    Ok(sets.len())
}
