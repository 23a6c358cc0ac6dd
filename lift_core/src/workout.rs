//! Workout log: one workout per training day.
//!
//! Workouts are appended to a JSON Lines file. The day is always supplied
//! by the caller so the core never consults the clock to decide which
//! workout a set belongs to.

use crate::jsonl;
use crate::types::{Workout, WorkoutId};
use crate::Result;
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use std::fs::File;
use std::path::PathBuf;

/// File-backed list of workouts
pub struct WorkoutLog {
    path: PathBuf,
}

impl WorkoutLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All workouts, oldest first
    pub fn list(&self) -> Result<Vec<Workout>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let result = jsonl::read_records::<Workout>(&file);
        file.unlock()?;
        result
    }

    /// The workout for `day`, if one was started
    pub fn find_by_day(&self, day: NaiveDate) -> Result<Option<Workout>> {
        Ok(self.list()?.into_iter().find(|w| w.day == day))
    }

    /// The workout for `day`, created if it does not exist yet
    ///
    /// Lookup and creation happen under one exclusive lock, so concurrent
    /// callers on the same day agree on a single workout.
    pub fn get_or_create(&self, day: NaiveDate) -> Result<Workout> {
        let file = jsonl::open_rw(&self.path)?;
        file.lock_exclusive()?;

        let result = (|| -> Result<Workout> {
            let workouts = jsonl::read_records::<Workout>(&file)?;
            if let Some(existing) = workouts.into_iter().find(|w| w.day == day) {
                return Ok(existing);
            }

            let workout = Workout {
                id: WorkoutId::new(),
                name: format!("Workout {}", day),
                day,
                started_at: Utc::now(),
            };
            jsonl::append_records(&file, std::slice::from_ref(&workout))?;
            tracing::info!("Started {} ({})", workout.name, workout.id);
            Ok(workout)
        })();

        file.unlock()?;
        result
    }
}
