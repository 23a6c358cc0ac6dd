//! Set persistence.
//!
//! [`SetStore`] is the seam between quick entry and storage. Two stores are
//! provided: [`JsonlSetStore`] appends to a JSON Lines file with `fs2`
//! locking, and [`MemorySetStore`] keeps sets in memory behind a mutex.
//!
//! Both implement [`SetStore::create_numbered`] as a single critical
//! section, so two entries racing for the same exercise never receive the
//! same set number.

use crate::jsonl;
use crate::types::{ExerciseId, SetRecord, StoredSet, WorkoutId};
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage for logged sets
pub trait SetStore {
    /// Highest set number of `exercise_id` in `workout_id`, 0 if none
    fn highest_set_number(&self, workout_id: WorkoutId, exercise_id: &ExerciseId) -> Result<u32>;

    /// Persist records as given, in order
    fn create_sets(&self, workout_id: WorkoutId, records: &[SetRecord]) -> Result<Vec<StoredSet>>;

    /// All sets of one workout, in insertion order
    fn sets_for_workout(&self, workout_id: WorkoutId) -> Result<Vec<StoredSet>>;

    /// Every stored set, in insertion order
    fn all_sets(&self) -> Result<Vec<StoredSet>>;

    /// Read the highest set number, build records from it and persist them.
    ///
    /// The default runs the two steps back to back with no serialization;
    /// stores shared between writers override it.
    fn create_numbered(
        &self,
        workout_id: WorkoutId,
        exercise_id: &ExerciseId,
        build: &dyn Fn(u32) -> Result<Vec<SetRecord>>,
    ) -> Result<Vec<StoredSet>> {
        let highest = self.highest_set_number(workout_id, exercise_id)?;
        self.create_sets(workout_id, &build(highest)?)
    }
}

fn highest_in(sets: &[StoredSet], workout_id: WorkoutId, exercise_id: &ExerciseId) -> u32 {
    sets.iter()
        .filter(|s| s.workout_id == workout_id && &s.record.exercise_id == exercise_id)
        .map(|s| s.record.set_number)
        .max()
        .unwrap_or(0)
}

fn bind(workout_id: WorkoutId, records: &[SetRecord]) -> Vec<StoredSet> {
    records
        .iter()
        .cloned()
        .map(|record| StoredSet::new(workout_id, record))
        .collect()
}

// ============================================================================
// JSONL file store
// ============================================================================

/// JSONL-based set store with file locking
pub struct JsonlSetStore {
    path: PathBuf,
}

impl JsonlSetStore {
    /// Create a new store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all sets under a shared lock
    fn read_all(&self) -> Result<Vec<StoredSet>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;
        let result = jsonl::read_records::<StoredSet>(&file);
        file.unlock()?;

        let sets = result?;
        tracing::debug!("Read {} sets from {:?}", sets.len(), self.path);
        Ok(sets)
    }
}

impl SetStore for JsonlSetStore {
    fn highest_set_number(&self, workout_id: WorkoutId, exercise_id: &ExerciseId) -> Result<u32> {
        Ok(highest_in(&self.read_all()?, workout_id, exercise_id))
    }

    fn create_sets(&self, workout_id: WorkoutId, records: &[SetRecord]) -> Result<Vec<StoredSet>> {
        let stored = bind(workout_id, records);

        let file = jsonl::open_rw(&self.path)?;
        file.lock_exclusive()?;
        let result = jsonl::append_records(&file, &stored);
        file.unlock()?;
        result?;

        tracing::debug!("Appended {} sets to {:?}", stored.len(), self.path);
        Ok(stored)
    }

    fn sets_for_workout(&self, workout_id: WorkoutId) -> Result<Vec<StoredSet>> {
        let mut sets = self.read_all()?;
        sets.retain(|s| s.workout_id == workout_id);
        Ok(sets)
    }

    fn all_sets(&self) -> Result<Vec<StoredSet>> {
        self.read_all()
    }

    /// Holds the exclusive lock from reading the highest number until the
    /// new records are on disk.
    fn create_numbered(
        &self,
        workout_id: WorkoutId,
        exercise_id: &ExerciseId,
        build: &dyn Fn(u32) -> Result<Vec<SetRecord>>,
    ) -> Result<Vec<StoredSet>> {
        let file = jsonl::open_rw(&self.path)?;
        file.lock_exclusive()?;

        let result = (|| -> Result<Vec<StoredSet>> {
            let existing = jsonl::read_records::<StoredSet>(&file)?;
            let highest = highest_in(&existing, workout_id, exercise_id);
            let stored = bind(workout_id, &build(highest)?);
            jsonl::append_records(&file, &stored)?;
            tracing::debug!(
                "Appended {} sets of {} after highest {}",
                stored.len(),
                exercise_id,
                highest
            );
            Ok(stored)
        })();

        file.unlock()?;
        result
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory set store, safe to share between threads
#[derive(Debug, Default)]
pub struct MemorySetStore {
    sets: Mutex<Vec<StoredSet>>,
}

impl MemorySetStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredSet>>> {
        self.sets
            .lock()
            .map_err(|_| Error::Storage("set store mutex poisoned".into()))
    }
}

impl SetStore for MemorySetStore {
    fn highest_set_number(&self, workout_id: WorkoutId, exercise_id: &ExerciseId) -> Result<u32> {
        Ok(highest_in(&self.lock()?, workout_id, exercise_id))
    }

    fn create_sets(&self, workout_id: WorkoutId, records: &[SetRecord]) -> Result<Vec<StoredSet>> {
        let stored = bind(workout_id, records);
        self.lock()?.extend(stored.iter().cloned());
        Ok(stored)
    }

    fn sets_for_workout(&self, workout_id: WorkoutId) -> Result<Vec<StoredSet>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|s| s.workout_id == workout_id)
            .cloned()
            .collect())
    }

    fn all_sets(&self) -> Result<Vec<StoredSet>> {
        Ok(self.lock()?.clone())
    }

    fn create_numbered(
        &self,
        workout_id: WorkoutId,
        exercise_id: &ExerciseId,
        build: &dyn Fn(u32) -> Result<Vec<SetRecord>>,
    ) -> Result<Vec<StoredSet>> {
        let mut sets = self.lock()?;
        let highest = highest_in(&sets, workout_id, exercise_id);
        let stored = bind(workout_id, &build(highest)?);
        sets.extend(stored.iter().cloned());
        Ok(stored)
    }
}
