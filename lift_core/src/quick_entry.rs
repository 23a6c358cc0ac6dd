//! Quick-entry parsing and set expansion.
//!
//! A quick entry is one line of shorthand:
//!
//! ```text
//! <shortcut> <weight> <sets>x<reps> [!flag] [#tag ...] [notes ...]
//! ```
//!
//! e.g. `sq 225 3x5 !hard #belt using new shoes`. The first three tokens are
//! positional; everything after them is classified token by token: `!` marks
//! the difficulty flag (the last one wins), `#` marks a tag, and anything
//! else is appended to the notes in order of appearance.
//!
//! Parsing is pure. Numbering and persistence go through a [`SetStore`] in
//! a single call so the store can serialize concurrent entries.

use crate::directory::ExerciseDirectory;
use crate::error::ParseError;
use crate::store::SetStore;
use crate::types::{ExerciseId, ParsedIntent, SetRecord, StoredSet, WorkoutId};
use crate::{Error, Result};

/// Upper bound on the set count of a single entry
pub const MAX_SET_COUNT: u32 = 100;

/// Tokenize and validate one quick-entry line.
///
/// No exercise lookup happens here; see [`QuickEntryParser::parse`].
pub fn parse_intent(line: &str) -> std::result::Result<ParsedIntent, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    if tokens.len() < 3 {
        return Err(ParseError::MalformedEntry(
            "expected shortcut weight setsxreps".into(),
        ));
    }

    let shortcut = tokens[0].to_lowercase();
    if !shortcut.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::MalformedEntry(format!(
            "shortcut '{}' must be alphanumeric",
            tokens[0]
        )));
    }

    let weight = parse_weight(tokens[1])?;
    let (set_count, rep_count) = parse_sets_reps(tokens[2])?;

    let mut difficulty = None;
    let mut tags = Vec::new();
    let mut notes = Vec::new();

    for token in &tokens[3..] {
        if let Some(flag) = token.strip_prefix('!') {
            if flag.is_empty() {
                continue;
            }
            if let Some(previous) = &difficulty {
                tracing::debug!("Flag '!{}' replaces earlier '!{}'", flag, previous);
            }
            difficulty = Some(flag.to_lowercase());
        } else if let Some(tag) = token.strip_prefix('#') {
            if !tag.is_empty() {
                tags.push(tag.to_string());
            }
        } else {
            notes.push(*token);
        }
    }

    let intent = ParsedIntent {
        shortcut,
        weight,
        set_count,
        rep_count,
        difficulty,
        tags,
        notes: if notes.is_empty() {
            None
        } else {
            Some(notes.join(" "))
        },
    };

    tracing::debug!("Parsed quick entry {:?} -> {:?}", line, intent);
    Ok(intent)
}

/// Weight is a plain non-negative decimal: digits with at most one `.`
fn parse_weight(token: &str) -> std::result::Result<f64, ParseError> {
    let invalid = || ParseError::InvalidWeight(token.to_string());

    let mut digits = 0;
    let mut dots = 0;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return Err(invalid()),
        }
    }
    if digits == 0 || dots > 1 {
        return Err(invalid());
    }

    let weight: f64 = token.parse().map_err(|_| invalid())?;
    if !weight.is_finite() {
        return Err(invalid());
    }
    Ok(weight)
}

/// `<sets>x<reps>`, separator case-insensitive, both counts at least 1
fn parse_sets_reps(token: &str) -> std::result::Result<(u32, u32), ParseError> {
    let invalid = || ParseError::InvalidSetsReps {
        token: token.to_string(),
        reason: "expected <sets>x<reps>, e.g. 3x5".into(),
    };

    let lower = token.to_ascii_lowercase();
    let (sets_str, reps_str) = lower.split_once('x').ok_or_else(invalid)?;

    let sets = parse_count(sets_str).ok_or_else(invalid)?;
    let reps = parse_count(reps_str).ok_or_else(invalid)?;

    if sets > MAX_SET_COUNT {
        return Err(ParseError::InvalidSetsReps {
            token: token.to_string(),
            reason: format!("{} sets exceeds the limit of {} per entry", sets, MAX_SET_COUNT),
        });
    }

    Ok((sets, reps))
}

fn parse_count(s: &str) -> Option<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<u32>().ok().filter(|n| *n >= 1)
}

/// A parsed entry whose shortcut has been resolved to an exercise
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEntry {
    pub exercise_id: ExerciseId,
    pub intent: ParsedIntent,
}

impl ResolvedEntry {
    /// Expand into one record per set.
    ///
    /// Set numbers are consecutive, starting right after
    /// `highest_existing` (pass 0 when the exercise has no sets yet).
    /// Fails with [`Error::Storage`] if the run would pass `u32::MAX`.
    pub fn expand(&self, highest_existing: u32) -> Result<Vec<SetRecord>> {
        let out_of_range = || {
            Error::Storage(format!(
                "set numbers after {} for {} are out of range",
                highest_existing, self.exercise_id
            ))
        };
        let start = highest_existing.checked_add(1).ok_or_else(out_of_range)?;
        start
            .checked_add(self.intent.set_count.saturating_sub(1))
            .ok_or_else(out_of_range)?;

        Ok((0..self.intent.set_count)
            .map(|i| SetRecord {
                exercise_id: self.exercise_id.clone(),
                weight: self.intent.weight,
                reps: self.intent.rep_count,
                set_number: start + i,
                tags: self.intent.tags.clone(),
                difficulty: self.intent.difficulty.clone(),
                notes: self.intent.notes.clone(),
            })
            .collect())
    }
}

/// Parses quick entries against an exercise directory
pub struct QuickEntryParser<'a> {
    directory: &'a dyn ExerciseDirectory,
}

impl<'a> QuickEntryParser<'a> {
    pub fn new(directory: &'a dyn ExerciseDirectory) -> Self {
        Self { directory }
    }

    /// Parse a line and resolve its shortcut
    pub fn parse(&self, line: &str) -> std::result::Result<ResolvedEntry, ParseError> {
        let intent = parse_intent(line)?;

        let exercise_id = self
            .directory
            .resolve_shortcut(&intent.shortcut)
            .ok_or_else(|| ParseError::ExerciseNotFound(intent.shortcut.clone()))?;

        Ok(ResolvedEntry {
            exercise_id,
            intent,
        })
    }
}

/// Number and persist a resolved entry in one store call
pub fn log_entry<S: SetStore + ?Sized>(
    entry: &ResolvedEntry,
    workout_id: WorkoutId,
    store: &S,
) -> Result<Vec<StoredSet>> {
    let stored = store.create_numbered(workout_id, &entry.exercise_id, &|highest| {
        entry.expand(highest)
    })?;

    tracing::info!(
        "Logged {} set(s) of {} to workout {}",
        stored.len(),
        entry.exercise_id,
        workout_id
    );
    Ok(stored)
}

/// Parse a quick entry and log its sets into the given workout
pub fn log_quick_entry<S: SetStore + ?Sized>(
    line: &str,
    workout_id: WorkoutId,
    directory: &dyn ExerciseDirectory,
    store: &S,
) -> Result<Vec<StoredSet>> {
    let entry = QuickEntryParser::new(directory).parse(line)?;
    log_entry(&entry, workout_id, store)
}
