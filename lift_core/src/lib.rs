#![forbid(unsafe_code)]

//! Core domain model and business logic for the lift workout log.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, set records)
//! - Quick-entry parsing and set expansion
//! - Exercise directory lookup
//! - Persistence (JSONL set store, workout log, CSV export)

pub mod types;
pub mod error;
pub mod directory;
pub mod config;
pub mod logging;
mod jsonl;
pub mod quick_entry;
pub mod store;
pub mod workout;
pub mod export;

// Re-export commonly used types
pub use error::{Error, ParseError, Result};
pub use types::*;
pub use directory::{get_default_catalog, ExerciseCatalog, ExerciseDirectory};
pub use config::{Config, WeightUnit};
pub use quick_entry::{log_entry, log_quick_entry, parse_intent, QuickEntryParser, ResolvedEntry};
pub use store::{JsonlSetStore, MemorySetStore, SetStore};
pub use workout::WorkoutLog;
pub use export::export_sets_csv;
