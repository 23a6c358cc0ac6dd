use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use lift_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "lift")]
#[command(about = "Workout log with quick-entry shorthand", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Training day to log into or show (YYYY-MM-DD, default today)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log sets from a quick entry, e.g. `lift log sq 225 3x5 !hard #belt`
    Log {
        /// The entry: <shortcut> <weight> <sets>x<reps> [!flag] [#tag ...] [notes ...]
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        entry: Vec<String>,
    },

    /// Log sets from explicit fields
    Add {
        /// Exercise shortcut or name
        #[arg(long)]
        exercise: String,

        #[arg(long)]
        weight: f64,

        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        reps: u32,

        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=100))]
        sets: u32,

        /// Tag to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        #[arg(long)]
        difficulty: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the sets logged today
    Today,

    /// List known exercises and their shortcuts
    Exercises,

    /// Export all logged sets to a CSV file
    Export {
        path: PathBuf,
    },

    /// Write a config file with default settings
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Paths and collaborators shared by every command
struct App {
    catalog: ExerciseCatalog,
    sets: JsonlSetStore,
    workouts: WorkoutLog,
    unit: WeightUnit,
    day: NaiveDate,
}

fn main() -> ExitCode {
    // Initialize logging
    lift_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let options = Options {
        data_dir: cli.data_dir.as_deref(),
        config: cli.config.as_deref(),
        date: cli.date,
    };

    match cli.command {
        Commands::Init { force } => cmd_init(options.config, force),
        Commands::Log { entry } => cmd_log(&load_app(&options)?, &entry.join(" ")),
        Commands::Add {
            exercise,
            weight,
            reps,
            sets,
            tags,
            difficulty,
            notes,
        } => {
            let intent = ParsedIntent {
                shortcut: exercise.to_lowercase(),
                weight,
                set_count: sets,
                rep_count: reps,
                difficulty: difficulty.map(|d| d.to_lowercase()),
                tags,
                notes: notes.filter(|n| !n.trim().is_empty()),
            };
            cmd_add(&load_app(&options)?, intent)
        }
        Commands::Today => cmd_today(&load_app(&options)?),
        Commands::Exercises => cmd_exercises(&load_app(&options)?),
        Commands::Export { path } => cmd_export(&load_app(&options)?, &path),
    }
}

/// Global options, split from the subcommand
struct Options<'a> {
    data_dir: Option<&'a Path>,
    config: Option<&'a Path>,
    date: Option<NaiveDate>,
}

fn load_app(options: &Options) -> Result<App> {
    let config = match options.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = options
        .data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let catalog = ExerciseCatalog::with_custom(&config.exercises.custom);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    Ok(App {
        catalog,
        sets: JsonlSetStore::new(data_dir.join("sets.jsonl")),
        workouts: WorkoutLog::new(data_dir.join("workouts.jsonl")),
        unit: config.units.weight_unit,
        day: options
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    })
}

fn cmd_log(app: &App, line: &str) -> Result<()> {
    // Parse before touching storage so a rejected line creates nothing
    let entry = QuickEntryParser::new(&app.catalog)
        .parse(line)
        .map_err(|e| {
            tracing::info!(kind = e.kind(), "Rejected quick entry {:?}", line);
            e
        })?;
    record(app, &entry)
}

fn cmd_add(app: &App, intent: ParsedIntent) -> Result<()> {
    if !intent.weight.is_finite() || intent.weight < 0.0 {
        return Err(ParseError::InvalidWeight(intent.weight.to_string()).into());
    }

    let exercise_id = app
        .catalog
        .resolve_shortcut(&intent.shortcut)
        .ok_or_else(|| ParseError::ExerciseNotFound(intent.shortcut.clone()))?;

    record(
        app,
        &ResolvedEntry {
            exercise_id,
            intent,
        },
    )
}

fn record(app: &App, entry: &ResolvedEntry) -> Result<()> {
    let workout = app.workouts.get_or_create(app.day)?;
    let stored = log_entry(entry, workout.id, &app.sets)?;

    println!(
        "✓ Logged {} set{} of {}",
        stored.len(),
        if stored.len() == 1 { "" } else { "s" },
        app.catalog.name_of(&entry.exercise_id)
    );
    for set in &stored {
        println!("  {}", format_set(&set.record, app.unit));
    }

    Ok(())
}

fn cmd_today(app: &App) -> Result<()> {
    let Some(workout) = app.workouts.find_by_day(app.day)? else {
        println!("No workout logged on {}.", app.day);
        return Ok(());
    };

    let sets = app.sets.sets_for_workout(workout.id)?;
    tracing::debug!("Workout {} has {} sets", workout.id, sets.len());
    println!("{} ({} sets)", workout.name, sets.len());

    // Exercises in the order they were first logged
    let mut order: Vec<&ExerciseId> = Vec::new();
    for set in &sets {
        if !order.contains(&&set.record.exercise_id) {
            order.push(&set.record.exercise_id);
        }
    }

    for exercise_id in order {
        println!();
        println!("  {}", app.catalog.name_of(exercise_id));
        let mut records: Vec<&SetRecord> = sets
            .iter()
            .map(|s| &s.record)
            .filter(|r| &r.exercise_id == exercise_id)
            .collect();
        records.sort_by_key(|r| r.set_number);
        for r in records {
            println!("    {}", format_set(r, app.unit));
        }
    }

    Ok(())
}

fn cmd_exercises(app: &App) -> Result<()> {
    let mut exercises: Vec<&Exercise> = app.catalog.exercises().iter().collect();
    exercises.sort_by(|a, b| a.shortcut.cmp(&b.shortcut));

    for exercise in exercises {
        println!(
            "  {:<8} {:<24} {}",
            exercise.shortcut,
            exercise.name,
            exercise.category.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn cmd_init(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_config_path);

    if path.exists() && !force {
        println!("Config already exists at {} (use --force to replace)", path.display());
        return Ok(());
    }

    let config = Config::default();
    if path == Config::default_config_path() {
        config.save()?;
    } else {
        config.save_to(&path)?;
    }

    println!("✓ Wrote default config");
    println!("  Config: {}", path.display());
    Ok(())
}

fn cmd_export(app: &App, path: &Path) -> Result<()> {
    let sets = app.sets.all_sets()?;
    let count = export_sets_csv(&sets, &app.catalog, path)?;

    println!("✓ Exported {} sets to CSV", count);
    println!("  CSV: {}", path.display());
    Ok(())
}

/// `#1  225 lbs x 5  !hard  #belt  using new shoes`
fn format_set(record: &SetRecord, unit: WeightUnit) -> String {
    let mut line = format!(
        "#{:<3} {} {} x {}",
        record.set_number,
        record.weight,
        unit.label(),
        record.reps
    );
    if let Some(ref difficulty) = record.difficulty {
        line.push_str(&format!("  !{}", difficulty));
    }
    for tag in &record.tags {
        line.push_str(&format!("  #{}", tag));
    }
    if let Some(ref notes) = record.notes {
        line.push_str(&format!("  {}", notes));
    }
    line
}
