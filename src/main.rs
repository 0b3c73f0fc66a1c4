use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, warn};

use tlmrs::config::AppConfig;
use tlmrs::dashboard::{DashboardStats, TrainingDataFacade};
use tlmrs::database::Database;
use tlmrs::error::{describe_failure, parse_date, ErrorSeverity};
use tlmrs::export::{export_report, ExportFormat, TrainingReport};
use tlmrs::logging::init_logging;
use tlmrs::models::{DailyLog, ExerciseEntry, Workout};
use tlmrs::risk::RiskLevel;
use tlmrs::seeder::{Seeder, MAX_SEED_DAYS};

/// tlmrs - Training Load Monitor
///
/// Log strength workouts and wellness, and track the acute:chronic
/// workload ratio to decide whether to push, maintain or back off.
#[derive(Parser)]
#[command(name = "tlmrs")]
#[command(version)]
#[command(about = "Training load monitor", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use this database file instead of the configured one
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save wellness (and optionally a workout) for a day, replacing any existing entry
    Log {
        /// Day to log (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Sleep quality (1-5)
        #[arg(short, long)]
        sleep: u8,

        /// Fatigue (1 = fresh, 5 = exhausted)
        #[arg(short, long)]
        fatigue: u8,

        /// JSON file with the session's exercises
        #[arg(short, long)]
        workout: Option<PathBuf>,
    },

    /// Append a finished workout to a day
    Workout {
        /// JSON file with the session's exercises
        #[arg(short = 'i', long)]
        file: PathBuf,

        /// Day of the session (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,

        /// Sleep quality, required if the day has no log yet
        #[arg(short, long)]
        sleep: Option<u8>,

        /// Fatigue, required if the day has no log yet
        #[arg(short, long)]
        fatigue: Option<u8>,
    },

    /// Show today's load ratio and recommendation
    Status {
        /// Evaluate as of this day (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Daily volume and ratio for recent days
    Trend {
        /// Number of days (default from config)
        #[arg(short = 'n', long)]
        days: Option<u16>,

        /// Last day of the window (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// List saved days, newest first
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "30")]
        limit: usize,
    },

    /// Show one day's log in detail
    Show {
        /// Day to show (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Delete one day's log
    Delete {
        /// Day to delete (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
    },

    /// Delete every saved log
    Clear,

    /// Replace the store with generated demo history
    Seed {
        /// Days of history before today
        #[arg(
            short = 'n',
            long,
            default_value = "30",
            value_parser = clap::value_parser!(u32).range(0..=MAX_SEED_DAYS as i64)
        )]
        days: u32,

        /// RNG seed for reproducible data
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Export the dashboard and trend
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json; default from file extension)
        #[arg(short = 'f', long)]
        format: Option<String>,

        /// Number of trend days (default from config)
        #[arg(short = 'n', long)]
        days: Option<u16>,
    },

    /// Show or initialise the configuration
    Config {
        /// Print the active configuration
        #[arg(short, long)]
        list: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "ACWR")]
    ratio: String,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Sleep")]
    sleep: u8,
    #[tabled(rename = "Fatigue")]
    fatigue: u8,
    #[tabled(rename = "Workouts")]
    workouts: usize,
    #[tabled(rename = "Volume")]
    volume: String,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let (severity, message) = describe_failure(&err);
            match severity {
                ErrorSeverity::Warning => {
                    warn!(error = %format!("{:#}", err), "Command rejected");
                    eprintln!("{} {}", "Warning:".yellow().bold(), message);
                }
                ErrorSeverity::Error | ErrorSeverity::Critical => {
                    error!(error = %format!("{:#}", err), "Command failed");
                    eprintln!("{} {}", "Error:".red().bold(), message);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {

    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    config.logging.level = config.logging.level.raised_by(cli.verbose);
    init_logging(&config.logging)?;

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path());

    match cli.command {
        Commands::Log {
            date,
            sleep,
            fatigue,
            workout,
        } => {
            let date = resolve_date(date.as_deref())?;
            let mut log = DailyLog::new(date, sleep, fatigue);
            if let Some(path) = workout {
                log.add_workout(Workout::new(date, read_exercises(&path)?));
            }

            let mut db = open_database(&db_path)?;
            db.save_daily_log(&log)?;
            println!(
                "{} {} (volume {})",
                "✓ Saved log for".green(),
                date,
                log.daily_load
            );
        }

        Commands::Workout {
            file,
            date,
            sleep,
            fatigue,
        } => {
            let date = resolve_date(date.as_deref())?;
            let workout = Workout::new(date, read_exercises(&file)?);
            let session_volume = workout.volume_load();

            let mut db = open_database(&db_path)?;
            let log = db.record_workout(workout, sleep, fatigue)?;
            println!(
                "{} {} (session {}, day total {})",
                "✓ Recorded workout for".green(),
                date,
                session_volume,
                log.daily_load
            );
        }

        Commands::Status { date } => {
            let today = resolve_date(date.as_deref())?;
            let facade = open_facade(&config, &db_path)?;
            let dashboard = facade.load(today)?;

            print_status(&dashboard.stats);
            match dashboard.today_log {
                Some(log) => println!(
                    "  Today:        {} workout(s), volume {}",
                    log.workouts.len(),
                    log.daily_load
                ),
                None => println!("  Today:        {}", "nothing logged yet".dimmed()),
            }
        }

        Commands::Trend { days, date } => {
            let today = resolve_date(date.as_deref())?;
            let days = days.unwrap_or(config.settings.trend_days);
            let facade = open_facade(&config, &db_path)?;

            let rows: Vec<TrendRow> = facade
                .trend(today, days)?
                .into_iter()
                .map(|point| TrendRow {
                    date: point.date.format("%d/%m").to_string(),
                    volume: point.volume.round_dp(0).to_string(),
                    ratio: point.ratio.round_dp(2).to_string(),
                })
                .collect();

            println!("{}", Table::new(rows).with(Style::rounded()));
        }

        Commands::History { limit } => {
            let db = open_database(&db_path)?;
            let rows: Vec<HistoryRow> = db
                .get_daily_logs()?
                .into_iter()
                .rev()
                .take(limit)
                .map(|log| HistoryRow {
                    date: log.date.to_string(),
                    sleep: log.sleep_quality,
                    fatigue: log.fatigue,
                    workouts: log.workouts.len(),
                    volume: log.daily_load.round_dp(1).to_string(),
                })
                .collect();

            if rows.is_empty() {
                println!("{}", "No logs yet".dimmed());
            } else {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }

        Commands::Show { date } => {
            let date = parse_date(&date)?;
            let db = open_database(&db_path)?;
            let log = db.require_log_for_date(date)?;

            println!("{}", format!("Log for {}", log.date).bold());
            println!("  Sleep:   {}", log.sleep_quality);
            println!("  Fatigue: {}", log.fatigue);
            println!("  Volume:  {}", log.daily_load);
            for (i, workout) in log.workouts.iter().enumerate() {
                println!("  Workout {} ({})", i + 1, workout.volume_load());
                for exercise in &workout.exercises {
                    let sets: Vec<String> = exercise
                        .sets
                        .iter()
                        .map(|set| match set.rpe {
                            Some(rpe) => format!("{}x{} @{}", set.reps, set.weight, rpe),
                            None => format!("{}x{}", set.reps, set.weight),
                        })
                        .collect();
                    println!("    {}: {}", exercise.exercise_name, sets.join(", "));
                }
            }
        }

        Commands::Delete { date } => {
            let date = parse_date(&date)?;
            let mut db = open_database(&db_path)?;
            if db.delete_log(date)? {
                println!("{} {}", "✓ Deleted log for".green(), date);
            } else {
                println!("{} {}", "No log saved for".yellow(), date);
            }
        }

        Commands::Clear => {
            let mut db = open_database(&db_path)?;
            let removed = db.clear_all()?;
            println!("{} {} log(s)", "✓ Cleared".green(), removed);
        }

        Commands::Seed { days, seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            let mut db = open_database(&db_path)?;
            let count = Seeder::seed(&mut db, today(), days, &mut rng)?;
            println!("{} {} days of demo history", "✓ Seeded".green(), count);
        }

        Commands::Export {
            output,
            format,
            days,
        } => {
            let format = match format {
                Some(name) => ExportFormat::from_str(&name)?,
                None => ExportFormat::from_path(&output).unwrap_or(ExportFormat::Csv),
            };
            let days = days.unwrap_or(config.settings.trend_days);

            let facade = open_facade(&config, &db_path)?;
            let today = today();
            let logs = facade.source().get_daily_logs()?;
            let report = TrainingReport::new(
                facade.stats_for(&logs, today),
                facade.trend_for(&logs, today, days)?,
            );

            export_report(&report, format, &output)
                .with_context(|| format!("Failed to export to {}", output.display()))?;
            println!("{} {}", "✓ Exported to".green(), output.display());
        }

        Commands::Config { list, init } => {
            if init {
                let path = cli.config.unwrap_or_else(AppConfig::default_config_path);
                let mut fresh = AppConfig::default();
                fresh.save_to_file(&path)?;
                println!("{} {}", "✓ Wrote default config to".green(), path.display());
            } else if list {
                println!("{}", toml::to_string_pretty(&config)?);
            } else {
                println!("Config file: {}", AppConfig::default_config_path().display());
                println!("Database:    {}", db_path.display());
            }
        }
    }

    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve_date(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(value) => Ok(parse_date(value)?),
        None => Ok(today()),
    }
}

fn open_database(path: &Path) -> Result<Database> {
    Database::new(path).with_context(|| format!("Failed to open database {}", path.display()))
}

fn open_facade(config: &AppConfig, path: &Path) -> Result<TrainingDataFacade<Database>> {
    Ok(TrainingDataFacade::with_settings(
        open_database(path)?,
        config.acwr.clone(),
        config.wellness,
    )?)
}

fn read_exercises(path: &Path) -> Result<Vec<ExerciseEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read workout file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Workout file {} is not a list of exercises", path.display()))
}

fn print_status(stats: &DashboardStats) {
    let tier = match stats.risk_level_key {
        RiskLevel::High => stats.risk_level_key.to_string().red().bold(),
        RiskLevel::Moderate => stats.risk_level_key.to_string().yellow().bold(),
        RiskLevel::Optimal => stats.risk_level_key.to_string().green().bold(),
        RiskLevel::Low => stats.risk_level_key.to_string().cyan().bold(),
    };

    println!("{}", format!("Training load for {}", stats.date).bold());
    println!("  Acute load:   {}", stats.acute_load.round_dp(1));
    println!("  Chronic load: {}", stats.chronic_load.round_dp(1));
    println!("  ACWR:         {}", stats.ratio.round_dp(2));
    println!("  Risk:         {}", tier);
    println!("  Suggestion:   {}", stats.suggestion_key.description());
    if stats.fatigue_warning {
        println!(
            "  {}",
            "⚠ Poor sleep or high fatigue - listen to your body".yellow()
        );
    }
}
