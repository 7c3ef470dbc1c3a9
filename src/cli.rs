use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "game-platform-db")]
#[command(version, about = "Game storefront database: schema, seeding and market simulation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the schema (tables and indexes), idempotently
    Init {
        /// SQLite database path (defaults to the platform data directory)
        #[arg(short, long)]
        db: Option<PathBuf>,
    },

    /// Populate an empty database with a starting market
    Seed {
        /// SQLite database path (defaults to the platform data directory)
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Users to create
        #[arg(long, default_value_t = 10_000)]
        users: usize,

        /// Developer studios to create
        #[arg(long, default_value_t = 10)]
        developers: usize,

        /// JSON dictionary overriding the built-in word lists
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },

    /// Seed if empty, then run the continuous market simulation
    Run {
        /// SQLite database path (defaults to the platform data directory)
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Stop after this many simulated days (runs until interrupted if omitted)
        #[arg(long)]
        days: Option<u64>,

        /// Real seconds per simulated day
        #[arg(long, default_value_t = 60.0)]
        day_length: f64,

        /// JSON dictionary overriding the built-in word lists
        #[arg(long)]
        dictionary: Option<PathBuf>,

        /// RNG seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Simulated start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },

    /// Print row counts and platform revenue
    Stats {
        /// SQLite database path (defaults to the platform data directory)
        #[arg(short, long)]
        db: Option<PathBuf>,
    },

    /// List all storefront tables
    ListTables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Resolve the database path, defaulting under the platform data directory
pub fn resolve_db_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => Ok(path),
        None => {
            let proj_dirs = ProjectDirs::from("", "", "game-platform-db")
                .context("Could not determine data directory")?;
            let data_dir = proj_dirs.data_dir();
            std::fs::create_dir_all(data_dir).context("Failed to create data directory")?;
            Ok(data_dir.join("game_platform.db"))
        }
    }
}
