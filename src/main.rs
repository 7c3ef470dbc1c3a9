use anyhow::Result;
use chrono::Local;
use game_platform_db::{
    cli::{resolve_db_path, Cli, Commands},
    gen::{DataGenerator, Dictionary},
    schema::table_names,
    sim::{
        SimClock, Simulation, SimulationConfig, DEFAULT_SEED_DEVELOPERS, DEFAULT_SEED_USERS,
    },
    store::Store,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Init { db } => {
            let db_path = resolve_db_path(db)?;
            let store = Store::open(&db_path)?;
            store.init_schema()?;
            println!(
                "Initialized schema ({} tables) at {:?}",
                table_names().len(),
                db_path
            );
        }

        Commands::Seed {
            db,
            users,
            developers,
            dictionary,
            seed,
            start_date,
        } => {
            let start = Instant::now();
            let db_path = resolve_db_path(db)?;
            let mut sim = build_simulation(
                &db_path,
                dictionary,
                seed,
                start_date,
                SimClock::DEFAULT_DAY_LENGTH_SECS,
                SimulationConfig::default(),
            )?;

            if sim.seed_if_empty(users, developers)? {
                let elapsed = start.elapsed();
                println!(
                    "\nSeeded {:?} in {:.1}s",
                    db_path,
                    elapsed.as_secs_f64()
                );
            } else {
                println!("Database {:?} is already populated; nothing to do", db_path);
            }
        }

        Commands::Run {
            db,
            days,
            day_length,
            dictionary,
            seed,
            start_date,
        } => {
            let start = Instant::now();
            let db_path = resolve_db_path(db)?;
            let config = SimulationConfig {
                days,
                ..SimulationConfig::default()
            };
            let mut sim =
                build_simulation(&db_path, dictionary, seed, start_date, day_length, config)?;

            sim.seed_if_empty(DEFAULT_SEED_USERS, DEFAULT_SEED_DEVELOPERS)?;
            sim.run()?;

            let elapsed = start.elapsed();
            println!(
                "\nSimulation over {:?} finished in {:.1}s",
                db_path,
                elapsed.as_secs_f64()
            );
        }

        Commands::Stats { db } => {
            let db_path = resolve_db_path(db)?;
            let store = Store::open(&db_path)?;

            println!("Database: {:?}\n", db_path);
            let mut total = 0_i64;
            for (name, count) in store.table_counts()? {
                println!("{:30} {:>10} rows", name, count);
                total += count;
            }
            println!("\n{:30} {:>10} rows", "TOTAL", total);
            println!(
                "{:30} {:>10.2}",
                "platform revenue",
                store.total_platform_revenue()?
            );
        }

        Commands::ListTables => {
            println!("Storefront tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn build_simulation(
    db_path: &Path,
    dictionary: Option<PathBuf>,
    seed: Option<u64>,
    start_date: Option<chrono::NaiveDate>,
    day_length: f64,
    config: SimulationConfig,
) -> Result<Simulation> {
    let store = Store::open(db_path)?;
    store.init_schema()?;

    let dict = match dictionary {
        Some(path) => Dictionary::from_file(&path)?,
        None => Dictionary::default(),
    };
    let generator = match seed {
        Some(value) => DataGenerator::with_seed(dict, value),
        None => DataGenerator::new(dict),
    };

    let sim_start = start_date.unwrap_or_else(|| Local::now().date_naive());
    let clock = SimClock::new(sim_start, day_length);

    Ok(match seed {
        Some(value) => Simulation::with_seed(store, generator, clock, config, value),
        None => Simulation::new(store, generator, clock, config),
    })
}
