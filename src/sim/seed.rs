//! Initial market population with progress reporting.

use anyhow::Result;
use chrono::NaiveDateTime;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::Rng;
use tracing::warn;

use crate::error::StoreError;
use crate::gen::DataGenerator;
use crate::store::Store;

pub const DEFAULT_SEED_USERS: usize = 10_000;
pub const DEFAULT_SEED_DEVELOPERS: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct SeedReport {
    pub users: usize,
    pub developers: usize,
    pub games: usize,
}

/// Populate the database with a starting market: users, developer studios
/// and a small debut catalog per studio. Rows the store rejects as
/// duplicates are skipped, everything else is fatal.
pub fn seed(
    store: &Store,
    generator: &mut DataGenerator,
    rng: &mut StdRng,
    users: usize,
    developers: usize,
    at: NaiveDateTime,
) -> Result<SeedReport> {
    let multi = MultiProgress::new();
    let style = ProgressStyle::default_bar()
        .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap()
        .progress_chars("=>-");

    // Users
    let pb = multi.add(ProgressBar::new(users as u64));
    pb.set_style(style.clone());
    pb.set_message("users");
    let mut created_users = 0;
    for _ in 0..users {
        let user = generator.next_user(at);
        match store.create_user(&user) {
            Ok(_) => created_users += 1,
            Err(StoreError::UniqueViolation(detail)) => {
                warn!(%detail, "skipping duplicate user")
            }
            Err(err) => return Err(err.into()),
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("users: {} created", created_users));

    // Developers
    let pb = multi.add(ProgressBar::new(developers as u64));
    pb.set_style(style.clone());
    pb.set_message("developers");
    let mut developer_ids = Vec::with_capacity(developers);
    for _ in 0..developers {
        let developer = generator.next_developer(at);
        match store.create_developer(&developer) {
            Ok(created) => developer_ids.push(created.developer_id),
            Err(StoreError::UniqueViolation(detail)) => {
                warn!(%detail, "skipping duplicate developer")
            }
            Err(err) => return Err(err.into()),
        }
        pb.inc(1);
    }
    pb.finish_with_message(format!("developers: {} created", developer_ids.len()));

    // Debut catalogs: one to three games per studio
    let release_plan: Vec<(i64, usize)> = developer_ids
        .iter()
        .map(|&id| (id, rng.gen_range(1..=3)))
        .collect();
    let total_games: usize = release_plan.iter().map(|(_, n)| n).sum();

    let pb = multi.add(ProgressBar::new(total_games as u64));
    pb.set_style(style);
    pb.set_message("games");
    let mut created_games = 0;
    for (developer_id, count) in release_plan {
        for _ in 0..count {
            let game = generator.next_game(at.date(), developer_id);
            store.create_game(&game)?;
            created_games += 1;
            pb.inc(1);
        }
    }
    pb.finish_with_message(format!("games: {} created", created_games));

    Ok(SeedReport {
        users: created_users,
        developers: developer_ids.len(),
        games: created_games,
    })
}
