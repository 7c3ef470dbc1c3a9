//! Tick-driven market simulation over the store.
//!
//! Each simulated day the runner accrues fractional growth from the economy
//! models, flushes whole rows into the store, refreshes user activity,
//! drives purchases with a 70/30 revenue split, and on slower cadences
//! expires inactive users and reports a snapshot.

use anyhow::Result;
use chrono::{Datelike, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::clock::SimClock;
use super::seed::{seed, SeedReport};
use super::{economy, market};
use crate::error::StoreError;
use crate::gen::DataGenerator;
use crate::store::Store;

/// Developer's cut of every sale; the platform keeps the rest
const DEVELOPER_REVENUE_SHARE: f64 = 0.7;

/// Share of active users that buy something on a given day
const DAILY_PURCHASE_SHARE: f64 = 0.03;

/// A studio ships a game roughly every 175 days at most
const GAMES_PER_DEVELOPER_PER_DAY: f64 = 1.0 / 175.0;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Stop after this many simulated days; run until interrupted if None
    pub days: Option<u64>,
    /// Expire two-year-inactive users every this many days
    pub expiry_cadence_days: i64,
    /// Log a market snapshot every this many days
    pub stats_cadence_days: i64,
    /// Inactivity window before a user is expired
    pub inactive_after_days: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: None,
            expiry_cadence_days: 30,
            stats_cadence_days: 5,
            inactive_after_days: 730,
        }
    }
}

/// What one simulated day changed
#[derive(Debug, Clone, Copy, Default)]
pub struct DayReport {
    pub users_added: usize,
    pub developers_added: usize,
    pub games_added: usize,
    pub purchases: usize,
    pub active_users: i64,
}

pub struct Simulation {
    store: Store,
    generator: DataGenerator,
    clock: SimClock,
    config: SimulationConfig,
    rng: StdRng,
    active_users: i64,
    pending_users: f64,
    pending_developers: f64,
    pending_games: f64,
}

impl Simulation {
    pub fn new(
        store: Store,
        generator: DataGenerator,
        clock: SimClock,
        config: SimulationConfig,
    ) -> Self {
        Self::with_rng(store, generator, clock, config, StdRng::from_entropy())
    }

    /// Seeded variant for reproducible runs
    pub fn with_seed(
        store: Store,
        generator: DataGenerator,
        clock: SimClock,
        config: SimulationConfig,
        rng_seed: u64,
    ) -> Self {
        Self::with_rng(
            store,
            generator,
            clock,
            config,
            StdRng::seed_from_u64(rng_seed),
        )
    }

    fn with_rng(
        store: Store,
        generator: DataGenerator,
        clock: SimClock,
        config: SimulationConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            generator,
            clock,
            config,
            rng,
            active_users: 0,
            pending_users: 0.0,
            pending_developers: 0.0,
            pending_games: 0.0,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Seed the starting market if all tables are empty. Returns whether
    /// seeding ran.
    pub fn seed_if_empty(&mut self, users: usize, developers: usize) -> Result<bool> {
        let populated = self.store.user_count()? > 0
            || self.store.developer_count()? > 0
            || self.store.game_count()? > 0;
        if populated {
            return Ok(false);
        }

        let at = self.clock.sim_datetime(&mut self.rng);
        let report = seed(&self.store, &mut self.generator, &mut self.rng, users, developers, at)?;
        self.log_seed(report);
        Ok(true)
    }

    fn log_seed(&self, report: SeedReport) {
        info!(
            users = report.users,
            developers = report.developers,
            games = report.games,
            "seeded starting market"
        );
    }

    /// Drive the clock until the day limit (if any), stepping once per
    /// simulated day.
    pub fn run(&mut self) -> Result<()> {
        let mut last_day = -1_i64;
        loop {
            if let Some(limit) = self.config.days {
                if self.clock.current_day() >= limit as i64 {
                    break;
                }
            }

            let day = self.clock.current_day();
            if day > last_day {
                last_day = day;
                let now = self.clock.sim_datetime(&mut self.rng);
                let report = self.step_day(now)?;
                debug!(
                    day,
                    users = report.users_added,
                    developers = report.developers_added,
                    games = report.games_added,
                    purchases = report.purchases,
                    "day complete"
                );

                if day > 0 && day % self.config.expiry_cadence_days == 0 {
                    self.expire_inactive(now)?;
                }
                if day % self.config.stats_cadence_days == 0 {
                    self.log_snapshot(day)?;
                }
            }

            thread::sleep(Duration::from_millis(250));
        }
        Ok(())
    }

    /// Run one simulated day's worth of market activity
    pub fn step_day(&mut self, now: NaiveDateTime) -> Result<DayReport> {
        self.accrue_growth(now)?;
        let users_added = self.flush_users(now)?;
        let developers_added = self.flush_developers(now)?;
        let games_added = self.flush_games(now)?;
        self.refresh_activity(now)?;
        let purchases = self.run_purchases(now)?;
        Ok(DayReport {
            users_added,
            developers_added,
            games_added,
            purchases,
            active_users: self.active_users,
        })
    }

    fn accrue_growth(&mut self, now: NaiveDateTime) -> Result<()> {
        let current_users = self.store.user_count()?;
        let current_games = self.store.game_count()?;
        let current_devs = self.store.developer_count()?;

        let base_activity = self.rng.gen_range(0.1..0.25);
        let seasonal = market::seasonal_multiplier(now.month());
        let weekday = market::weekday_multiplier(now.weekday());
        let variation = self.rng.gen_range(0.9..1.1);
        let activity_rate = (base_activity * seasonal * weekday * variation).clamp(0.25, 0.8);
        self.active_users = (current_users as f64 * activity_rate) as i64;

        self.pending_users +=
            economy::daily_user_growth(&mut self.rng, current_users, current_games, now.month());
        self.pending_developers +=
            economy::daily_developer_growth(&mut self.rng, current_devs, current_users);
        let game_growth =
            economy::daily_game_growth(&mut self.rng, current_devs, current_games, self.active_users);
        self.pending_games += game_growth.min(current_devs as f64 * GAMES_PER_DEVELOPER_PER_DAY);

        Ok(())
    }

    fn flush_users(&mut self, now: NaiveDateTime) -> Result<usize> {
        let count = self.pending_users.floor() as usize;
        if count == 0 {
            return Ok(0);
        }
        self.pending_users -= count as f64;

        let mut created = 0;
        for _ in 0..count {
            let user = self.generator.next_user(now);
            match self.store.create_user(&user) {
                Ok(_) => created += 1,
                Err(StoreError::UniqueViolation(detail)) => {
                    warn!(%detail, "skipping duplicate user")
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(created)
    }

    fn flush_developers(&mut self, now: NaiveDateTime) -> Result<usize> {
        let count = self.pending_developers.floor() as usize;
        if count == 0 {
            return Ok(0);
        }
        self.pending_developers -= count as f64;

        let mut created = 0;
        for _ in 0..count {
            let developer = self.generator.next_developer(now);
            match self.store.create_developer(&developer) {
                Ok(_) => created += 1,
                Err(StoreError::UniqueViolation(detail)) => {
                    warn!(%detail, "skipping duplicate developer")
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(created)
    }

    fn flush_games(&mut self, now: NaiveDateTime) -> Result<usize> {
        let count = self.pending_games.floor() as usize;
        if count == 0 {
            return Ok(0);
        }
        self.pending_games -= count as f64;

        let mut created = 0;
        for _ in 0..count {
            let Some(developer_id) = self.store.random_developer_id()? else {
                break;
            };
            let game = self.generator.next_game(now.date(), developer_id);
            self.store.create_game(&game)?;
            created += 1;
        }
        Ok(created)
    }

    /// Mark today's active share of users as seen
    fn refresh_activity(&mut self, now: NaiveDateTime) -> Result<()> {
        let ids = self.store.user_ids()?;
        if ids.is_empty() {
            return Ok(());
        }
        let sample_size = (self.active_users as usize).min(ids.len());
        for &user_id in ids.choose_multiple(&mut self.rng, sample_size) {
            self.store.record_user_activity(user_id, now)?;
        }
        Ok(())
    }

    /// A few percent of today's active users buy a game they don't own
    fn run_purchases(&mut self, now: NaiveDateTime) -> Result<usize> {
        let attempts = (self.active_users as f64 * DAILY_PURCHASE_SHARE) as usize;
        let mut sold = 0;

        for _ in 0..attempts {
            let Some(game) = self.store.random_active_game()? else {
                break;
            };
            let candidates = self.store.users_without_game(game.game_id)?;
            let Some(&user_id) = candidates.choose(&mut self.rng) else {
                continue;
            };

            let amount = game.current_price;
            let developer_revenue = round2(amount * DEVELOPER_REVENUE_SHARE);
            let platform_commission = round2(amount - developer_revenue);
            match self.store.purchase_game(
                user_id,
                game.game_id,
                amount,
                developer_revenue,
                platform_commission,
                now,
            ) {
                Ok(_) => sold += 1,
                Err(StoreError::DuplicateOwnership { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(sold)
    }

    fn expire_inactive(&mut self, now: NaiveDateTime) -> Result<()> {
        let cutoff = now - chrono::Duration::days(self.config.inactive_after_days);
        let expired = self.store.delete_inactive_users(cutoff)?;
        if expired > 0 {
            info!(expired, "expired inactive users");
        }
        Ok(())
    }

    fn log_snapshot(&self, day: i64) -> Result<()> {
        info!(
            day,
            users = self.store.user_count()?,
            active_users = self.active_users,
            developers = self.store.developer_count()?,
            games = self.store.game_count()?,
            transactions = self.store.transaction_count()?,
            platform_revenue = self.store.total_platform_revenue()?,
            "market snapshot"
        );
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
