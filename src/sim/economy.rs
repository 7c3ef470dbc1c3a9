//! Growth models for the simulated market.
//!
//! User inflow follows a Bass diffusion curve with catalog attraction, a
//! Metcalfe-style network effect and seasonality; studios and games follow
//! the audience with competition and saturation pressure. All outputs are
//! fractional daily rates the runner accrues between flushes.

use rand::Rng;

use super::market;

/// Total addressable user base
pub const MARKET_POTENTIAL: f64 = 300_000_000.0;
const INNOVATION_COEFF: f64 = 0.000_000_5;
const IMITATION_COEFF: f64 = 0.002;
const GAMES_SATURATION_POINT: f64 = 50_000.0;

/// Hard cap on daily user growth, as a share of the current base
pub const MAX_DAILY_USER_GROWTH: f64 = 0.05;

/// Expected new users for one simulated day
pub fn daily_user_growth(
    rng: &mut impl Rng,
    current_users: i64,
    current_games: i64,
    month: u32,
) -> f64 {
    let users = current_users as f64;
    let games = current_games as f64;

    let innovation = INNOVATION_COEFF * (MARKET_POTENTIAL - users);
    let imitation = IMITATION_COEFF * (users / MARKET_POTENTIAL) * (MARKET_POTENTIAL - users);
    let bass_growth = innovation + imitation;

    let games_attraction = if games < GAMES_SATURATION_POINT {
        let factor = 0.1 * (1.0 - games / GAMES_SATURATION_POINT);
        (games * factor).max(550.0)
    } else {
        games * 0.01
    };

    let network_effect = if users > 1_000.0 {
        let network_value = (users.powf(1.1) / 1e5).max(1.0);
        (1.0 + network_value.log10() * 0.3).min(2.5)
    } else {
        1.0
    };

    let seasonal = market::seasonal_multiplier(month);
    let inflow = (bass_growth + games_attraction) * network_effect * seasonal;
    let random_factor = rng.gen_range(0.6..1.4);

    (inflow * random_factor).min(users * MAX_DAILY_USER_GROWTH)
}

/// Expected new studios for one simulated day
pub fn daily_developer_growth(rng: &mut impl Rng, current_devs: i64, current_users: i64) -> f64 {
    let audience_factor = if current_users > 10_000 {
        (current_users as f64 / 10_000.0).max(1.0).log10() * 1.5 + 1.0
    } else {
        1.0
    };

    // The more studios, the harder it is to stand out
    let competition_factor = if current_devs > 5_000 {
        5_000.0 / current_devs as f64
    } else {
        1.0
    };

    let base = 0.2 * audience_factor * competition_factor;
    if base > 0.0 {
        noisy(rng, base).max(0.0)
    } else {
        0.0
    }
}

/// Expected new games for one simulated day
pub fn daily_game_growth(
    rng: &mut impl Rng,
    active_devs: i64,
    current_games: i64,
    current_users: i64,
) -> f64 {
    let demand_factor = (current_users as f64).powf(0.1).min(10.0);

    let uniqueness_factor = match current_games {
        g if g < 1_000 => 1.0,
        g if g < 10_000 => 0.8,
        g if g < 50_000 => 0.55,
        _ => 0.3,
    };

    let trend_factor = rng.gen_range(0.5..1.5);
    let expected = active_devs as f64 * demand_factor * uniqueness_factor * trend_factor;
    if expected > 0.0 {
        noisy(rng, expected).max(0.0)
    } else {
        0.0
    }
}

/// Mean plus triangular noise with a sqrt-of-mean spread
fn noisy(rng: &mut impl Rng, mean: f64) -> f64 {
    mean + mean.sqrt() * (rng.gen::<f64>() + rng.gen::<f64>() - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_user_growth_respects_cap() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let growth = daily_user_growth(&mut rng, 10_000, 50, 12);
            assert!(growth <= 10_000.0 * MAX_DAILY_USER_GROWTH);
            assert!(growth >= 0.0);
        }
    }

    #[test]
    fn test_empty_market_does_not_grow_users() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(daily_user_growth(&mut rng, 0, 0, 6), 0.0);
    }

    #[test]
    fn test_developer_growth_nonnegative() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert!(daily_developer_growth(&mut rng, 10, 50_000) >= 0.0);
        }
    }

    #[test]
    fn test_competition_slows_developer_growth() {
        let mut rng = StdRng::seed_from_u64(7);
        let crowded: f64 = (0..200)
            .map(|_| daily_developer_growth(&mut rng, 50_000, 100_000))
            .sum();
        let open: f64 = (0..200)
            .map(|_| daily_developer_growth(&mut rng, 10, 100_000))
            .sum();
        assert!(crowded < open);
    }

    #[test]
    fn test_game_growth_zero_without_developers() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(daily_game_growth(&mut rng, 0, 0, 10_000), 0.0);
    }
}
