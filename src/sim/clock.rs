//! Simulated calendar: a configurable slice of real time equals one
//! simulated day.

use chrono::{NaiveDate, NaiveDateTime};
use rand::Rng;
use std::time::Instant;

pub struct SimClock {
    started: Instant,
    sim_start: NaiveDate,
    real_secs_per_day: f64,
}

impl SimClock {
    /// One real minute per simulated day
    pub const DEFAULT_DAY_LENGTH_SECS: f64 = 60.0;

    pub fn new(sim_start: NaiveDate, real_secs_per_day: f64) -> Self {
        Self {
            started: Instant::now(),
            sim_start,
            real_secs_per_day: real_secs_per_day.max(0.001),
        }
    }

    /// Simulated days elapsed since the clock started
    pub fn current_day(&self) -> i64 {
        (self.started.elapsed().as_secs_f64() / self.real_secs_per_day) as i64
    }

    pub fn sim_date(&self) -> NaiveDate {
        self.sim_start + chrono::Duration::days(self.current_day())
    }

    /// Simulated date with a business-hours time of day
    pub fn sim_datetime(&self, rng: &mut impl Rng) -> NaiveDateTime {
        let hour = rng.gen_range(9..19);
        let minute = rng.gen_range(0..60);
        let second = rng.gen_range(0..60);
        self.sim_date()
            .and_hms_opt(hour, minute, second)
            .expect("in-range time components")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_clock_starts_at_day_zero() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let clock = SimClock::new(start, SimClock::DEFAULT_DAY_LENGTH_SECS);
        assert_eq!(clock.current_day(), 0);
        assert_eq!(clock.sim_date(), start);
    }

    #[test]
    fn test_sim_datetime_in_business_hours() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let clock = SimClock::new(start, SimClock::DEFAULT_DAY_LENGTH_SECS);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let dt = clock.sim_datetime(&mut rng);
            assert!((9..19).contains(&dt.hour()));
        }
    }
}
