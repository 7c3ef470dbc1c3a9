//! Demand multipliers derived from storefront market statistics.

use chrono::Weekday;

/// Seasonal demand multiplier by calendar month; autumn/winter sales peaks,
/// summer slump
pub fn seasonal_multiplier(month: u32) -> f64 {
    match month {
        1 => 1.15,
        2 => 0.95,
        3 => 1.05,
        4 => 1.00,
        5 => 0.98,
        6 => 0.90,
        7 => 0.85,
        8 => 0.92,
        9 => 1.10,
        10 => 1.20,
        11 => 1.25,
        12 => 1.30,
        _ => 1.0,
    }
}

/// Weekend bump, Monday dip
pub fn weekday_multiplier(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Sat | Weekday::Sun => 1.25,
        Weekday::Mon => 0.85,
        _ => 1.0,
    }
}
