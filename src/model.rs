//! Domain records for the storefront tables and their row mappings.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Storage format shared with SQLite's CURRENT_TIMESTAMP
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a datetime the way the schema stores it
pub fn sql_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

// =============================================================================
// Monetization
// =============================================================================

/// Whether a game is free-to-play or requires payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonetizationType {
    Free,
    Paid,
}

impl MonetizationType {
    pub fn as_str(self) -> &'static str {
        match self {
            MonetizationType::Free => "free",
            MonetizationType::Paid => "paid",
        }
    }
}

impl fmt::Display for MonetizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown monetization type: {0:?} (expected \"free\" or \"paid\")")]
pub struct ParseMonetizationError(String);

impl FromStr for MonetizationType {
    type Err = ParseMonetizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(MonetizationType::Free),
            "paid" => Ok(MonetizationType::Paid),
            other => Err(ParseMonetizationError(other.to_string())),
        }
    }
}

impl ToSql for MonetizationType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MonetizationType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

// =============================================================================
// Stored rows
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub country_code: String,
    pub region: Option<String>,
    pub registration_date: NaiveDateTime,
    pub total_spent: f64,
    pub last_active: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl User {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            country_code: row.get("country_code")?,
            region: row.get("region")?,
            registration_date: row.get("registration_date")?,
            total_spent: row.get("total_spent")?,
            last_active: row.get("last_active")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Developer {
    pub developer_id: i64,
    pub studio_name: String,
    pub country_code: String,
    pub foundation_year: Option<i32>,
    pub total_revenue: f64,
    pub contact_email: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Developer {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            developer_id: row.get("developer_id")?,
            studio_name: row.get("studio_name")?,
            country_code: row.get("country_code")?,
            foundation_year: row.get("foundation_year")?,
            total_revenue: row.get("total_revenue")?,
            contact_email: row.get("contact_email")?,
            created_at: row.get("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub game_id: i64,
    pub title: String,
    pub developer_id: i64,
    pub release_date: NaiveDate,
    pub base_price: f64,
    pub current_price: f64,
    pub monetization_type: MonetizationType,
    pub genre_main: String,
    /// JSON array of tag strings, as stored
    pub genre_tags: Option<String>,
    pub age_rating: String,
    pub total_purchases: i64,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl Game {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            game_id: row.get("game_id")?,
            title: row.get("title")?,
            developer_id: row.get("developer_id")?,
            release_date: row.get("release_date")?,
            base_price: row.get("base_price")?,
            current_price: row.get("current_price")?,
            monetization_type: row.get("monetization_type")?,
            genre_main: row.get("genre_main")?,
            genre_tags: row.get("genre_tags")?,
            age_rating: row.get("age_rating")?,
            total_purchases: row.get("total_purchases")?,
            is_active: row.get("is_active")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// A game owned by a user, with the date it entered the library
#[derive(Debug, Clone, Serialize)]
pub struct LibraryGame {
    pub game: Game,
    pub purchase_date: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub transaction_id: i64,
    pub user_id: Option<i64>,
    pub game_id: Option<i64>,
    pub transaction_date: NaiveDateTime,
    pub amount: Option<f64>,
    pub developer_revenue: Option<f64>,
    pub platform_commission: Option<f64>,
}

impl Transaction {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            transaction_id: row.get("transaction_id")?,
            user_id: row.get("user_id")?,
            game_id: row.get("game_id")?,
            transaction_date: row.get("transaction_date")?,
            amount: row.get("amount")?,
            developer_revenue: row.get("developer_revenue")?,
            platform_commission: row.get("platform_commission")?,
        })
    }
}

/// Row ids created by one purchase unit of work
#[derive(Debug, Clone, Copy)]
pub struct Purchase {
    pub user_game_id: i64,
    pub transaction_id: i64,
}

// =============================================================================
// Insert payloads
// =============================================================================

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub country_code: String,
    pub region: Option<String>,
    pub registration_date: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewDeveloper {
    pub studio_name: String,
    pub country_code: String,
    pub foundation_year: Option<i32>,
    pub contact_email: String,
}

#[derive(Debug, Clone)]
pub struct NewGame {
    pub title: String,
    pub developer_id: i64,
    pub release_date: NaiveDate,
    pub base_price: f64,
    pub current_price: f64,
    pub monetization_type: MonetizationType,
    pub genre_main: String,
    pub genre_tags: Option<String>,
    pub age_rating: String,
}
