//! Transaction history and revenue queries.

use chrono::NaiveDate;
use rusqlite::params;

use super::Store;
use crate::error::StoreResult;
use crate::model::Transaction;

impl Store {
    pub fn transaction_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?)
    }

    /// A user's purchase history, oldest first
    pub fn transactions_for_user(&self, user_id: i64) -> StoreResult<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM transactions WHERE user_id = ?1
             ORDER BY transaction_date, transaction_id",
        )?;
        let rows = stmt.query_map([user_id], Transaction::from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Commission earned by the platform over all time
    pub fn total_platform_revenue(&self) -> StoreResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(platform_commission), 0) FROM transactions",
            [],
            |row| row.get(0),
        )?)
    }

    /// Commission earned by the platform on a single day
    pub fn daily_platform_revenue(&self, date: NaiveDate) -> StoreResult<f64> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(SUM(platform_commission), 0) FROM transactions
             WHERE DATE(transaction_date) = ?1",
            params![date],
            |row| row.get(0),
        )?)
    }
}
