//! User accessors.

use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::model::{sql_datetime, NewUser, User};

impl Store {
    /// Insert a new user; the store assigns the id.
    ///
    /// Fails with `UniqueViolation` when the username or email is taken.
    pub fn create_user(&self, user: &NewUser) -> StoreResult<User> {
        self.conn.execute(
            "INSERT INTO users (username, email, country_code, region, registration_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.username,
                user.email,
                user.country_code,
                user.region,
                sql_datetime(user.registration_date),
            ],
        )?;
        self.user_by_id(self.conn.last_insert_rowid())
    }

    pub fn user_by_id(&self, user_id: i64) -> StoreResult<User> {
        self.conn
            .query_row(
                "SELECT * FROM users WHERE user_id = ?1",
                [user_id],
                User::from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "user",
                id: user_id,
            })
    }

    pub fn user_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
    }

    pub fn user_ids(&self) -> StoreResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM users ORDER BY user_id")?;
        let ids = stmt.query_map([], |row| row.get(0))?;
        Ok(ids.collect::<rusqlite::Result<_>>()?)
    }

    pub fn users_by_country(&self, country_code: &str) -> StoreResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM users WHERE country_code = ?1 ORDER BY user_id")?;
        let users = stmt.query_map([country_code], User::from_row)?;
        Ok(users.collect::<rusqlite::Result<_>>()?)
    }

    /// Touch a user's last_active timestamp
    pub fn record_user_activity(&self, user_id: i64, at: NaiveDateTime) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET last_active = ?1 WHERE user_id = ?2",
            params![sql_datetime(at), user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "user",
                id: user_id,
            });
        }
        Ok(())
    }

    /// Add to a user's running spend and mark them active
    pub fn add_user_spending(
        &self,
        user_id: i64,
        amount: f64,
        at: NaiveDateTime,
    ) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET total_spent = total_spent + ?1, last_active = ?2 WHERE user_id = ?3",
            params![amount, sql_datetime(at), user_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "user",
                id: user_id,
            });
        }
        Ok(())
    }

    /// Delete users whose last activity predates the cutoff.
    ///
    /// Library rows cascade; transaction rows keep the money trail with
    /// user_id nulled.
    pub fn delete_inactive_users(&self, cutoff: NaiveDateTime) -> StoreResult<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM users WHERE last_active < ?1",
            params![sql_datetime(cutoff)],
        )?;
        if deleted > 0 {
            debug!(deleted, "expired inactive users");
        }
        Ok(deleted)
    }
}
