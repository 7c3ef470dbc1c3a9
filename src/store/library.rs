//! Library ownership and the purchase unit of work.

use chrono::NaiveDateTime;
use rusqlite::params;

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::model::{sql_datetime, Game, LibraryGame, Purchase};

impl Store {
    /// Record a purchase as one atomic unit: the ownership row, the
    /// transaction row with its revenue split, and the three aggregate
    /// columns (buyer spend, developer revenue, game purchase count).
    /// Either everything commits or nothing does.
    ///
    /// Fails with `DuplicateOwnership` when the user already owns the game
    /// — the UNIQUE(user_id, game_id) constraint is the arbiter, so two
    /// concurrent attempts cannot both commit.
    pub fn purchase_game(
        &mut self,
        user_id: i64,
        game_id: i64,
        amount: f64,
        developer_revenue: f64,
        platform_commission: f64,
        at: NaiveDateTime,
    ) -> StoreResult<Purchase> {
        let timestamp = sql_datetime(at);
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO user_library (user_id, game_id, purchase_date) VALUES (?1, ?2, ?3)",
            params![user_id, game_id, timestamp],
        )
        .map_err(|err| match StoreError::from(err) {
            StoreError::UniqueViolation(_) => StoreError::DuplicateOwnership { user_id, game_id },
            other => other,
        })?;
        let user_game_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO transactions (user_id, game_id, transaction_date, amount,
                                       developer_revenue, platform_commission)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                game_id,
                timestamp,
                amount,
                developer_revenue,
                platform_commission,
            ],
        )?;
        let transaction_id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE users SET total_spent = total_spent + ?1, last_active = ?2 WHERE user_id = ?3",
            params![amount, timestamp, user_id],
        )?;
        tx.execute(
            "UPDATE developers SET total_revenue = total_revenue + ?1
             WHERE developer_id = (SELECT developer_id FROM games WHERE game_id = ?2)",
            params![developer_revenue, game_id],
        )?;
        tx.execute(
            "UPDATE games SET total_purchases = total_purchases + 1 WHERE game_id = ?1",
            params![game_id],
        )?;

        tx.commit()?;
        Ok(Purchase {
            user_game_id,
            transaction_id,
        })
    }

    /// A user's owned games in purchase order (oldest first, library row id
    /// as the tiebreak for same-second purchases).
    pub fn list_library(&self, user_id: i64) -> StoreResult<Vec<LibraryGame>> {
        let mut stmt = self.conn.prepare(
            "SELECT g.*, ul.purchase_date AS purchase_date
             FROM user_library ul
             JOIN games g ON g.game_id = ul.game_id
             WHERE ul.user_id = ?1
             ORDER BY ul.purchase_date, ul.user_game_id",
        )?;
        let rows = stmt.query_map([user_id], |row| {
            Ok(LibraryGame {
                game: Game::from_row(row)?,
                purchase_date: row.get("purchase_date")?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Users who own the given game
    pub fn game_owner_ids(&self, game_id: i64) -> StoreResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM user_library WHERE game_id = ?1 ORDER BY user_id")?;
        let ids = stmt.query_map([game_id], |row| row.get(0))?;
        Ok(ids.collect::<rusqlite::Result<_>>()?)
    }

    /// Users who do not yet own the given game
    pub fn users_without_game(&self, game_id: i64) -> StoreResult<Vec<i64>> {
        let mut stmt = self.conn.prepare(
            "SELECT u.user_id FROM users u
             WHERE u.user_id NOT IN (
                 SELECT ul.user_id FROM user_library ul
                 WHERE ul.game_id = ?1
             )
             ORDER BY u.user_id",
        )?;
        let ids = stmt.query_map([game_id], |row| row.get(0))?;
        Ok(ids.collect::<rusqlite::Result<_>>()?)
    }
}
