//! Game catalog accessors.

use rusqlite::{params, OptionalExtension};

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::model::{Game, NewGame};

impl Store {
    /// Insert a new game; fails with `ForeignKeyViolation` when the
    /// developer does not exist. total_purchases, is_active and created_at
    /// take their schema defaults.
    pub fn create_game(&self, game: &NewGame) -> StoreResult<Game> {
        self.conn.execute(
            "INSERT INTO games (title, developer_id, release_date, base_price, current_price,
                                monetization_type, genre_main, genre_tags, age_rating)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                game.title,
                game.developer_id,
                game.release_date,
                game.base_price,
                game.current_price,
                game.monetization_type,
                game.genre_main,
                game.genre_tags,
                game.age_rating,
            ],
        )?;
        self.game_by_id(self.conn.last_insert_rowid())
    }

    pub fn game_by_id(&self, game_id: i64) -> StoreResult<Game> {
        self.conn
            .query_row(
                "SELECT * FROM games WHERE game_id = ?1",
                [game_id],
                Game::from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "game",
                id: game_id,
            })
    }

    pub fn game_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?)
    }

    pub fn games_by_developer(&self, developer_id: i64) -> StoreResult<Vec<Game>> {
        let mut stmt = self.conn.prepare(
            "SELECT * FROM games WHERE developer_id = ?1 ORDER BY release_date, game_id",
        )?;
        let games = stmt.query_map([developer_id], Game::from_row)?;
        Ok(games.collect::<rusqlite::Result<_>>()?)
    }

    pub fn games_by_genre(&self, genre_main: &str) -> StoreResult<Vec<Game>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM games WHERE genre_main = ?1 ORDER BY game_id")?;
        let games = stmt.query_map([genre_main], Game::from_row)?;
        Ok(games.collect::<rusqlite::Result<_>>()?)
    }

    pub fn random_active_game(&self) -> StoreResult<Option<Game>> {
        Ok(self
            .conn
            .query_row(
                "SELECT * FROM games WHERE is_active = TRUE ORDER BY RANDOM() LIMIT 1",
                [],
                Game::from_row,
            )
            .optional()?)
    }

    /// Games still under the given purchase count
    pub fn games_below_purchases(&self, limit: i64) -> StoreResult<Vec<Game>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM games WHERE total_purchases < ?1 ORDER BY game_id")?;
        let games = stmt.query_map([limit], Game::from_row)?;
        Ok(games.collect::<rusqlite::Result<_>>()?)
    }

    /// Bump a game's purchase counter
    pub fn add_game_purchases(&self, game_id: i64, count: i64) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE games SET total_purchases = total_purchases + ?1 WHERE game_id = ?2",
            params![count, game_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "game",
                id: game_id,
            });
        }
        Ok(())
    }

    /// Soft-remove a game from the storefront; ownership and transaction
    /// history stay untouched.
    pub fn deactivate_game(&self, game_id: i64) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE games SET is_active = FALSE WHERE game_id = ?1",
            params![game_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "game",
                id: game_id,
            });
        }
        Ok(())
    }
}
