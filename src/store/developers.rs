//! Developer accessors.

use rusqlite::{params, OptionalExtension};

use super::Store;
use crate::error::{StoreError, StoreResult};
use crate::model::{Developer, NewDeveloper};

impl Store {
    /// Insert a new developer; fails with `UniqueViolation` on a duplicate
    /// studio name.
    pub fn create_developer(&self, developer: &NewDeveloper) -> StoreResult<Developer> {
        self.conn.execute(
            "INSERT INTO developers (studio_name, country_code, foundation_year, contact_email)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                developer.studio_name,
                developer.country_code,
                developer.foundation_year,
                developer.contact_email,
            ],
        )?;
        self.developer_by_id(self.conn.last_insert_rowid())
    }

    pub fn developer_by_id(&self, developer_id: i64) -> StoreResult<Developer> {
        self.conn
            .query_row(
                "SELECT * FROM developers WHERE developer_id = ?1",
                [developer_id],
                Developer::from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: "developer",
                id: developer_id,
            })
    }

    pub fn developer_count(&self) -> StoreResult<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM developers", [], |row| row.get(0))?)
    }

    pub fn developer_ids(&self) -> StoreResult<Vec<i64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT developer_id FROM developers ORDER BY developer_id")?;
        let ids = stmt.query_map([], |row| row.get(0))?;
        Ok(ids.collect::<rusqlite::Result<_>>()?)
    }

    pub fn random_developer_id(&self) -> StoreResult<Option<i64>> {
        Ok(self
            .conn
            .query_row(
                "SELECT developer_id FROM developers ORDER BY RANDOM() LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?)
    }

    /// Add to a developer's running revenue
    pub fn add_developer_revenue(&self, developer_id: i64, revenue: f64) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE developers SET total_revenue = total_revenue + ?1 WHERE developer_id = ?2",
            params![revenue, developer_id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                entity: "developer",
                id: developer_id,
            });
        }
        Ok(())
    }

    /// Hard-delete a developer. Its games go with it (cascade), their
    /// library rows cascade in turn, and transaction rows keep the money
    /// trail with game_id nulled.
    pub fn delete_developer(&self, developer_id: i64) -> StoreResult<()> {
        let deleted = self.conn.execute(
            "DELETE FROM developers WHERE developer_id = ?1",
            params![developer_id],
        )?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "developer",
                id: developer_id,
            });
        }
        Ok(())
    }
}
