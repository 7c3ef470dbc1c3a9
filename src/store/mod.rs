//! SQLite-backed repository layer for the storefront schema.
//!
//! `Store` wraps a single `rusqlite` connection. Accessors are grouped by
//! entity in the submodules; every write enforces the declared constraints
//! and surfaces [`StoreError`](crate::error::StoreError) variants instead of
//! raw SQLite failures.

mod developers;
mod games;
mod library;
mod transactions;
mod users;

use rusqlite::Connection;
use std::path::Path;

use crate::error::StoreResult;
use crate::schema::{generate_create_table, generate_indexes, ALL_TABLES};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a database file
    pub fn open(db_path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> StoreResult<()> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Ok(())
    }

    /// Create all tables and indexes (idempotent)
    pub fn init_schema(&self) -> StoreResult<()> {
        for schema in ALL_TABLES {
            self.conn.execute(&generate_create_table(schema), [])?;
            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, [])?;
            }
        }
        Ok(())
    }

    /// Row counts per table, in schema order
    pub fn table_counts(&self) -> StoreResult<Vec<(&'static str, i64)>> {
        ALL_TABLES
            .iter()
            .map(|schema| {
                let sql = format!("SELECT COUNT(*) FROM {}", schema.name);
                let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
                Ok((schema.name, count))
            })
            .collect()
    }

    /// Direct connection access for ad-hoc queries
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
