//! Typed failures surfaced by the store layer.
//!
//! SQLite reports every constraint breach as `SQLITE_CONSTRAINT` plus an
//! extended code; the mapping below lifts the codes the schema can actually
//! trip into distinct variants so callers can match on them.

use rusqlite::ffi;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Duplicate value in a UNIQUE column or index
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// Write referencing a row that does not exist
    #[error("foreign key constraint violated")]
    ForeignKeyViolation,

    /// CHECK or NOT NULL constraint rejected a value
    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    /// The (user, game) ownership pair already exists
    #[error("user {user_id} already owns game {game_id}")]
    DuplicateOwnership { user_id: i64, game_id: i64 },

    /// Lookup by id matched no row
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Any other storage failure, passed through unchanged
    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, ref message) = err {
            if code.code == ffi::ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_else(|| code.to_string());
                match code.extended_code {
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                        return StoreError::UniqueViolation(detail)
                    }
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return StoreError::ForeignKeyViolation,
                    ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                        return StoreError::ConstraintViolation(detail)
                    }
                    _ => {}
                }
            }
        }
        StoreError::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constraint_error(extended_code: std::os::raw::c_int, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            ffi::Error {
                code: ffi::ErrorCode::ConstraintViolation,
                extended_code,
            },
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_unique_mapping() {
        let err = StoreError::from(constraint_error(
            ffi::SQLITE_CONSTRAINT_UNIQUE,
            "UNIQUE constraint failed: users.username",
        ));
        assert!(matches!(err, StoreError::UniqueViolation(_)));
    }

    #[test]
    fn test_foreign_key_mapping() {
        let err = StoreError::from(constraint_error(
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            "FOREIGN KEY constraint failed",
        ));
        assert!(matches!(err, StoreError::ForeignKeyViolation));
    }

    #[test]
    fn test_check_mapping() {
        let err = StoreError::from(constraint_error(
            ffi::SQLITE_CONSTRAINT_CHECK,
            "CHECK constraint failed: games",
        ));
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[test]
    fn test_passthrough() {
        let err = StoreError::from(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
