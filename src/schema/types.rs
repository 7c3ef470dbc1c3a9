use std::collections::HashSet;

/// Column data type, rendered to the SQLite type name it declares
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnType {
    Integer,
    Text,
    /// Fixed-width character column (country codes)
    Char(u8),
    Date,
    Timestamp,
    /// Monetary column with (precision, scale)
    Decimal(u8, u8),
    Boolean,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
    pub autoincrement: bool,
    pub unique: bool,
    /// Raw SQL default clause (e.g. "0.00", "CURRENT_TIMESTAMP")
    pub default: Option<&'static str>,
    /// Raw SQL check expression
    pub check: Option<&'static str>,
}

impl Column {
    /// Create an optional (nullable) column
    pub const fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: true,
            primary_key: false,
            autoincrement: false,
            unique: false,
            default: None,
            check: None,
        }
    }

    /// Create a required (non-nullable) column
    pub const fn required(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            nullable: false,
            ..Self::new(name, col_type)
        }
    }

    /// Mark as primary key
    pub const fn primary_key(self) -> Self {
        Self {
            primary_key: true,
            ..self
        }
    }

    /// Mark as auto-incrementing primary key
    pub const fn autoincrement(self) -> Self {
        Self {
            primary_key: true,
            autoincrement: true,
            ..self
        }
    }

    /// Add a UNIQUE constraint on this column
    pub const fn unique(self) -> Self {
        Self {
            unique: true,
            ..self
        }
    }

    /// Set the SQL default clause
    pub const fn default_sql(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }

    /// Attach a CHECK expression
    pub const fn check(self, expr: &'static str) -> Self {
        Self {
            check: Some(expr),
            ..self
        }
    }
}

/// Action taken on dependent rows when the referenced row is deleted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OnDelete {
    NoAction,
    Cascade,
    SetNull,
}

/// Foreign key reference
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete: OnDelete,
}

impl ForeignKey {
    pub const fn new(
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    ) -> Self {
        Self {
            column,
            references_table,
            references_column,
            on_delete: OnDelete::NoAction,
        }
    }

    /// Delete dependent rows together with the referenced row
    pub const fn cascade(self) -> Self {
        Self {
            on_delete: OnDelete::Cascade,
            ..self
        }
    }

    /// Null out the reference when the referenced row is deleted
    pub const fn set_null(self) -> Self {
        Self {
            on_delete: OnDelete::SetNull,
            ..self
        }
    }
}

/// Named index definition
#[derive(Debug, Clone)]
pub struct Index {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

impl Index {
    pub const fn on(name: &'static str, columns: &'static [&'static str]) -> Self {
        Self { name, columns }
    }
}

/// Table schema definition
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub foreign_keys: &'static [ForeignKey],
    /// Table-level UNIQUE constraints over column groups
    pub unique_constraints: &'static [&'static [&'static str]],
    pub indexes: &'static [Index],
}

impl TableSchema {
    /// Get all tables this table depends on (FK parents)
    pub fn dependencies(&self) -> HashSet<&'static str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references_table)
            .collect()
    }
}
