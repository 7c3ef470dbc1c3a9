//! Table schema definitions for the game storefront database

use super::types::*;

// =============================================================================
// Independent Tables (no FK dependencies)
// =============================================================================

pub static USERS: TableSchema = TableSchema {
    name: "users",
    columns: &[
        Column::required("user_id", ColumnType::Integer).primary_key(),
        Column::required("username", ColumnType::Text).unique(),
        Column::required("email", ColumnType::Text).unique(),
        Column::required("country_code", ColumnType::Char(2)),
        Column::new("region", ColumnType::Text),
        Column::required("registration_date", ColumnType::Timestamp),
        Column::new("total_spent", ColumnType::Decimal(12, 2)).default_sql("0.00"),
        Column::new("last_active", ColumnType::Timestamp),
        Column::new("created_at", ColumnType::Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
    foreign_keys: &[],
    unique_constraints: &[],
    indexes: &[Index::on("idx_users_country", &["country_code"])],
};

pub static DEVELOPERS: TableSchema = TableSchema {
    name: "developers",
    columns: &[
        Column::required("developer_id", ColumnType::Integer).primary_key(),
        Column::required("studio_name", ColumnType::Text).unique(),
        Column::required("country_code", ColumnType::Char(2)),
        Column::new("foundation_year", ColumnType::Integer),
        Column::new("total_revenue", ColumnType::Decimal(12, 2)).default_sql("0.00"),
        Column::required("contact_email", ColumnType::Text),
        Column::new("created_at", ColumnType::Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
    foreign_keys: &[],
    unique_constraints: &[],
    indexes: &[],
};

// =============================================================================
// Catalog
// =============================================================================

pub static GAMES: TableSchema = TableSchema {
    name: "games",
    columns: &[
        Column::required("game_id", ColumnType::Integer).primary_key(),
        Column::required("title", ColumnType::Text),
        Column::required("developer_id", ColumnType::Integer),
        Column::required("release_date", ColumnType::Date),
        Column::new("base_price", ColumnType::Decimal(10, 2)).default_sql("0.00"),
        Column::new("current_price", ColumnType::Decimal(10, 2)).default_sql("0.00"),
        Column::required("monetization_type", ColumnType::Text)
            .check("monetization_type IN ('free', 'paid')"),
        Column::required("genre_main", ColumnType::Text),
        Column::new("genre_tags", ColumnType::Text),
        Column::required("age_rating", ColumnType::Text),
        Column::new("total_purchases", ColumnType::Integer).default_sql("0"),
        Column::new("is_active", ColumnType::Boolean).default_sql("TRUE"),
        Column::new("created_at", ColumnType::Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
    foreign_keys: &[ForeignKey::new("developer_id", "developers", "developer_id").cascade()],
    unique_constraints: &[],
    indexes: &[
        Index::on("idx_games_developer", &["developer_id"]),
        Index::on("idx_games_genre", &["genre_main"]),
    ],
};

// =============================================================================
// Ownership and purchase history
// =============================================================================

// An ownership row dies with its user or game; a transaction row outlives
// both, keeping the monetary record with the reference nulled.

pub static USER_LIBRARY: TableSchema = TableSchema {
    name: "user_library",
    columns: &[
        Column::required("user_game_id", ColumnType::Integer).autoincrement(),
        Column::new("user_id", ColumnType::Integer),
        Column::new("game_id", ColumnType::Integer),
        Column::new("purchase_date", ColumnType::Timestamp).default_sql("CURRENT_TIMESTAMP"),
    ],
    foreign_keys: &[
        ForeignKey::new("user_id", "users", "user_id").cascade(),
        ForeignKey::new("game_id", "games", "game_id").cascade(),
    ],
    unique_constraints: &[&["user_id", "game_id"]],
    indexes: &[
        Index::on("idx_user_library_user", &["user_id"]),
        Index::on("idx_user_library_game", &["game_id"]),
    ],
};

pub static TRANSACTIONS: TableSchema = TableSchema {
    name: "transactions",
    columns: &[
        Column::required("transaction_id", ColumnType::Integer).autoincrement(),
        Column::new("user_id", ColumnType::Integer),
        Column::new("game_id", ColumnType::Integer),
        Column::new("transaction_date", ColumnType::Timestamp).default_sql("CURRENT_TIMESTAMP"),
        Column::new("amount", ColumnType::Decimal(10, 2)),
        Column::new("developer_revenue", ColumnType::Decimal(10, 2)),
        Column::new("platform_commission", ColumnType::Decimal(10, 2)),
    ],
    foreign_keys: &[
        ForeignKey::new("user_id", "users", "user_id").set_null(),
        ForeignKey::new("game_id", "games", "game_id").set_null(),
    ],
    unique_constraints: &[],
    indexes: &[Index::on("idx_transactions_date", &["transaction_date"])],
};

// =============================================================================
// Schema Registry
// =============================================================================

/// All table schemas in dependency order (parents before children)
pub static ALL_TABLES: &[&TableSchema] = &[
    &USERS,
    &DEVELOPERS,
    &GAMES,
    &USER_LIBRARY,
    &TRANSACTIONS,
];

/// Get table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_lookup() {
        assert!(get_table("user_library").is_some());
        assert!(get_table("achievements").is_none());
        assert_eq!(table_names().len(), ALL_TABLES.len());
    }

    #[test]
    fn test_parents_precede_children() {
        let mut seen: HashSet<&str> = HashSet::new();
        for table in ALL_TABLES {
            for dep in table.dependencies() {
                assert!(
                    seen.contains(dep),
                    "{} depends on {} which is declared later",
                    table.name,
                    dep
                );
            }
            seen.insert(table.name);
        }
    }
}
