use super::types::{ColumnType, OnDelete, TableSchema};

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut lines = Vec::new();

    for col in schema.columns {
        let sql_type = match col.col_type {
            ColumnType::Integer => "INTEGER".to_string(),
            ColumnType::Text => "TEXT".to_string(),
            ColumnType::Char(width) => format!("CHAR({})", width),
            ColumnType::Date => "DATE".to_string(),
            ColumnType::Timestamp => "TIMESTAMP".to_string(),
            ColumnType::Decimal(precision, scale) => format!("DECIMAL({},{})", precision, scale),
            ColumnType::Boolean => "BOOLEAN".to_string(),
        };

        let mut line = format!("    {} {}", col.name, sql_type);
        if col.primary_key {
            line.push_str(" PRIMARY KEY");
        }
        if col.autoincrement {
            line.push_str(" AUTOINCREMENT");
        }
        if let Some(expr) = col.check {
            line.push_str(&format!(" CHECK ({})", expr));
        }
        if col.unique {
            line.push_str(" UNIQUE");
        }
        // The PK column is NOT NULL by definition; repeating it is noise
        if !col.nullable && !col.primary_key {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = col.default {
            line.push_str(&format!(" DEFAULT {}", default));
        }
        lines.push(line);
    }

    for group in schema.unique_constraints {
        lines.push(format!("    UNIQUE({})", group.join(", ")));
    }

    for fk in schema.foreign_keys {
        let mut line = format!(
            "    FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        );
        match fk.on_delete {
            OnDelete::NoAction => {}
            OnDelete::Cascade => line.push_str(" ON DELETE CASCADE"),
            OnDelete::SetNull => line.push_str(" ON DELETE SET NULL"),
        }
        lines.push(line);
    }

    sql.push_str(&lines.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for a table's declared indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .indexes
        .iter()
        .map(|index| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                index.name,
                schema.name,
                index.columns.join(", ")
            )
        })
        .collect()
}
