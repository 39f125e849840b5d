use anyhow::{bail, Result};
use rusqlite::{params, Connection};

pub const DEFAULT_TIMESTAMP: &str = "(cast(strftime('%s','now') as int))";

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
    pub default_value: Option<&'static str>,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn create_if_missing(&self, conn: &Connection) -> Result<()> {
        let columns_sql: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let mut sql = format!(
                    "{} {}",
                    column.name,
                    match column.sql_type {
                        SqlType::Text => "TEXT",
                        SqlType::Integer => "INTEGER",
                    }
                );
                if column.is_primary_key {
                    sql.push_str(" PRIMARY KEY");
                }
                if column.non_null {
                    sql.push_str(" NOT NULL");
                }
                if let Some(default_value) = column.default_value {
                    sql.push_str(&format!(" DEFAULT {}", default_value));
                }
                sql
            })
            .collect();

        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {} ({});",
                self.name,
                columns_sql.join(", ")
            ),
            params![],
        )?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }
}

/// Log of every dataset import, newest last.
pub const IMPORTS_TABLE: Table = Table {
    name: "_imports",
    columns: &[
        Column {
            name: "id",
            sql_type: SqlType::Integer,
            is_primary_key: true,
            non_null: false,
            default_value: None,
        },
        Column {
            name: "table_name",
            sql_type: SqlType::Text,
            is_primary_key: false,
            non_null: true,
            default_value: None,
        },
        Column {
            name: "source",
            sql_type: SqlType::Text,
            is_primary_key: false,
            non_null: true,
            default_value: None,
        },
        Column {
            name: "row_count",
            sql_type: SqlType::Integer,
            is_primary_key: false,
            non_null: true,
            default_value: None,
        },
        Column {
            name: "imported_at",
            sql_type: SqlType::Integer,
            is_primary_key: false,
            non_null: true,
            default_value: Some(DEFAULT_TIMESTAMP),
        },
    ],
    indices: &[("idx_imports_table_name", "table_name")],
};

/// Dataset table names end up in SQL text, so only plain identifiers are
/// accepted. Names starting with an underscore are reserved for the store.
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid {
        bail!(
            "Invalid table name '{}': expected letters, digits and underscores, starting with a letter",
            name
        );
    }
    Ok(())
}

/// Quotes a column identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
