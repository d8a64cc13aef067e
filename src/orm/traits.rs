//! Core traits for the ORM layer
//!
//! These traits are implemented by the `#[derive(Entity)]` macro from
//! `northwind-macros`.

use std::fmt;

use serde::Serialize;
use sqlx::sqlite::SqliteRow;

/// Column definition for schema generation.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    /// Column name in the database
    pub name: &'static str,
    /// SQLite column type (TEXT, INTEGER, REAL, DATETIME, BLOB)
    pub sql_type: &'static str,
    /// Whether the column can be NULL
    pub nullable: bool,
    /// Whether this column is part of the primary key
    pub is_primary_key: bool,
    /// Default value expression (e.g., "datetime('now')")
    pub default: Option<&'static str>,
}

impl ColumnDef {
    /// Generate the column definition SQL.
    ///
    /// `inline_primary_key` is false for composite keys, which are declared
    /// as a table constraint instead.
    pub fn to_sql(&self, inline_primary_key: bool) -> String {
        let mut sql = format!("{} {}", quote_ident(self.name), self.sql_type);

        if self.is_primary_key && inline_primary_key {
            sql.push_str(" PRIMARY KEY");
        }

        if !self.nullable && !(self.is_primary_key && inline_primary_key) {
            sql.push_str(" NOT NULL");
        }

        if let Some(default) = self.default {
            sql.push_str(&format!(" DEFAULT {}", default));
        }

        sql
    }
}

/// Metadata about a database entity (table).
///
/// Implemented by `#[derive(Entity)]` macro.
pub trait DatabaseEntity: Sized + Send + Sync + Unpin {
    /// The SQL table name (e.g., "Order Details")
    const TABLE_NAME: &'static str;

    /// The primary key column names, in declaration order
    const PRIMARY_KEY: &'static [&'static str];

    /// Values of the primary key columns for this instance
    fn primary_key_values(&self) -> Vec<SqlValue>;
}

/// Trait for database schema generation.
///
/// Implemented by `#[derive(Entity)]` macro.
pub trait DatabaseSchema: DatabaseEntity {
    /// All column definitions for this entity's table
    const COLUMNS: &'static [ColumnDef];

    /// Generate CREATE TABLE IF NOT EXISTS SQL
    fn create_table_sql() -> String {
        let composite = Self::PRIMARY_KEY.len() > 1;
        let mut defs: Vec<String> = Self::COLUMNS.iter().map(|c| c.to_sql(!composite)).collect();

        if composite {
            let keys: Vec<String> = Self::PRIMARY_KEY.iter().map(|k| quote_ident(k)).collect();
            defs.push(format!("PRIMARY KEY ({})", keys.join(", ")));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            quote_ident(Self::TABLE_NAME),
            defs.join(",\n  ")
        )
    }}

/// Trait for decoding a database row into an entity.
///
/// Implemented by `#[derive(Entity)]` macro.
pub trait FromSqlRow: Sized {
    /// Decode a SQLite row into this entity type
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

/// A mapped entity: table metadata plus row decoding.
pub trait Entity: DatabaseSchema + FromSqlRow {}

impl<T: DatabaseSchema + FromSqlRow> Entity for T {}

/// Type-erased table metadata, usable in `const` and `static` items.
#[derive(Debug, Clone, Copy)]
pub struct EntityMeta {
    pub table: &'static str,
    pub primary_key: &'static [&'static str],
    pub columns: &'static [ColumnDef],
}

impl EntityMeta {
    /// Metadata of a mapped entity type
    pub const fn of<E: DatabaseSchema>() -> Self {
        Self {
            table: E::TABLE_NAME,
            primary_key: E::PRIMARY_KEY,
            columns: E::COLUMNS,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Sort direction for ORDER BY clauses.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest-newest)
    #[default]
    Asc,
    /// Descending order (Z-A, 9-1, newest-oldest)
    Desc,
}

impl SortDirection {
    /// Convert to SQL order string
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Represents a SQL value that can be bound to a query.
///
/// Used by expressions to carry literals into parameterized queries, and by
/// projections to hold decoded column values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl SqlValue {
    /// Bind this value to a sqlx query builder
    pub fn bind_to_query<'q>(
        &'q self,
        query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    ) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
        match self {
            SqlValue::String(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
            SqlValue::Float(f) => query.bind(*f),
            SqlValue::Bool(b) => query.bind(if *b { 1i32 } else { 0i32 }),
            SqlValue::Null => query.bind(None::<String>),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Int(i) => Some(*i),
            SqlValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Numeric value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Float(f) => Some(*f),
            SqlValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::String(s) => f.write_str(s),
            SqlValue::Int(i) => write!(f, "{}", i),
            SqlValue::Float(v) => write!(f, "{}", v),
            SqlValue::Bool(b) => write!(f, "{}", b),
            SqlValue::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Int(i64::from(value))
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::String(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::String(value.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Double-quote an SQL identifier (table names may contain spaces).
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_def_sql() {
        let column = ColumnDef {
            name: "Discount",
            sql_type: "REAL",
            nullable: false,
            is_primary_key: false,
            default: Some("0"),
        };
        assert_eq!(column.to_sql(true), "\"Discount\" REAL NOT NULL DEFAULT 0");

        let key = ColumnDef {
            name: "OrderID",
            sql_type: "INTEGER",
            nullable: false,
            is_primary_key: true,
            default: None,
        };
        assert_eq!(key.to_sql(true), "\"OrderID\" INTEGER PRIMARY KEY");
        assert_eq!(key.to_sql(false), "\"OrderID\" INTEGER NOT NULL");
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("Order Details"), "\"Order Details\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_sql_value_conversions() {
        assert_eq!(SqlValue::from(Some(5i64)), SqlValue::Int(5));
        assert_eq!(SqlValue::from(None::<i64>), SqlValue::Null);
        assert_eq!(SqlValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(SqlValue::from("VINET").to_string(), "VINET");
    }
}
