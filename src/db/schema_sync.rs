//! Schema synchronization from entity definitions
//!
//! - Creates missing tables from `DatabaseSchema::COLUMNS`
//! - Adds missing nullable columns to existing tables
//! - Does NOT handle column renames or type changes

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::models::{Employee, EmployeeTerritory, Order, OrderDetail, Territory};
use crate::orm::{ColumnDef, DatabaseSchema, quote_ident};

/// Result of a schema sync operation
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub columns_added: Vec<(String, String)>, // (table, column)
    pub errors: Vec<String>,
}

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Get existing columns for a table
async fn get_table_columns(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as(&format!("PRAGMA table_info({})", quote_ident(table_name)))
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(_, name, _, _, _, _)| name).collect())
}

/// Sync a single entity's table to the database
pub async fn sync_entity<E: DatabaseSchema>(
    pool: &SqlitePool,
) -> Result<SchemaSyncResult, sqlx::Error> {
    let mut result = SchemaSyncResult::default();
    let table_name = E::TABLE_NAME;

    if !table_exists(pool, table_name).await? {
        let create_sql = E::create_table_sql();
        debug!("Creating table {}: {}", table_name, create_sql);

        match sqlx::query(&create_sql).execute(pool).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
        return Ok(result);
    }

    let existing_columns = get_table_columns(pool, table_name).await?;
    for col_def in E::COLUMNS {
        if existing_columns.iter().any(|c| c == col_def.name) {
            continue;
        }

        let alter_sql = generate_add_column_sql(table_name, col_def);
        debug!("Adding column to {}: {}", table_name, alter_sql);

        match sqlx::query(&alter_sql).execute(pool).await {
            Ok(_) => {
                info!("Added column {}.{}", table_name, col_def.name);
                result
                    .columns_added
                    .push((table_name.to_string(), col_def.name.to_string()));
            }
            Err(e) => {
                let msg = format!("Failed to add column {}.{}: {}", table_name, col_def.name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    Ok(result)
}

/// Generate ALTER TABLE ADD COLUMN SQL
fn generate_add_column_sql(table_name: &str, col: &ColumnDef) -> String {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote_ident(table_name),
        quote_ident(col.name),
        col.sql_type
    );

    // SQLite cannot add a NOT NULL column without a default
    if let Some(default) = col.default {
        sql.push_str(&format!(" DEFAULT {}", default));
    } else if !col.nullable {
        let default_val = match col.sql_type {
            "INTEGER" => "0",
            "REAL" => "0.0",
            _ => "''",
        };
        sql.push_str(&format!(" NOT NULL DEFAULT {}", default_val));
    }

    sql
}

/// Sync every Northwind table.
pub async fn sync_all_entity_schemas(pool: &SqlitePool) -> SchemaSyncResult {
    let mut total_result = SchemaSyncResult::default();

    macro_rules! sync_one {
        ($entity:ty) => {
            match sync_entity::<$entity>(pool).await {
                Ok(result) => {
                    total_result.tables_created.extend(result.tables_created);
                    total_result.columns_added.extend(result.columns_added);
                    total_result.errors.extend(result.errors);
                }
                Err(e) => {
                    total_result.errors.push(format!(
                        "Error syncing {}: {}",
                        stringify!($entity),
                        e
                    ));
                }
            }
        };
    }

    sync_one!(Employee);
    sync_one!(Territory);
    sync_one!(EmployeeTerritory);
    sync_one!(Order);
    sync_one!(OrderDetail);

    total_result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_composite_key_is_a_table_constraint() {
        assert_eq!(
            OrderDetail::create_table_sql(),
            "CREATE TABLE IF NOT EXISTS \"Order Details\" (\n  \
             \"OrderID\" INTEGER NOT NULL,\n  \
             \"ProductID\" INTEGER NOT NULL,\n  \
             \"UnitPrice\" REAL NOT NULL,\n  \
             \"Quantity\" INTEGER NOT NULL,\n  \
             \"Discount\" REAL NOT NULL,\n  \
             PRIMARY KEY (\"OrderID\", \"ProductID\")\n)"
        );
    }

    #[test]
    fn test_nullable_columns() {
        let sql = Order::create_table_sql();
        assert!(sql.contains("\"OrderID\" INTEGER PRIMARY KEY"));
        assert!(sql.contains("\"EmployeeID\" INTEGER,"));
        assert!(sql.contains("\"OrderDate\" DATETIME,"));
    }

    #[test]
    fn test_add_column_sql_defaults_not_null() {
        let column = ColumnDef {
            name: "Quantity",
            sql_type: "INTEGER",
            nullable: false,
            is_primary_key: false,
            default: None,
        };
        assert_eq!(
            generate_add_column_sql("Order Details", &column),
            "ALTER TABLE \"Order Details\" ADD COLUMN \"Quantity\" INTEGER NOT NULL DEFAULT 0"
        );
    }
}
