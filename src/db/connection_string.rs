//! Connection string parsing
//!
//! Accepts either a sqlx URL (`sqlite://path?mode=ro`) or the key/value form
//! used by ADO.NET SQLite providers:
//!
//! ```text
//! Data Source=./data/northwind.sqlite;Read Only=True
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use sqlx::sqlite::SqliteConnectOptions;

use crate::config::ConnectionSettings;
use crate::orm::{OrmError, Result};

/// Provider names that resolve to SQLite
const SQLITE_PROVIDERS: &[&str] = &[
    "sqlite",
    "system.data.sqlite",
    "microsoft.data.sqlite",
    "sqlite.classic",
    "sqlite.ms",
];

/// Connect options for a named connection.
pub fn connect_options(settings: &ConnectionSettings) -> Result<SqliteConnectOptions> {
    let provider = settings.provider_name.to_ascii_lowercase();
    if !SQLITE_PROVIDERS.contains(&provider.as_str()) {
        return Err(OrmError::UnsupportedProvider(settings.provider_name.clone()));
    }

    parse(&settings.connection_string)
}

/// File a named connection opens, or `None` for an in-memory database.
pub fn database_file(settings: &ConnectionSettings) -> Result<Option<PathBuf>> {
    let options = connect_options(settings)?;
    let filename = options.get_filename();
    if filename.as_os_str() == ":memory:" {
        return Ok(None);
    }
    Ok(Some(filename.to_path_buf()))
}

pub fn parse(connection_string: &str) -> Result<SqliteConnectOptions> {
    let trimmed = connection_string.trim();
    if trimmed.starts_with("sqlite:") {
        return Ok(SqliteConnectOptions::from_str(trimmed)?);
    }

    let mut data_source = None;
    let mut read_only = false;

    for pair in trimmed.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| OrmError::InvalidConnectionString(format!("expected key=value, got {}", pair)))?;
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "data source" | "datasource" | "filename" => data_source = Some(value.to_string()),
            "read only" | "readonly" => {
                read_only = parse_bool(value).ok_or_else(|| {
                    OrmError::InvalidConnectionString(format!("invalid Read Only value {}", value))
                })?
            }
            "mode" => match value.to_ascii_lowercase().as_str() {
                "readonly" => read_only = true,
                "readwrite" | "readwritecreate" => read_only = false,
                _ => {
                    return Err(OrmError::InvalidConnectionString(format!(
                        "invalid Mode value {}",
                        value
                    )));
                }
            },
            // Accepted for compatibility, no effect
            "version" | "pooling" => {}
            other => {
                return Err(OrmError::InvalidConnectionString(format!(
                    "unknown key {}",
                    other
                )));
            }
        }
    }

    let data_source = data_source
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OrmError::InvalidConnectionString("missing Data Source".to_string()))?;

    Ok(SqliteConnectOptions::new()
        .filename(data_source)
        .read_only(read_only))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
