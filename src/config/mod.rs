//! Application configuration management

use std::env;

use anyhow::{Context, Result, bail};

use crate::orm::OrmError;

/// Name of the connection configuration the sample ships with
pub const DEFAULT_CONFIGURATION: &str = "Northwind";

/// Provider name used when a connection does not name one
pub const DEFAULT_PROVIDER: &str = "SQLite";

/// How result rows are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `{ Field = value, ... }`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// How log events are written to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// One named connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub name: String,
    pub provider_name: String,
    /// Either a `sqlite:` URL or `Data Source=...;Read Only=True` pairs
    pub connection_string: String,
}

/// Named connections plus the defaults used to pick one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSettings {
    pub default_configuration: String,
    pub default_data_provider: String,
    pub connections: Vec<ConnectionSettings>,
}

impl DataSettings {
    /// Look up a connection by name (case-sensitive).
    pub fn connection(&self, name: &str) -> Result<&ConnectionSettings, OrmError> {
        self.connections
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| OrmError::UnknownConfiguration(name.to_string()))
    }

    /// The connection named by `default_configuration`.
    pub fn default_connection(&self) -> Result<&ConnectionSettings, OrmError> {
        self.connection(&self.default_configuration)
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file
    pub database_path: String,

    /// Connection settings, with the default configuration name
    pub data: DataSettings,

    /// Pool size
    pub max_connections: u32,

    /// Print generated SQL before and after each statement
    pub trace_sql: bool,

    /// Create and seed the database file when it is missing
    pub seed: bool,

    /// Wait for Enter after the queries ran
    pub wait_for_key: bool,

    pub output: OutputFormat,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_path = var("NORTHWIND_DATABASE_PATH")
            .unwrap_or_else(|| "./data/northwind.sqlite".to_string());

        let default_configuration =
            var("NORTHWIND_CONFIGURATION").unwrap_or_else(|| DEFAULT_CONFIGURATION.to_string());

        let connection_string = var("NORTHWIND_CONNECTION_STRING")
            .unwrap_or_else(|| format!("Data Source={};Read Only=True", database_path));

        let data = DataSettings {
            default_configuration,
            default_data_provider: DEFAULT_PROVIDER.to_string(),
            connections: vec![ConnectionSettings {
                name: DEFAULT_CONFIGURATION.to_string(),
                provider_name: var("NORTHWIND_PROVIDER")
                    .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
                connection_string,
            }],
        };

        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .parse()
                .with_context(|| format!("Invalid DATABASE_MAX_CONNECTIONS: {}", value))?,
            None => 4,
        };

        let output = match var("NORTHWIND_OUTPUT").as_deref() {
            None | Some("text") => OutputFormat::Text,
            Some("json") => OutputFormat::Json,
            Some(other) => bail!("Invalid NORTHWIND_OUTPUT: {} (expected text or json)", other),
        };

        let log_format = match var("NORTHWIND_LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!(
                "Invalid NORTHWIND_LOG_FORMAT: {} (expected pretty or json)",
                other
            ),
        };

        Ok(Self {
            database_path,
            data,
            max_connections,
            trace_sql: parse_flag(&var, "NORTHWIND_TRACE", true)?,
            seed: parse_flag(&var, "NORTHWIND_SEED", true)?,
            wait_for_key: parse_flag(&var, "NORTHWIND_WAIT_FOR_KEY", true)?,
            output,
            log_format,
        })
    }
}

fn parse_flag(var: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    let Some(value) = var(key) else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("Invalid {}: {} (expected true or false)", key, value),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_path, "./data/northwind.sqlite");
        assert_eq!(config.max_connections, 4);
        assert!(config.trace_sql);
        assert!(config.seed);
        assert_eq!(config.output, OutputFormat::Text);

        let connection = config.data.default_connection().unwrap();
        assert_eq!(connection.name, "Northwind");
        assert_eq!(
            connection.connection_string,
            "Data Source=./data/northwind.sqlite;Read Only=True"
        );
    }

    #[test]
    fn test_unknown_default_configuration() {
        let config = load(&[("NORTHWIND_CONFIGURATION", "Northiwnd")]).unwrap();
        assert_matches!(
            config.data.default_connection(),
            Err(OrmError::UnknownConfiguration(name)) if name == "Northiwnd"
        );
    }

    #[test]
    fn test_flags_and_formats() {
        let config = load(&[
            ("NORTHWIND_TRACE", "off"),
            ("NORTHWIND_WAIT_FOR_KEY", "0"),
            ("NORTHWIND_OUTPUT", "json"),
        ])
        .unwrap();
        assert!(!config.trace_sql);
        assert!(!config.wait_for_key);
        assert_eq!(config.output, OutputFormat::Json);

        assert!(load(&[("NORTHWIND_SEED", "maybe")]).is_err());
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
    }
}
