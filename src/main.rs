//! Northwind associations sample
//!
//! Runs the four association queries against the configured SQLite database
//! and prints their rows.

use std::io::Write;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use northwind_associations::config::{Config, LogFormat, OutputFormat};
use northwind_associations::db::{self, Database, connection_string};
use northwind_associations::orm::ProjectionRow;
use northwind_associations::queries;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(config.log_format);

    let settings = config.data.default_connection()?;
    if config.seed {
        // Seed the file named by the connection string, not the configured path
        match connection_string::database_file(settings)? {
            Some(path) => {
                db::prepare_database(&path).await?;
            }
            None => warn!(configuration = %settings.name, "In-memory database, nothing to seed"),
        }
    }

    let mut database = Database::connect(settings, config.max_connections)
        .await
        .with_context(|| format!("Failed to open connection {}", settings.name))?;
    if config.trace_sql {
        database = database.with_trace(db::stdout_sink());
    }

    print_rows(
        config.output,
        "order information",
        &queries::order_information(&database).await?,
    )?;
    print_rows(
        config.output,
        "territory links",
        &queries::territory_links(&database).await?,
    )?;
    print_rows(
        config.output,
        "order details",
        &queries::order_details(&database).await?,
    )?;
    print_rows(
        config.output,
        "order details with big discount",
        &queries::order_details_with_big_discount(&database).await?,
    )?;

    database.close().await;

    if config.wait_for_key {
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "northwind_associations=info".into());
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .init(),
    }
}

fn print_rows(output: OutputFormat, query: &str, rows: &[ProjectionRow]) -> Result<()> {
    info!(query, rows = rows.len(), "Query finished");

    let mut stdout = std::io::stdout().lock();
    for row in rows {
        match output {
            OutputFormat::Text => writeln!(stdout, "{}", row)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut stdout, row)?;
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}
