//! Database connection and statement execution

pub mod connection_string;
pub mod schema_sync;
pub mod seed;
pub mod trace;

use std::path::Path;
use std::time::{Duration, Instant};

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info, warn};

use crate::config::ConnectionSettings;
use crate::models;
use crate::orm::{AssociationRegistry, Entity, EntityQuery, Result, SqlStatement};

pub use trace::{TraceEvent, TraceSink, stdout_sink};

/// Database wrapper providing connection pool access
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    registry: &'static AssociationRegistry,
    trace: Option<TraceSink>,
}

impl Database {
    /// Create a new database wrapper from an existing pool
    pub fn new(pool: SqlitePool, registry: &'static AssociationRegistry) -> Self {
        Self {
            pool,
            registry,
            trace: None,
        }
    }

    /// Open a pool for a named connection.
    ///
    /// The association registry is built here, so invalid associations fail
    /// before any query runs.
    pub async fn connect(settings: &ConnectionSettings, max_connections: u32) -> Result<Self> {
        let registry = models::registry()?;
        let options = connection_string::connect_options(settings)?;

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        info!(
            configuration = %settings.name,
            associations = registry.len(),
            "Connected to database"
        );

        Ok(Self::new(pool, registry))
    }

    /// Route trace events of every connection to `sink`.
    pub fn with_trace(mut self, sink: TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn registry(&self) -> &'static AssociationRegistry {
        self.registry
    }

    /// Acquire a connection. It returns to the pool when dropped.
    pub async fn connection(&self) -> Result<DataConnection> {
        let conn = self.pool.acquire().await?;
        Ok(DataConnection {
            conn,
            registry: self.registry,
            trace: self.trace.clone(),
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// One pooled connection scoped to a unit of work.
pub struct DataConnection {
    conn: PoolConnection<Sqlite>,
    registry: &'static AssociationRegistry,
    trace: Option<TraceSink>,
}

impl DataConnection {
    /// Start a query over the table of `E`.
    pub fn table<E: Entity>(&mut self) -> EntityQuery<'_, E> {
        EntityQuery::new(self)
    }

    pub fn registry(&self) -> &'static AssociationRegistry {
        self.registry
    }

    /// Run a statement and return its raw rows.
    pub async fn fetch_rows(&mut self, statement: &SqlStatement) -> Result<Vec<SqliteRow>> {
        debug!(sql = %statement.sql, params = ?statement.params, "Executing query");
        self.emit(&TraceEvent::BeforeExecute {
            sql: &statement.sql,
            params: &statement.params,
        });

        let mut query = sqlx::query(&statement.sql);
        for value in &statement.params {
            query = value.bind_to_query(query);
        }

        let started = Instant::now();
        match query.fetch_all(&mut *self.conn).await {
            Ok(rows) => {
                self.emit(&TraceEvent::AfterExecute {
                    sql: &statement.sql,
                    elapsed: started.elapsed(),
                    rows: rows.len(),
                });
                Ok(rows)
            }
            Err(error) => {
                self.emit(&TraceEvent::Error {
                    sql: &statement.sql,
                    elapsed: started.elapsed(),
                    error: &error,
                });
                Err(error.into())
            }
        }
    }

    fn emit(&self, event: &TraceEvent<'_>) {
        if let Some(sink) = &self.trace {
            sink(event);
        }
    }
}

/// Bring the database file up to the Northwind schema and sample rows.
///
/// Missing tables and columns are created and missing rows inserted, so an
/// empty or partially prepared file is completed on the next run. Returns
/// whether the file was created.
pub async fn prepare_database(path: &Path) -> anyhow::Result<bool> {
    use anyhow::Context;

    let created = !path.exists();
    if created {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(created);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let sync = schema_sync::sync_all_entity_schemas(&pool).await;
    let seeded = if sync.errors.is_empty() {
        seed::run_seeds(&pool).await
    } else {
        seed::SeedResult::default()
    };
    pool.close().await;

    let errors: Vec<String> = sync.errors.into_iter().chain(seeded.errors).collect();
    if !errors.is_empty() {
        for error in &errors {
            warn!("{}", error);
        }
        anyhow::bail!("Failed to prepare {}: {}", path.display(), errors.join("; "));
    }

    info!(
        path = %path.display(),
        created,
        tables = ?sync.tables_created,
        columns = ?sync.columns_added,
        rows = ?seeded.tables_seeded,
        "Prepared sample database"
    );
    Ok(created)
}
