//! Shared fixtures for integration tests

use std::path::Path;

use northwind_associations::config::ConnectionSettings;
use northwind_associations::db::{self, Database};
use tempfile::TempDir;

/// A seeded database file that lives as long as this value.
pub struct TestDatabase {
    pub db: Database,
    _dir: TempDir,
}

pub async fn seeded_database() -> TestDatabase {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("northwind.sqlite");

    let created = db::prepare_database(&path).await.expect("seed database");
    assert!(created);

    let db = connect(&path).await;
    TestDatabase { db, _dir: dir }
}

/// Open `path` read-only, the way the binary does.
pub async fn connect(path: &Path) -> Database {
    let settings = ConnectionSettings {
        name: "Northwind".to_string(),
        provider_name: "SQLite".to_string(),
        connection_string: format!("Data Source={};Read Only=True", path.display()),
    };
    Database::connect(&settings, 2).await.expect("connect")
}
