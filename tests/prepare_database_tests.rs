//! Preparing existing database files

mod common;

use pretty_assertions::assert_eq;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use northwind_associations::db;
use northwind_associations::models::{Order, OrderDetail};
use northwind_associations::orm::SqlValue;
use northwind_associations::queries;

const ADDRESSES_STARTING_WITH_B: [i64; 5] = [10250, 10252, 10257, 10259, 10261];

async fn order_information_ids(database: &db::Database) -> Vec<i64> {
    queries::order_information(database)
        .await
        .unwrap()
        .iter()
        .filter_map(|row| row.get("OrderID").and_then(SqlValue::as_i64))
        .collect()
}

#[tokio::test]
async fn test_empty_file_is_completed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("northwind.sqlite");
    std::fs::write(&path, b"").unwrap();

    let created = db::prepare_database(&path).await.unwrap();
    assert!(!created);

    let database = common::connect(&path).await;
    assert_eq!(
        order_information_ids(&database).await,
        ADDRESSES_STARTING_WITH_B
    );
}

#[tokio::test]
async fn test_partial_file_gains_missing_columns_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("northwind.sqlite");

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::query(r#"CREATE TABLE "Orders" ("OrderID" INTEGER PRIMARY KEY)"#)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(r#"INSERT INTO "Orders" ("OrderID") VALUES (10248)"#)
        .execute(&pool)
        .await
        .unwrap();
    pool.close().await;

    assert!(!db::prepare_database(&path).await.unwrap());

    let database = common::connect(&path).await;
    assert_eq!(
        order_information_ids(&database).await,
        ADDRESSES_STARTING_WITH_B
    );

    let mut conn = database.connection().await.unwrap();
    let orders = conn.table::<Order>().fetch_all().await.unwrap();
    assert_eq!(orders.len(), 17);
    // Rows that already existed are left as they were.
    let first = orders.iter().find(|o| o.order_id == 10248).unwrap();
    assert_eq!(first.employee_id, None);
}

#[tokio::test]
async fn test_preparing_twice_adds_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("northwind.sqlite");

    assert!(db::prepare_database(&path).await.unwrap());
    assert!(!db::prepare_database(&path).await.unwrap());

    let database = common::connect(&path).await;
    let mut conn = database.connection().await.unwrap();
    assert_eq!(conn.table::<Order>().fetch_all().await.unwrap().len(), 17);
    assert_eq!(conn.table::<OrderDetail>().fetch_all().await.unwrap().len(), 41);
}
