//! The four demonstration queries
//!
//! Each query acquires its own connection and releases it when it returns,
//! whether the query succeeded or not.

use crate::db::Database;
use crate::models::order::BIG_DISCOUNT;
use crate::models::{EmployeeTerritory, Order};
use crate::orm::{ProjectionRow, Result, SortDirection, col, nav};

/// Rows kept by the sampled queries
pub const SAMPLE_TAKE: i64 = 10;

/// Orders whose employee's address starts with "B".
///
/// `Order.Employee` is nullable, so the employee is LEFT JOINed and orders
/// without one drop out through the filter only.
pub async fn order_information(db: &Database) -> Result<Vec<ProjectionRow>> {
    let mut conn = db.connection().await?;
    let rows = conn
        .table::<Order>()
        .filter(nav("Employee").col("Address").starts_with("B"))
        .order_by(col("OrderID"), SortDirection::Asc)
        .select([
            ("OrderID", col("OrderID")),
            ("OrderDate", col("OrderDate")),
            ("Address", nav("Employee").col("Address")),
        ])
        .take(SAMPLE_TAKE)
        .fetch_all()
        .await?;
    Ok(rows)
}

/// Employee/territory links for territories starting with "B".
pub async fn territory_links(db: &Database) -> Result<Vec<ProjectionRow>> {
    let mut conn = db.connection().await?;
    let rows = conn
        .table::<EmployeeTerritory>()
        .filter(
            nav("Territory")
                .col("TerritoryDescription")
                .starts_with("B"),
        )
        .select([
            ("EmployeeID", nav("Employee").col("EmployeeID")),
            ("BirthDate", nav("Employee").col("BirthDate")),
            ("Territory", nav("Territory").col("TerritoryDescription").trim()),
            ("Address", nav("Employee").col("Address")),
        ])
        .fetch_all()
        .await?;
    Ok(rows)
}

/// Orders with any detail discounted above 0.06, with their largest discount.
pub async fn order_details(db: &Database) -> Result<Vec<ProjectionRow>> {
    let mut conn = db.connection().await?;
    let rows = conn
        .table::<Order>()
        .filter(nav("Details").any_where(col("Discount").gt(BIG_DISCOUNT)))
        .order_by(col("OrderID"), SortDirection::Asc)
        .select([
            ("EmployeeID", col("EmployeeID")),
            ("MaxDiscount", nav("Details").max(col("Discount"))),
        ])
        .take(SAMPLE_TAKE)
        .fetch_all()
        .await?;
    Ok(rows)
}

/// The same orders through the `DetailsWithBigDiscount` association.
pub async fn order_details_with_big_discount(db: &Database) -> Result<Vec<ProjectionRow>> {
    let mut conn = db.connection().await?;
    let rows = conn
        .table::<Order>()
        .filter(nav("DetailsWithBigDiscount").any())
        .order_by(col("OrderID"), SortDirection::Asc)
        .select([
            ("EmployeeID", col("EmployeeID")),
            (
                "MaxDiscount",
                nav("DetailsWithBigDiscount").max(col("Discount")),
            ),
        ])
        .take(SAMPLE_TAKE)
        .fetch_all()
        .await?;
    Ok(rows)
}
