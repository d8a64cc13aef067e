//! Sample Northwind data for a freshly created database.
//!
//! Runs after schema sync. Uses INSERT OR IGNORE so re-runs are idempotent
//! (existing rows are preserved).
//!
//! The rows are chosen so every demo query has something to show: addresses
//! starting with "B" (and one with a lowercase "b"), an order without an
//! employee, an employee without an address, territory descriptions padded
//! with blanks, and discounts below, at and above 0.06.

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

/// Width of the fixed-width `TerritoryDescription` column
const TERRITORY_DESCRIPTION_WIDTH: usize = 50;

/// Result of running seed operations.
#[derive(Debug, Default)]
pub struct SeedResult {
    pub tables_seeded: Vec<String>,
    pub errors: Vec<String>,
}

async fn seed_employees(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    #[derive(Debug)]
    struct EmployeeRow {
        id: i64,
        last_name: &'static str,
        first_name: &'static str,
        title: &'static str,
        birth_date: Option<&'static str>,
        hire_date: Option<&'static str>,
        address: Option<&'static str>,
        city: &'static str,
        country: &'static str,
    }

    let rows: &[EmployeeRow] = &[
        EmployeeRow {
            id: 1,
            last_name: "Davolio",
            first_name: "Nancy",
            title: "Sales Representative",
            birth_date: Some("1948-12-08 00:00:00"),
            hire_date: Some("1992-05-01 00:00:00"),
            address: Some("507 - 20th Ave. E."),
            city: "Seattle",
            country: "USA",
        },
        EmployeeRow {
            id: 2,
            last_name: "Fuller",
            first_name: "Andrew",
            title: "Vice President, Sales",
            birth_date: Some("1952-02-19 00:00:00"),
            hire_date: Some("1992-08-14 00:00:00"),
            address: Some("Bayside Way 908"),
            city: "Tacoma",
            country: "USA",
        },
        EmployeeRow {
            id: 3,
            last_name: "Leverling",
            first_name: "Janet",
            title: "Sales Representative",
            birth_date: Some("1963-08-30 00:00:00"),
            hire_date: Some("1992-04-01 00:00:00"),
            address: Some("722 Moss Bay Blvd."),
            city: "Kirkland",
            country: "USA",
        },
        EmployeeRow {
            id: 4,
            last_name: "Peacock",
            first_name: "Margaret",
            title: "Sales Representative",
            birth_date: Some("1937-09-19 00:00:00"),
            hire_date: Some("1993-05-03 00:00:00"),
            address: Some("Birch Lane 4110"),
            city: "Redmond",
            country: "USA",
        },
        EmployeeRow {
            id: 5,
            last_name: "Buchanan",
            first_name: "Steven",
            title: "Sales Manager",
            birth_date: Some("1955-03-04 00:00:00"),
            hire_date: Some("1993-10-17 00:00:00"),
            address: Some("14 Garrett Hill"),
            city: "London",
            country: "UK",
        },
        EmployeeRow {
            id: 6,
            last_name: "Suyama",
            first_name: "Michael",
            title: "Sales Representative",
            birth_date: Some("1963-07-02 00:00:00"),
            hire_date: Some("1993-10-17 00:00:00"),
            address: Some("Coventry House Miner Rd."),
            city: "London",
            country: "UK",
        },
        EmployeeRow {
            id: 7,
            last_name: "King",
            first_name: "Robert",
            title: "Sales Representative",
            birth_date: Some("1960-05-29 00:00:00"),
            hire_date: Some("1994-01-02 00:00:00"),
            address: None,
            city: "London",
            country: "UK",
        },
        EmployeeRow {
            id: 8,
            last_name: "Callahan",
            first_name: "Laura",
            title: "Inside Sales Coordinator",
            birth_date: Some("1958-01-09 00:00:00"),
            hire_date: Some("1994-03-05 00:00:00"),
            address: Some("bridge Road 4726"),
            city: "Seattle",
            country: "USA",
        },
        EmployeeRow {
            id: 9,
            last_name: "Dodsworth",
            first_name: "Anne",
            title: "Sales Representative",
            birth_date: None,
            hire_date: Some("1994-11-15 00:00:00"),
            address: Some("7 Houndstooth Rd."),
            city: "London",
            country: "UK",
        },
    ];

    let mut inserted = 0u64;
    for row in rows {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "Employees"
               ("EmployeeID", "LastName", "FirstName", "Title", "BirthDate", "HireDate", "Address", "City", "Country")
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(row.id)
        .bind(row.last_name)
        .bind(row.first_name)
        .bind(row.title)
        .bind(row.birth_date)
        .bind(row.hire_date)
        .bind(row.address)
        .bind(row.city)
        .bind(row.country)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn seed_territories(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    // (TerritoryID, TerritoryDescription, RegionID)
    let rows: &[(&str, &str, i64)] = &[
        ("01581", "Westboro", 1),
        ("01730", "Bedford", 1),
        ("01833", "Georgetow", 1),
        ("02116", "Boston", 1),
        ("02184", "Braintree", 1),
        ("10019", "New York", 1),
        ("98004", "Bellevue", 2),
        ("98052", "Redmond", 2),
        ("98104", "Seattle", 2),
    ];

    let mut inserted = 0u64;
    for (id, description, region) in rows {
        let padded = format!("{:<width$}", description, width = TERRITORY_DESCRIPTION_WIDTH);
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "Territories" ("TerritoryID", "TerritoryDescription", "RegionID")
               VALUES (?, ?, ?)"#,
        )
        .bind(*id)
        .bind(padded)
        .bind(*region)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn seed_employee_territories(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let rows: &[(i64, &str)] = &[
        (1, "98004"),
        (1, "98104"),
        (2, "01581"),
        (2, "01730"),
        (2, "02116"),
        (3, "98052"),
        (4, "98004"),
        (5, "02184"),
        (5, "10019"),
        (6, "98104"),
        (7, "98052"),
        (8, "01833"),
        (9, "02116"),
    ];

    let mut inserted = 0u64;
    for (employee_id, territory_id) in rows {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "EmployeeTerritories" ("EmployeeID", "TerritoryID") VALUES (?, ?)"#,
        )
        .bind(*employee_id)
        .bind(*territory_id)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn seed_orders(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    // (OrderID, CustomerID, EmployeeID, OrderDate, ShipCity)
    let rows: &[(i64, &str, Option<i64>, &str, &str)] = &[
        (10248, "VINET", Some(5), "1996-07-04 00:00:00", "Reims"),
        (10249, "TOMSP", Some(6), "1996-07-05 00:00:00", "Münster"),
        (10250, "HANAR", Some(4), "1996-07-08 00:00:00", "Rio de Janeiro"),
        (10251, "VICTE", Some(3), "1996-07-08 00:00:00", "Lyon"),
        (10252, "SUPRD", Some(4), "1996-07-09 00:00:00", "Charleroi"),
        (10253, "HANAR", Some(3), "1996-07-10 00:00:00", "Rio de Janeiro"),
        (10254, "CHOPS", Some(5), "1996-07-11 00:00:00", "Bern"),
        (10255, "RICSU", Some(9), "1996-07-12 00:00:00", "Genève"),
        (10256, "WELLI", Some(3), "1996-07-15 00:00:00", "Resende"),
        (10257, "HILAA", Some(4), "1996-07-16 00:00:00", "San Cristóbal"),
        (10258, "ERNSH", Some(1), "1996-07-17 00:00:00", "Graz"),
        (10259, "CENTC", Some(4), "1996-07-18 00:00:00", "México D.F."),
        (10260, "OTTIK", None, "1996-07-19 00:00:00", "Köln"),
        (10261, "QUEDE", Some(2), "1996-07-19 00:00:00", "Rio de Janeiro"),
        (10262, "RATTC", Some(8), "1996-07-22 00:00:00", "Albuquerque"),
        (10263, "ERNSH", Some(7), "1996-07-23 00:00:00", "Graz"),
        (10264, "FOLKO", Some(6), "1996-07-24 00:00:00", "Bräcke"),
    ];

    let mut inserted = 0u64;
    for (order_id, customer_id, employee_id, order_date, ship_city) in rows {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "Orders" ("OrderID", "CustomerID", "EmployeeID", "OrderDate", "ShipCity")
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(*order_id)
        .bind(*customer_id)
        .bind(*employee_id)
        .bind(*order_date)
        .bind(*ship_city)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

async fn seed_order_details(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    // (OrderID, ProductID, UnitPrice, Quantity, Discount)
    let rows: &[(i64, i64, f64, i64, f64)] = &[
        (10248, 11, 14.0, 12, 0.0),
        (10248, 42, 9.8, 10, 0.0),
        (10248, 72, 34.8, 5, 0.0),
        (10249, 14, 18.6, 9, 0.0),
        (10249, 51, 42.4, 40, 0.0),
        (10250, 41, 7.7, 10, 0.0),
        (10250, 51, 42.4, 35, 0.15),
        (10250, 65, 16.8, 15, 0.15),
        (10251, 22, 16.8, 6, 0.05),
        (10251, 57, 15.6, 15, 0.05),
        (10251, 65, 16.8, 20, 0.0),
        (10252, 20, 64.8, 40, 0.05),
        (10252, 33, 2.0, 25, 0.05),
        (10252, 60, 27.2, 40, 0.0),
        (10253, 31, 10.0, 20, 0.0),
        (10253, 39, 14.4, 42, 0.0),
        (10253, 49, 16.0, 40, 0.0),
        (10254, 24, 3.6, 15, 0.15),
        (10254, 55, 19.2, 21, 0.15),
        (10254, 74, 8.0, 21, 0.0),
        (10255, 2, 15.2, 20, 0.0),
        (10255, 16, 13.9, 35, 0.0),
        (10256, 53, 26.2, 15, 0.06),
        (10256, 77, 10.4, 12, 0.0),
        (10257, 27, 35.1, 25, 0.0),
        (10257, 39, 14.4, 6, 0.0),
        (10258, 2, 15.2, 50, 0.2),
        (10258, 5, 17.0, 65, 0.2),
        (10258, 32, 25.6, 6, 0.2),
        (10259, 21, 8.0, 10, 0.0),
        (10259, 37, 20.8, 1, 0.0),
        (10260, 41, 7.7, 16, 0.25),
        (10260, 57, 15.6, 50, 0.0),
        (10260, 62, 39.4, 15, 0.25),
        (10260, 70, 12.0, 21, 0.25),
        (10261, 21, 8.0, 20, 0.0),
        (10261, 35, 14.4, 20, 0.0),
        (10262, 5, 17.0, 12, 0.2),
        (10262, 7, 24.0, 15, 0.0),
        (10263, 16, 13.9, 60, 0.25),
        (10263, 24, 3.6, 28, 0.0),
    ];

    let mut inserted = 0u64;
    for (order_id, product_id, unit_price, quantity, discount) in rows {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO "Order Details" ("OrderID", "ProductID", "UnitPrice", "Quantity", "Discount")
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(*order_id)
        .bind(*product_id)
        .bind(*unit_price)
        .bind(*quantity)
        .bind(*discount)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

/// Insert the sample rows into every Northwind table.
pub async fn run_seeds(pool: &SqlitePool) -> SeedResult {
    let mut result = SeedResult::default();

    for (table, count) in [
        ("Employees", seed_employees(pool).await),
        ("Territories", seed_territories(pool).await),
        ("EmployeeTerritories", seed_employee_territories(pool).await),
        ("Orders", seed_orders(pool).await),
        ("Order Details", seed_order_details(pool).await),
    ] {
        match count {
            Ok(n) => {
                if n > 0 {
                    debug!(table = table, count = n, "Seeded table");
                    result.tables_seeded.push(format!("{} ({} rows)", table, n));
                }
            }
            Err(e) => {
                let msg = format!("Seed {}: {}", table, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    if !result.tables_seeded.is_empty() {
        info!(tables = ?result.tables_seeded, "Sample data applied");
    }

    result
}
