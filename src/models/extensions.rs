//! Associations applied directly instead of through a registered name
//!
//! These descriptors are never registered, so `nav("...")` cannot reach them.
//! Queries use them with [`via`](crate::orm::via), and the helpers below load
//! them for one materialized row.

use super::{Employee, Order, OrderDetail};
use crate::db::DataConnection;
use crate::orm::{AssociationDescriptor, AssociationQuery, Result, load_reference};

/// The employee who took an order
pub static EMPLOYEE: AssociationDescriptor =
    AssociationDescriptor::to_one::<Order, Employee>("Employee")
        .keys(&["EmployeeID"], &["EmployeeID"]);

/// The lines of an order
pub static DETAILS: AssociationDescriptor =
    AssociationDescriptor::to_many::<Order, OrderDetail>("Details")
        .keys(&["OrderID"], &["OrderID"]);

/// Query for the detail lines of `order`.
pub fn details_query<'c>(
    conn: &'c mut DataConnection,
    order: &Order,
) -> Result<AssociationQuery<'c, OrderDetail>> {
    AssociationQuery::new(conn, order, &DETAILS)
}

/// Load the employee of `order`, if it has one.
pub async fn employee(conn: &mut DataConnection, order: &Order) -> Result<Option<Employee>> {
    load_reference(conn, order, &EMPLOYEE).await
}
