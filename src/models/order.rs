use chrono::NaiveDateTime;
use serde::Serialize;

use super::{Employee, OrderDetail};
use crate::orm::{AssociationDescriptor, Entity, Expr, Side};

#[derive(Entity, Debug, Clone, PartialEq, Serialize)]
#[entity(table = "Orders")]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    #[primary_key]
    #[column(name = "OrderID")]
    #[serde(rename = "OrderID")]
    pub order_id: i64,

    #[column(name = "CustomerID")]
    #[serde(rename = "CustomerID")]
    pub customer_id: Option<String>,

    #[column(name = "EmployeeID")]
    #[serde(rename = "EmployeeID")]
    pub employee_id: Option<i64>,

    pub order_date: Option<NaiveDateTime>,
    pub ship_city: Option<String>,
}

/// Discount above which a detail line counts as a big discount.
pub const BIG_DISCOUNT: f64 = 0.06;

/// `Order.Employee`. Orders may be unassigned.
pub static ORDER_EMPLOYEE: AssociationDescriptor =
    AssociationDescriptor::to_one::<Order, Employee>("Employee")
        .keys(&["EmployeeID"], &["EmployeeID"]);

/// `Order.Details`, every line of the order
pub static ORDER_DETAILS: AssociationDescriptor =
    AssociationDescriptor::to_many::<Order, OrderDetail>("Details")
        .keys(&["OrderID"], &["OrderID"]);

/// `Order.DetailsWithBigDiscount`, the lines discounted above [`BIG_DISCOUNT`]
pub static ORDER_DETAILS_WITH_BIG_DISCOUNT: AssociationDescriptor =
    AssociationDescriptor::to_many::<Order, OrderDetail>("DetailsWithBigDiscount")
        .predicate(big_discount);

fn big_discount(order: Side, detail: Side) -> Expr {
    order
        .col("OrderID")
        .eq(detail.col("OrderID"))
        .and(detail.col("Discount").gt(BIG_DISCOUNT))
}
