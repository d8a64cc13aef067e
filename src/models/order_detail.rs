use serde::Serialize;

use crate::orm::Entity;

/// One line of an order.
#[derive(Entity, Debug, Clone, PartialEq, Serialize)]
#[entity(table = "Order Details")]
#[serde(rename_all = "PascalCase")]
pub struct OrderDetail {
    #[primary_key]
    #[column(name = "OrderID")]
    #[serde(rename = "OrderID")]
    pub order_id: i64,

    #[primary_key]
    #[column(name = "ProductID")]
    #[serde(rename = "ProductID")]
    pub product_id: i64,

    pub unit_price: f64,
    pub quantity: i64,
    /// Ratio between 0 and 1
    pub discount: f64,
}
