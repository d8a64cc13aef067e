//! Northwind entities and their associations

use once_cell::sync::OnceCell;

use crate::orm::{AssociationError, AssociationRegistry};

pub mod employee;
pub mod employee_territory;
pub mod extensions;
pub mod order;
pub mod order_detail;
pub mod territory;

pub use employee::Employee;
pub use employee_territory::EmployeeTerritory;
pub use order::Order;
pub use order_detail::OrderDetail;
pub use territory::Territory;

static REGISTRY: OnceCell<AssociationRegistry> = OnceCell::new();

/// Build and validate the registry of every navigation declared on the model.
pub fn build_registry() -> Result<AssociationRegistry, AssociationError> {
    AssociationRegistry::with(&[
        &order::ORDER_EMPLOYEE,
        &order::ORDER_DETAILS,
        &order::ORDER_DETAILS_WITH_BIG_DISCOUNT,
        &employee_territory::EMPLOYEE_TERRITORY_EMPLOYEE,
        &employee_territory::EMPLOYEE_TERRITORY_TERRITORY,
    ])
}

/// The process-wide registry, built on first use.
pub fn registry() -> Result<&'static AssociationRegistry, AssociationError> {
    REGISTRY.get_or_try_init(build_registry)
}
