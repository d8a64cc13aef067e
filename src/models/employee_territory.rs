use serde::Serialize;

use super::{Employee, Territory};
use crate::orm::{AssociationDescriptor, Entity};

/// Link row assigning an employee to a territory.
#[derive(Entity, Debug, Clone, PartialEq, Serialize)]
#[entity(table = "EmployeeTerritories")]
pub struct EmployeeTerritory {
    #[primary_key]
    #[column(name = "EmployeeID")]
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,

    #[primary_key]
    #[column(name = "TerritoryID")]
    #[serde(rename = "TerritoryID")]
    pub territory_id: String,
}

/// `EmployeeTerritory.Employee`, always present
pub static EMPLOYEE_TERRITORY_EMPLOYEE: AssociationDescriptor =
    AssociationDescriptor::to_one::<EmployeeTerritory, Employee>("Employee")
        .keys(&["EmployeeID"], &["EmployeeID"])
        .can_be_null(false);

/// `EmployeeTerritory.Territory`, always present
pub static EMPLOYEE_TERRITORY_TERRITORY: AssociationDescriptor =
    AssociationDescriptor::to_one::<EmployeeTerritory, Territory>("Territory")
        .keys(&["TerritoryID"], &["TerritoryID"])
        .can_be_null(false);
