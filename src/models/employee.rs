use chrono::NaiveDateTime;
use serde::Serialize;

use crate::orm::Entity;

#[derive(Entity, Debug, Clone, PartialEq, Serialize)]
#[entity(table = "Employees")]
#[serde(rename_all = "PascalCase")]
pub struct Employee {
    #[primary_key]
    #[column(name = "EmployeeID")]
    #[serde(rename = "EmployeeID")]
    pub employee_id: i64,

    pub last_name: String,
    pub first_name: String,
    pub title: String,
    pub birth_date: Option<NaiveDateTime>,
    pub hire_date: Option<NaiveDateTime>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}
