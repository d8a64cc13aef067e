use serde::Serialize;

use crate::orm::Entity;

/// A sales territory. Descriptions are fixed-width and padded with blanks.
#[derive(Entity, Debug, Clone, PartialEq, Serialize)]
#[entity(table = "Territories")]
#[serde(rename_all = "PascalCase")]
pub struct Territory {
    #[primary_key]
    #[column(name = "TerritoryID")]
    #[serde(rename = "TerritoryID")]
    pub territory_id: String,

    pub territory_description: String,

    #[column(name = "RegionID")]
    #[serde(rename = "RegionID")]
    pub region_id: i64,
}
