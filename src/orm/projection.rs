//! Rows of projection queries

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use super::traits::SqlValue;

/// Named values in select-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    fields: Vec<(String, SqlValue)>,
}

impl ProjectionRow {
    pub fn new(fields: Vec<(String, SqlValue)>) -> Self {
        Self { fields }
    }

    /// Decode every column by the storage class of its value.
    pub fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let mut fields = Vec::with_capacity(row.columns().len());
        for column in row.columns() {
            let index = column.ordinal();
            fields.push((column.name().to_string(), decode_value(row, index)?));
        }
        Ok(Self { fields })
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> &[(String, SqlValue)] {
        &self.fields
    }
}

fn decode_value(row: &SqliteRow, index: usize) -> Result<SqlValue, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(SqlValue::Null);
    }

    let type_name = raw.type_info().name().to_string();
    let value = match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => SqlValue::Int(row.try_get_unchecked(index)?),
        "REAL" | "NUMERIC" => SqlValue::Float(row.try_get_unchecked(index)?),
        "BLOB" => {
            let bytes: Vec<u8> = row.try_get_unchecked(index)?;
            SqlValue::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => SqlValue::String(row.try_get_unchecked(index)?),
    };
    Ok(value)
}

impl fmt::Display for ProjectionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} = {}", name, value)?;
        }
        f.write_str(" }")
    }
}

impl Serialize for ProjectionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row() -> ProjectionRow {
        ProjectionRow::new(vec![
            ("EmployeeID".to_string(), SqlValue::Int(5)),
            ("MaxDiscount".to_string(), SqlValue::Float(0.25)),
            ("Address".to_string(), SqlValue::Null),
        ])
    }

    #[test]
    fn test_display_lists_fields_in_order() {
        assert_eq!(
            row().to_string(),
            "{ EmployeeID = 5, MaxDiscount = 0.25, Address = null }"
        );
    }

    #[test]
    fn test_serializes_as_object() {
        assert_eq!(
            serde_json::to_string(&row()).unwrap(),
            r#"{"EmployeeID":5,"MaxDiscount":0.25,"Address":null}"#
        );
    }

    #[test]
    fn test_get_by_name() {
        let row = row();
        assert_eq!(row.get("EmployeeID"), Some(&SqlValue::Int(5)));
        assert_eq!(row.get("Missing"), None);
    }
}
