//! Association registry
//!
//! Maps `(source table, navigation name)` to its descriptor. Every descriptor
//! is validated on registration, so a registry that was built successfully
//! only holds associations the translator can join.

use std::collections::HashMap;

use tracing::debug;

use super::association::AssociationDescriptor;
use super::error::AssociationError;

/// Descriptors keyed by source table, then navigation name.
type Entries = HashMap<&'static str, HashMap<&'static str, &'static AssociationDescriptor>>;

#[derive(Debug, Default)]
pub struct AssociationRegistry {
    entries: Entries,
}

impl AssociationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of descriptors, stopping at the first invalid one.
    pub fn with(
        descriptors: &[&'static AssociationDescriptor],
    ) -> Result<Self, AssociationError> {
        let mut registry = Self::new();
        for descriptor in descriptors {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Validate and add one descriptor.
    pub fn register(
        &mut self,
        descriptor: &'static AssociationDescriptor,
    ) -> Result<(), AssociationError> {
        descriptor.validate()?;

        let by_name = self.entries.entry(descriptor.source.table).or_default();
        if by_name.contains_key(descriptor.name) {
            return Err(AssociationError::DuplicateAssociation {
                source_table: descriptor.source.table,
                name: descriptor.name,
            });
        }

        debug!(
            source = descriptor.source.table,
            target = descriptor.target.table,
            name = descriptor.name,
            cardinality = ?descriptor.cardinality,
            "Registered association"
        );
        by_name.insert(descriptor.name, descriptor);
        Ok(())
    }

    pub fn get(&self, table: &str, name: &str) -> Option<&'static AssociationDescriptor> {
        self.entries.get(table)?.get(name).copied()
    }

    /// All associations starting at `table`, sorted by name.
    pub fn associations_of(&self, table: &str) -> Vec<&'static AssociationDescriptor> {
        let mut found: Vec<_> = self
            .entries
            .get(table)
            .map(|by_name| by_name.values().copied().collect())
            .unwrap_or_default();
        found.sort_by_key(|d| d.name);
        found
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::{self, Order, OrderDetail};

    static DETAILS_WITHOUT_KEYS: AssociationDescriptor =
        AssociationDescriptor::to_many::<Order, OrderDetail>("Lines");

    #[test]
    fn test_northwind_registry_is_valid() {
        let registry = models::build_registry().expect("northwind associations are valid");
        assert_eq!(registry.len(), 5);

        let names: Vec<&str> = registry
            .associations_of("Orders")
            .iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["Details", "DetailsWithBigDiscount", "Employee"]);

        let employee = registry.get("EmployeeTerritories", "Employee").unwrap();
        assert!(!employee.can_be_null);
        assert!(registry.get("Orders", "Territory").is_none());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = AssociationRegistry::new();
        registry.register(&models::order::ORDER_EMPLOYEE).unwrap();
        assert_matches!(
            registry.register(&models::order::ORDER_EMPLOYEE),
            Err(AssociationError::DuplicateAssociation {
                source_table: "Orders",
                name: "Employee",
            })
        );
    }

    #[test]
    fn test_invalid_descriptor_fails_registration() {
        let result = AssociationRegistry::with(&[&models::order::ORDER_DETAILS, &DETAILS_WITHOUT_KEYS]);
        assert_matches!(result, Err(AssociationError::MissingJoinCondition { name: "Lines", .. }));
    }
}
