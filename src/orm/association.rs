//! Association descriptors
//!
//! An association binds a source entity to a target entity through either a
//! pair of key column lists compared pairwise, or a predicate function over
//! both rows, or both combined. Descriptors are plain `static` data so they
//! can be collected into a registry and validated once at startup.

use super::error::AssociationError;
use super::expr::{Base, Expr, Side};
use super::traits::{DatabaseSchema, EntityMeta};

/// Join predicate over (source, target) rows.
pub type JoinPredicate = fn(Side, Side) -> Expr;

/// How many target rows one source row can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one target row (a reference)
    One,
    /// Any number of target rows (a collection)
    Many,
}

/// Metadata describing one navigation from a source entity to a target entity.
#[derive(Debug, Clone, Copy)]
pub struct AssociationDescriptor {
    /// Navigation name, unique per source entity
    pub name: &'static str,
    pub source: EntityMeta,
    pub target: EntityMeta,
    /// Source columns compared with `other_key`, pairwise
    pub this_key: &'static [&'static str],
    /// Target columns compared with `this_key`, pairwise
    pub other_key: &'static [&'static str],
    /// Extra join condition, ANDed with the key comparison
    pub predicate: Option<JoinPredicate>,
    /// Whether a reference may resolve to no row
    pub can_be_null: bool,
    pub cardinality: Cardinality,
}

impl AssociationDescriptor {
    /// A reference navigation (`Order.Employee`).
    pub const fn to_one<S: DatabaseSchema, T: DatabaseSchema>(name: &'static str) -> Self {
        Self::new::<S, T>(name, Cardinality::One)
    }

    /// A collection navigation (`Order.Details`).
    pub const fn to_many<S: DatabaseSchema, T: DatabaseSchema>(name: &'static str) -> Self {
        Self::new::<S, T>(name, Cardinality::Many)
    }

    const fn new<S: DatabaseSchema, T: DatabaseSchema>(
        name: &'static str,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name,
            source: EntityMeta::of::<S>(),
            target: EntityMeta::of::<T>(),
            this_key: &[],
            other_key: &[],
            predicate: None,
            can_be_null: true,
            cardinality,
        }
    }

    pub const fn keys(
        self,
        this_key: &'static [&'static str],
        other_key: &'static [&'static str],
    ) -> Self {
        Self {
            this_key,
            other_key,
            ..self
        }
    }

    pub const fn predicate(self, predicate: JoinPredicate) -> Self {
        Self {
            predicate: Some(predicate),
            ..self
        }
    }

    pub const fn can_be_null(self, can_be_null: bool) -> Self {
        Self {
            can_be_null,
            ..self
        }
    }

    pub fn is_collection(&self) -> bool {
        self.cardinality == Cardinality::Many
    }

    /// Check that the descriptor can be turned into a join condition.
    pub fn validate(&self) -> Result<(), AssociationError> {
        let source_table = self.source.table;
        let name = self.name;

        if self.this_key.is_empty() && self.other_key.is_empty() && self.predicate.is_none() {
            return Err(AssociationError::MissingJoinCondition { source_table, name });
        }

        if self.this_key.len() != self.other_key.len() {
            return Err(AssociationError::KeyArityMismatch {
                source_table,
                name,
                this_keys: self.this_key.len(),
                other_keys: self.other_key.len(),
            });
        }

        for (meta, keys) in [(&self.source, self.this_key), (&self.target, self.other_key)] {
            if let Some(column) = keys.iter().find(|k| !meta.has_column(k)) {
                return Err(AssociationError::UnknownKeyColumn {
                    source_table,
                    name,
                    table: meta.table,
                    column: *column,
                });
            }
        }

        if let Some(predicate) = self.predicate {
            self.validate_predicate(predicate(Side::SOURCE, Side::TARGET))?;
        }

        Ok(())
    }

    fn validate_predicate(&self, expr: Expr) -> Result<(), AssociationError> {
        let source_table = self.source.table;
        let name = self.name;

        if expr.has_reduction() {
            return Err(AssociationError::InvalidPredicate {
                source_table,
                name,
                reason: "reductions are not allowed in join predicates",
            });
        }

        let mut result = Ok(());
        expr.for_each_column(&mut |column| {
            if result.is_err() {
                return;
            }
            let meta = match column.base {
                Base::Source => &self.source,
                Base::Target => &self.target,
                Base::Current | Base::Outer => {
                    result = Err(AssociationError::InvalidPredicate {
                        source_table,
                        name,
                        reason: "columns must come from the source or target side",
                    });
                    return;
                }
            };
            if !column.hops.is_empty() {
                result = Err(AssociationError::InvalidPredicate {
                    source_table,
                    name,
                    reason: "navigation is not allowed in join predicates",
                });
            } else if !meta.has_column(column.column) {
                result = Err(AssociationError::UnknownKeyColumn {
                    source_table,
                    name,
                    table: meta.table,
                    column: column.column,
                });
            }
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::models::{Employee, Order, OrderDetail};
    use crate::orm::expr::{AssociationRef, ColumnRef, col, nav};

    fn discount_only(_order: Side, detail: Side) -> Expr {
        detail.col("Discount").gt(0.06)
    }

    fn unknown_column(order: Side, detail: Side) -> Expr {
        order.col("OrderID").eq(detail.col("Rebate"))
    }

    fn current_row(_order: Side, _detail: Side) -> Expr {
        col("OrderID").eq(1)
    }

    fn with_reduction(order: Side, _detail: Side) -> Expr {
        order.col("OrderID").eq(1).and(nav("Details").any())
    }

    fn through_navigation(_order: Side, detail: Side) -> Expr {
        Expr::Column(ColumnRef {
            base: Base::Source,
            hops: vec![AssociationRef::Named("Employee")],
            column: "Address",
        })
        .eq(detail.col("OrderID"))
    }

    #[test]
    fn test_key_association_is_valid() {
        let descriptor = AssociationDescriptor::to_one::<Order, Employee>("Employee")
            .keys(&["EmployeeID"], &["EmployeeID"]);
        assert_eq!(descriptor.validate(), Ok(()));
        assert!(!descriptor.is_collection());
        assert!(descriptor.can_be_null);
    }

    #[test]
    fn test_missing_join_condition_is_rejected() {
        let descriptor = AssociationDescriptor::to_many::<Order, OrderDetail>("Details");
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::MissingJoinCondition { name: "Details", .. })
        );
    }

    #[test]
    fn test_key_arity_mismatch_is_rejected() {
        let descriptor = AssociationDescriptor::to_many::<Order, OrderDetail>("Details")
            .keys(&["OrderID"], &[]);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::KeyArityMismatch {
                this_keys: 1,
                other_keys: 0,
                ..
            })
        );
    }

    #[test]
    fn test_unknown_key_column_is_rejected() {
        let descriptor = AssociationDescriptor::to_one::<Order, Employee>("Employee")
            .keys(&["EmployeeID"], &["Id"]);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::UnknownKeyColumn {
                table: "Employees",
                column: "Id",
                ..
            })
        );
    }

    #[test]
    fn test_predicate_alone_is_a_join_condition() {
        let descriptor =
            AssociationDescriptor::to_many::<Order, OrderDetail>("Big").predicate(discount_only);
        assert_eq!(descriptor.validate(), Ok(()));
    }

    #[test]
    fn test_predicate_columns_are_checked() {
        let descriptor =
            AssociationDescriptor::to_many::<Order, OrderDetail>("Bad").predicate(unknown_column);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::UnknownKeyColumn {
                column: "Rebate",
                ..
            })
        );

        let descriptor =
            AssociationDescriptor::to_many::<Order, OrderDetail>("Bad").predicate(current_row);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::InvalidPredicate { .. })
        );
    }

    #[test]
    fn test_predicate_shape_is_checked() {
        let descriptor =
            AssociationDescriptor::to_many::<Order, OrderDetail>("Bad").predicate(with_reduction);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::InvalidPredicate {
                reason: "reductions are not allowed in join predicates",
                ..
            })
        );

        let descriptor = AssociationDescriptor::to_many::<Order, OrderDetail>("Bad")
            .predicate(through_navigation);
        assert_matches!(
            descriptor.validate(),
            Err(AssociationError::InvalidPredicate {
                reason: "navigation is not allowed in join predicates",
                ..
            })
        );
    }
}
