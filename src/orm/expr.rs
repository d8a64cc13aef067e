//! Query expressions over entities and their associations
//!
//! Expressions are plain data. Navigation through associations is written
//! with [`nav`] (a registered association by name) or [`via`] (a descriptor
//! used directly), and collection navigations are reduced with `any`,
//! `count`, `max` and friends:
//!
//! ```rust,ignore
//! // order.Employee.Address.StartsWith("B")
//! nav("Employee").col("Address").starts_with("B")
//!
//! // order.Details.Any(d => d.Discount > 0.06)
//! nav("Details").any_where(col("Discount").gt(0.06))
//!
//! // order.Details.Max(d => d.Discount)
//! nav("Details").max(col("Discount"))
//! ```

use super::association::AssociationDescriptor;
use super::traits::SqlValue;

/// Which row a column reference starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base {
    /// The row of the innermost query (the collection element inside a reduction)
    Current,
    /// The row owning the innermost reduction
    Outer,
    /// Source row of an association predicate
    Source,
    /// Target row of an association predicate
    Target,
}

/// One association hop.
#[derive(Debug, Clone, Copy)]
pub enum AssociationRef {
    /// Looked up in the registry by (entity, name)
    Named(&'static str),
    /// Applied directly, without registration
    Descriptor(&'static AssociationDescriptor),
}

impl AssociationRef {
    pub fn name(&self) -> &'static str {
        match self {
            AssociationRef::Named(name) => name,
            AssociationRef::Descriptor(descriptor) => descriptor.name,
        }
    }
}

/// A column reached from a base row through singular associations.
#[derive(Debug, Clone)]
pub struct ColumnRef {
    pub base: Base,
    pub hops: Vec<AssociationRef>,
    pub column: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    And,
    Or,
}

impl BinaryOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Count,
    Max,
    Min,
    Sum,
    Avg,
}

impl AggregateFn {
    pub fn to_sql(&self) -> &'static str {
        match self {
            AggregateFn::Count => "COUNT",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
        }
    }
}

/// A query expression.
#[derive(Debug, Clone)]
pub enum Expr {
    Column(ColumnRef),
    Value(SqlValue),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    IsNull(Box<Expr>),
    /// Case-sensitive prefix match
    StartsWith {
        expr: Box<Expr>,
        prefix: String,
    },
    Trim(Box<Expr>),
    /// At least one element of a collection navigation (optionally filtered)
    Exists {
        nav: Navigation,
        filter: Option<Box<Expr>>,
    },
    /// Aggregate over a collection navigation; `selector` is None for COUNT(*)
    Aggregate {
        func: AggregateFn,
        nav: Navigation,
        selector: Option<Box<Expr>>,
        filter: Option<Box<Expr>>,
    },
}

/// A column of the current row.
pub fn col(column: &'static str) -> Expr {
    Expr::Column(ColumnRef {
        base: Base::Current,
        hops: Vec::new(),
        column,
    })
}

/// A literal value, bound as a parameter.
pub fn val(value: impl Into<SqlValue>) -> Expr {
    Expr::Value(value.into())
}

/// Navigate a registered association of the current row.
pub fn nav(name: &'static str) -> Navigation {
    Navigation::from_current().nav(name)
}

/// Navigate an association descriptor from the current row.
pub fn via(descriptor: &'static AssociationDescriptor) -> Navigation {
    Navigation::from_current().via(descriptor)
}

/// Start from the row owning the enclosing reduction.
pub fn outer() -> Navigation {
    Navigation {
        base: Base::Outer,
        hops: Vec::new(),
    }
}

/// A chain of association hops from a base row.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub base: Base,
    pub hops: Vec<AssociationRef>,
}

impl Navigation {
    fn from_current() -> Self {
        Self {
            base: Base::Current,
            hops: Vec::new(),
        }
    }

    pub fn nav(mut self, name: &'static str) -> Self {
        self.hops.push(AssociationRef::Named(name));
        self
    }

    pub fn via(mut self, descriptor: &'static AssociationDescriptor) -> Self {
        self.hops.push(AssociationRef::Descriptor(descriptor));
        self
    }

    /// A column at the end of this navigation
    pub fn col(self, column: &'static str) -> Expr {
        Expr::Column(ColumnRef {
            base: self.base,
            hops: self.hops,
            column,
        })
    }

    pub fn any(self) -> Expr {
        Expr::Exists {
            nav: self,
            filter: None,
        }
    }

    pub fn any_where(self, filter: Expr) -> Expr {
        Expr::Exists {
            nav: self,
            filter: Some(Box::new(filter)),
        }
    }

    pub fn count(self) -> Expr {
        self.aggregate(AggregateFn::Count, None, None)
    }

    pub fn count_where(self, filter: Expr) -> Expr {
        self.aggregate(AggregateFn::Count, None, Some(filter))
    }

    pub fn max(self, selector: Expr) -> Expr {
        self.aggregate(AggregateFn::Max, Some(selector), None)
    }

    pub fn min(self, selector: Expr) -> Expr {
        self.aggregate(AggregateFn::Min, Some(selector), None)
    }

    pub fn sum(self, selector: Expr) -> Expr {
        self.aggregate(AggregateFn::Sum, Some(selector), None)
    }

    pub fn avg(self, selector: Expr) -> Expr {
        self.aggregate(AggregateFn::Avg, Some(selector), None)
    }

    fn aggregate(self, func: AggregateFn, selector: Option<Expr>, filter: Option<Expr>) -> Expr {
        Expr::Aggregate {
            func,
            nav: self,
            selector: selector.map(Box::new),
            filter: filter.map(Box::new),
        }
    }
}

impl Expr {
    fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right.into()),
        }
    }

    pub fn eq(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn ne(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Ne, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn ge(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Ge, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn le(self, right: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Le, right)
    }

    pub fn and(self, right: Expr) -> Expr {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: Expr) -> Expr {
        self.binary(BinaryOp::Or, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }

    pub fn is_null(self) -> Expr {
        Expr::IsNull(Box::new(self))
    }

    pub fn is_not_null(self) -> Expr {
        self.is_null().not()
    }

    pub fn starts_with(self, prefix: impl Into<String>) -> Expr {
        Expr::StartsWith {
            expr: Box::new(self),
            prefix: prefix.into(),
        }
    }

    pub fn trim(self) -> Expr {
        Expr::Trim(Box::new(self))
    }

    /// Visit every column reference, including those inside reductions.
    pub fn for_each_column(&self, visit: &mut dyn FnMut(&ColumnRef)) {
        match self {
            Expr::Column(column) => visit(column),
            Expr::Value(_) => {}
            Expr::Binary { left, right, .. } => {
                left.for_each_column(visit);
                right.for_each_column(visit);
            }
            Expr::Not(inner) | Expr::IsNull(inner) | Expr::Trim(inner) => {
                inner.for_each_column(visit)
            }
            Expr::StartsWith { expr, .. } => expr.for_each_column(visit),
            Expr::Exists { filter, .. } => {
                if let Some(filter) = filter {
                    filter.for_each_column(visit);
                }
            }
            Expr::Aggregate {
                selector, filter, ..
            } => {
                if let Some(selector) = selector {
                    selector.for_each_column(visit);
                }
                if let Some(filter) = filter {
                    filter.for_each_column(visit);
                }
            }
        }
    }

    /// Whether the expression contains a reduction over a collection.
    pub fn has_reduction(&self) -> bool {
        match self {
            Expr::Exists { .. } | Expr::Aggregate { .. } => true,
            Expr::Column(_) | Expr::Value(_) => false,
            Expr::Binary { left, right, .. } => left.has_reduction() || right.has_reduction(),
            Expr::Not(inner) | Expr::IsNull(inner) | Expr::Trim(inner) => inner.has_reduction(),
            Expr::StartsWith { expr, .. } => expr.has_reduction(),
        }
    }
}

impl From<SqlValue> for Expr {
    fn from(value: SqlValue) -> Self {
        Expr::Value(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        val(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        val(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        val(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        val(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        val(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        val(value)
    }
}

/// One side of an association predicate.
///
/// Predicates are plain functions `fn(Side, Side) -> Expr` receiving the
/// source and target rows:
///
/// ```rust,ignore
/// fn big_discount(order: Side, detail: Side) -> Expr {
///     order.col("OrderID").eq(detail.col("OrderID"))
///         .and(detail.col("Discount").gt(0.06))
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Side(Base);

impl Side {
    pub const SOURCE: Side = Side(Base::Source);
    pub const TARGET: Side = Side(Base::Target);

    pub fn col(self, column: &'static str) -> Expr {
        Expr::Column(ColumnRef {
            base: self.0,
            hops: Vec::new(),
            column,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_builds_column_path() {
        let Expr::Column(column) = nav("Employee").col("Address") else {
            panic!("expected a column reference");
        };
        assert_eq!(column.base, Base::Current);
        assert_eq!(column.column, "Address");
        let hops: Vec<&str> = column.hops.iter().map(|h| h.name()).collect();
        assert_eq!(hops, vec!["Employee"]);
    }

    #[test]
    fn test_for_each_column_reaches_into_reductions() {
        let expr = col("EmployeeID")
            .is_not_null()
            .and(nav("Details").any_where(col("Discount").gt(0.06)));

        let mut seen = Vec::new();
        expr.for_each_column(&mut |c| seen.push(c.column));
        assert_eq!(seen, vec!["EmployeeID", "Discount"]);
        assert!(expr.has_reduction());
        assert!(!col("OrderID").eq(1).has_reduction());
    }

    #[test]
    fn test_side_columns_are_bound_to_their_row() {
        let Expr::Binary { left, right, .. } = Side::SOURCE.col("OrderID").eq(Side::TARGET.col("OrderID"))
        else {
            panic!("expected a binary expression");
        };
        assert!(matches!(*left, Expr::Column(ColumnRef { base: Base::Source, .. })));
        assert!(matches!(*right, Expr::Column(ColumnRef { base: Base::Target, .. })));
    }
}
