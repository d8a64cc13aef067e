//! Query translation
//!
//! Rewrites association navigation into plain SQL:
//!
//! - a singular navigation path becomes one join per distinct path, reused
//!   every time the path is referenced. Nullable associations use LEFT JOIN,
//!   required ones INNER JOIN; everything behind a LEFT JOIN stays LEFT.
//! - a collection navigation is never joined into its owner. Each reduction
//!   (`any`, `count`, `max`, ...) becomes a correlated subquery scoped to the
//!   owning row, so filtering the many side cannot duplicate or drop owners.
//!
//! Literal values are bound as numbered parameters (`?1`, `?2`, ...) because
//! join conditions are rendered into the FROM clause after the expressions
//! that required them.

use tracing::trace;

use super::association::AssociationDescriptor;
use super::error::TranslateError;
use super::expr::{AssociationRef, Base, ColumnRef, Expr, Navigation, Side};
use super::registry::AssociationRegistry;
use super::traits::{EntityMeta, SortDirection, SqlValue, quote_ident};

/// Generated SQL and the values for its numbered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// What a query returns.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Every column of the root entity
    Entity,
    /// Named expressions
    Fields(Vec<(String, Expr)>),
}

/// A query over one root entity.
#[derive(Debug, Clone)]
pub struct QueryModel {
    pub root: EntityMeta,
    pub selection: Selection,
    pub filter: Option<Expr>,
    pub order_by: Vec<(Expr, SortDirection)>,
    pub limit: Option<i64>,
}

impl QueryModel {
    pub fn new(root: EntityMeta) -> Self {
        Self {
            root,
            selection: Selection::Entity,
            filter: None,
            order_by: Vec::new(),
            limit: None,
        }
    }

    /// AND a condition onto the filter
    pub fn add_filter(&mut self, condition: Expr) {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug)]
struct Join {
    /// Identity of the navigation path that produced this join
    key: String,
    alias: String,
    kind: JoinKind,
    table: &'static str,
    on: String,
}

/// One FROM level: the root query or a correlated subquery.
#[derive(Debug)]
struct Scope {
    alias: String,
    meta: EntityMeta,
    joins: Vec<Join>,
}

impl Scope {
    fn new(alias: String, meta: EntityMeta) -> Self {
        Self {
            alias,
            meta,
            joins: Vec::new(),
        }
    }

    fn render_joins(&self) -> String {
        let mut sql = String::new();
        for join in &self.joins {
            let kind = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            sql.push_str(&format!(
                " {} {} AS {} ON {}",
                kind,
                quote_ident(join.table),
                join.alias,
                join.on
            ));
        }
        sql
    }
}

/// Aliases bound to the two sides while a join predicate is rendered.
struct PredicateSides {
    source: (String, EntityMeta),
    target: (String, EntityMeta),
}

/// Translates one query. Consumed by `translate`.
pub struct Translator<'r> {
    registry: &'r AssociationRegistry,
    params: Vec<SqlValue>,
    next_alias: usize,
    scopes: Vec<Scope>,
    sides: Option<PredicateSides>,
}

impl<'r> Translator<'r> {
    pub fn new(registry: &'r AssociationRegistry) -> Self {
        Self {
            registry,
            params: Vec::new(),
            next_alias: 0,
            scopes: Vec::new(),
            sides: None,
        }
    }

    /// Translate a query model into a single SELECT statement.
    pub fn translate(mut self, model: &QueryModel) -> Result<SqlStatement, TranslateError> {
        let alias = self.new_alias();
        self.scopes.push(Scope::new(alias.clone(), model.root));

        let columns = match &model.selection {
            Selection::Entity => model
                .root
                .columns
                .iter()
                .map(|c| format!("{0}.{1} AS {1}", alias, quote_ident(c.name)))
                .collect::<Vec<_>>()
                .join(", "),
            Selection::Fields(fields) => {
                let mut parts = Vec::with_capacity(fields.len());
                for (name, expr) in fields {
                    parts.push(format!("{} AS {}", self.expr(expr)?, quote_ident(name)));
                }
                parts.join(", ")
            }
        };

        let where_sql = model.filter.as_ref().map(|f| self.expr(f)).transpose()?;

        let mut order = Vec::with_capacity(model.order_by.len());
        for (expr, direction) in &model.order_by {
            order.push(format!("{} {}", self.expr(expr)?, direction.to_sql()));
        }

        let scope = self.pop_scope()?;

        let mut sql = format!(
            "SELECT {} FROM {} AS {}",
            columns,
            quote_ident(model.root.table),
            scope.alias
        );
        sql.push_str(&scope.render_joins());

        if let Some(where_sql) = where_sql {
            sql.push_str(" WHERE ");
            sql.push_str(&where_sql);
        }

        if !order.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order.join(", "));
        }

        // SQLite reads a negative LIMIT as unbounded
        if let Some(limit) = model.limit {
            sql.push_str(&format!(" LIMIT {}", limit.max(0)));
        }

        trace!(sql = %sql, params = self.params.len(), "Translated query");

        Ok(SqlStatement {
            sql,
            params: self.params,
        })
    }

    /// Select the target rows of `descriptor` for the source row identified
    /// by `key_values` (its primary key, in declaration order).
    pub fn translate_association_load(
        mut self,
        descriptor: &'static AssociationDescriptor,
        key_values: &[SqlValue],
    ) -> Result<SqlStatement, TranslateError> {
        descriptor.validate()?;

        let source = descriptor.source;
        if key_values.len() != source.primary_key.len() {
            return Err(TranslateError::KeyValueCount {
                table: source.table,
                expected: source.primary_key.len(),
                actual: key_values.len(),
            });
        }

        let target_alias = self.new_alias();
        let source_alias = self.new_alias();
        let mut conditions = vec![self.join_condition(descriptor, &source_alias, &target_alias)?];
        for (column, value) in source.primary_key.iter().zip(key_values) {
            let param = self.bind(value.clone());
            conditions.push(format!("{}.{} = {}", source_alias, quote_ident(column), param));
        }

        let columns: Vec<String> = descriptor
            .target
            .columns
            .iter()
            .map(|c| format!("{0}.{1} AS {1}", target_alias, quote_ident(c.name)))
            .collect();

        let sql = format!(
            "SELECT {} FROM {} AS {} WHERE EXISTS (SELECT 1 FROM {} AS {} WHERE {})",
            columns.join(", "),
            quote_ident(descriptor.target.table),
            target_alias,
            quote_ident(source.table),
            source_alias,
            conditions.join(" AND ")
        );

        Ok(SqlStatement {
            sql,
            params: self.params,
        })
    }

    fn new_alias(&mut self) -> String {
        let alias = format!("t{}", self.next_alias);
        self.next_alias += 1;
        alias
    }

    fn bind(&mut self, value: SqlValue) -> String {
        self.params.push(value);
        format!("?{}", self.params.len())
    }

    fn pop_scope(&mut self) -> Result<Scope, TranslateError> {
        self.scopes.pop().ok_or(TranslateError::NoOuterScope)
    }

    fn expr(&mut self, expr: &Expr) -> Result<String, TranslateError> {
        match expr {
            Expr::Column(column) => self.column(column),
            Expr::Value(SqlValue::Null) => Ok("NULL".to_string()),
            Expr::Value(value) => Ok(self.bind(value.clone())),
            Expr::Binary { op, left, right } => {
                use super::expr::BinaryOp;

                let left_sql = self.expr(left)?;
                if matches!(**right, Expr::Value(SqlValue::Null)) {
                    match op {
                        BinaryOp::Eq => return Ok(format!("{} IS NULL", left_sql)),
                        BinaryOp::Ne => return Ok(format!("{} IS NOT NULL", left_sql)),
                        _ => {}
                    }
                }
                let right_sql = self.expr(right)?;
                Ok(format!("({} {} {})", left_sql, op.to_sql(), right_sql))
            }
            Expr::Not(inner) => Ok(format!("NOT ({})", self.expr(inner)?)),
            Expr::IsNull(inner) => Ok(format!("{} IS NULL", self.expr(inner)?)),
            Expr::StartsWith { expr, prefix } => {
                let target = self.expr(expr)?;
                let length = prefix.chars().count();
                let param = self.bind(SqlValue::String(prefix.clone()));
                Ok(format!("substr({}, 1, {}) = {}", target, length, param))
            }
            Expr::Trim(inner) => Ok(format!("trim({})", self.expr(inner)?)),
            Expr::Exists { nav, filter } => {
                let subquery = self.subquery(nav, filter.as_deref(), |_| Ok("1".to_string()))?;
                Ok(format!("EXISTS ({})", subquery))
            }
            Expr::Aggregate {
                func,
                nav,
                selector,
                filter,
            } => {
                let subquery = self.subquery(nav, filter.as_deref(), |t| match selector {
                    Some(selector) => Ok(format!("{}({})", func.to_sql(), t.expr(selector)?)),
                    None => Ok(format!("{}(*)", func.to_sql())),
                })?;
                Ok(format!("({})", subquery))
            }
        }
    }

    fn column(&mut self, column: &ColumnRef) -> Result<String, TranslateError> {
        match column.base {
            Base::Source | Base::Target => {
                let sides = self.sides.as_ref().ok_or(TranslateError::UnboundSide)?;
                if !column.hops.is_empty() {
                    return Err(TranslateError::UnsupportedPredicate);
                }
                let (alias, meta) = if column.base == Base::Source {
                    &sides.source
                } else {
                    &sides.target
                };
                if !meta.has_column(column.column) {
                    return Err(TranslateError::UnknownColumn {
                        table: meta.table,
                        column: column.column,
                    });
                }
                Ok(format!("{}.{}", alias, quote_ident(column.column)))
            }
            Base::Current | Base::Outer => {
                let scope = self.base_scope(column.base)?;
                let (alias, meta) = self.walk(scope, &column.hops)?;
                if !meta.has_column(column.column) {
                    return Err(TranslateError::UnknownColumn {
                        table: meta.table,
                        column: column.column,
                    });
                }
                Ok(format!("{}.{}", alias, quote_ident(column.column)))
            }
        }
    }

    /// Index of the scope a base row lives in.
    fn base_scope(&self, base: Base) -> Result<usize, TranslateError> {
        match base {
            Base::Current => self
                .scopes
                .len()
                .checked_sub(1)
                .ok_or(TranslateError::NoOuterScope),
            Base::Outer => self
                .scopes
                .len()
                .checked_sub(2)
                .ok_or(TranslateError::NoOuterScope),
            Base::Source | Base::Target => Err(TranslateError::UnboundSide),
        }
    }

    fn resolve(
        &self,
        meta: EntityMeta,
        hop: AssociationRef,
    ) -> Result<&'static AssociationDescriptor, TranslateError> {
        match hop {
            AssociationRef::Named(name) => {
                self.registry
                    .get(meta.table, name)
                    .ok_or(TranslateError::UnknownAssociation {
                        table: meta.table,
                        name,
                    })
            }
            AssociationRef::Descriptor(descriptor) => {
                if descriptor.source.table != meta.table {
                    return Err(TranslateError::AssociationSourceMismatch {
                        name: descriptor.name,
                        expected: descriptor.source.table,
                        actual: meta.table,
                    });
                }
                descriptor.validate()?;
                Ok(descriptor)
            }
        }
    }

    /// Follow singular hops from a scope's row, joining as needed.
    fn walk(
        &mut self,
        scope: usize,
        hops: &[AssociationRef],
    ) -> Result<(String, EntityMeta), TranslateError> {
        let mut alias = self.scopes[scope].alias.clone();
        let mut meta = self.scopes[scope].meta;
        let mut key = String::new();
        let mut behind_left_join = false;

        for hop in hops {
            let descriptor = self.resolve(meta, *hop)?;
            if descriptor.is_collection() {
                return Err(TranslateError::CollectionInScalarContext {
                    table: meta.table,
                    name: descriptor.name,
                });
            }

            key.push_str(&format!("/{:p}", descriptor));
            let kind = if behind_left_join || descriptor.can_be_null {
                JoinKind::Left
            } else {
                JoinKind::Inner
            };
            behind_left_join = kind == JoinKind::Left;

            alias = self.ensure_join(scope, &key, descriptor, &alias, kind)?;
            meta = descriptor.target;
        }

        Ok((alias, meta))
    }

    fn ensure_join(
        &mut self,
        scope: usize,
        key: &str,
        descriptor: &'static AssociationDescriptor,
        parent_alias: &str,
        kind: JoinKind,
    ) -> Result<String, TranslateError> {
        if let Some(join) = self.scopes[scope].joins.iter().find(|j| j.key == key) {
            return Ok(join.alias.clone());
        }

        let alias = self.new_alias();
        let on = self.join_condition(descriptor, parent_alias, &alias)?;
        self.scopes[scope].joins.push(Join {
            key: key.to_string(),
            alias: alias.clone(),
            kind,
            table: descriptor.target.table,
            on,
        });
        Ok(alias)
    }

    /// Key equality plus predicate between two aliased rows.
    fn join_condition(
        &mut self,
        descriptor: &AssociationDescriptor,
        source_alias: &str,
        target_alias: &str,
    ) -> Result<String, TranslateError> {
        let mut parts: Vec<String> = descriptor
            .this_key
            .iter()
            .zip(descriptor.other_key)
            .map(|(this, other)| {
                format!(
                    "{}.{} = {}.{}",
                    source_alias,
                    quote_ident(this),
                    target_alias,
                    quote_ident(other)
                )
            })
            .collect();

        if let Some(predicate) = descriptor.predicate {
            let expr = predicate(Side::SOURCE, Side::TARGET);
            let previous = self.sides.replace(PredicateSides {
                source: (source_alias.to_string(), descriptor.source),
                target: (target_alias.to_string(), descriptor.target),
            });
            let rendered = self.expr(&expr);
            self.sides = previous;
            parts.push(rendered?);
        }

        Ok(parts.join(" AND "))
    }

    /// Correlated subquery over the collection at the end of `nav`.
    fn subquery(
        &mut self,
        nav: &Navigation,
        filter: Option<&Expr>,
        head: impl FnOnce(&mut Self) -> Result<String, TranslateError>,
    ) -> Result<String, TranslateError> {
        let (last, singular) = nav
            .hops
            .split_last()
            .ok_or(TranslateError::EmptyNavigation)?;

        let scope = self.base_scope(nav.base)?;
        let (parent_alias, parent_meta) = self.walk(scope, singular)?;
        let descriptor = self.resolve(parent_meta, *last)?;
        if !descriptor.is_collection() {
            return Err(TranslateError::SingularInReduction {
                table: parent_meta.table,
                name: descriptor.name,
            });
        }

        let alias = self.new_alias();
        let condition = self.join_condition(descriptor, &parent_alias, &alias)?;

        self.scopes.push(Scope::new(alias.clone(), descriptor.target));
        let head = head(&mut *self);
        let filter_sql = filter.map(|f| self.expr(f));
        let child = self.pop_scope()?;

        let head = head?;
        let filter_sql = filter_sql.transpose()?;

        let mut sql = format!(
            "SELECT {} FROM {} AS {}",
            head,
            quote_ident(descriptor.target.table),
            alias
        );
        sql.push_str(&child.render_joins());
        sql.push_str(" WHERE ");
        sql.push_str(&condition);
        if let Some(filter_sql) = filter_sql {
            sql.push_str(" AND ");
            sql.push_str(&filter_sql);
        }

        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{self, EmployeeTerritory, Order, extensions};
    use crate::orm::expr::{col, nav, outer, via};

    fn translate(model: &QueryModel) -> Result<SqlStatement, TranslateError> {
        let registry = models::build_registry().unwrap();
        Translator::new(&registry).translate(model)
    }

    fn orders() -> QueryModel {
        QueryModel::new(EntityMeta::of::<Order>())
    }

    fn fields(fields: Vec<(&str, Expr)>) -> Selection {
        Selection::Fields(
            fields
                .into_iter()
                .map(|(name, expr)| (name.to_string(), expr))
                .collect(),
        )
    }

    #[test]
    fn test_nullable_reference_becomes_left_join() {
        let mut model = orders();
        model.selection = fields(vec![
            ("OrderID", col("OrderID")),
            ("OrderDate", col("OrderDate")),
            ("Address", nav("Employee").col("Address")),
        ]);
        model.add_filter(nav("Employee").col("Address").starts_with("B"));
        model.limit = Some(10);

        let statement = translate(&model).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT t0.\"OrderID\" AS \"OrderID\", t0.\"OrderDate\" AS \"OrderDate\", \
             t1.\"Address\" AS \"Address\" FROM \"Orders\" AS t0 \
             LEFT JOIN \"Employees\" AS t1 ON t0.\"EmployeeID\" = t1.\"EmployeeID\" \
             WHERE substr(t1.\"Address\", 1, 1) = ?1 LIMIT 10"
        );
        assert_eq!(statement.params, vec![SqlValue::String("B".to_string())]);
    }

    #[test]
    fn test_negative_take_selects_nothing() {
        let mut model = orders();
        model.limit = Some(-3);

        let statement = translate(&model).unwrap();
        assert!(statement.sql.ends_with(" LIMIT 0"));
    }

    #[test]
    fn test_required_references_become_inner_joins() {
        let mut model = QueryModel::new(EntityMeta::of::<EmployeeTerritory>());
        model.selection = fields(vec![
            ("EmployeeID", nav("Employee").col("EmployeeID")),
            ("Territory", nav("Territory").col("TerritoryDescription").trim()),
        ]);
        model.add_filter(nav("Territory").col("TerritoryDescription").starts_with("B"));

        let statement = translate(&model).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT t1.\"EmployeeID\" AS \"EmployeeID\", trim(t2.\"TerritoryDescription\") AS \"Territory\" \
             FROM \"EmployeeTerritories\" AS t0 \
             INNER JOIN \"Employees\" AS t1 ON t0.\"EmployeeID\" = t1.\"EmployeeID\" \
             INNER JOIN \"Territories\" AS t2 ON t0.\"TerritoryID\" = t2.\"TerritoryID\" \
             WHERE substr(t2.\"TerritoryDescription\", 1, 1) = ?1"
        );
    }

    #[test]
    fn test_collection_reductions_become_correlated_subqueries() {
        let mut model = orders();
        model.selection = fields(vec![
            ("EmployeeID", col("EmployeeID")),
            ("MaxDiscount", nav("Details").max(col("Discount"))),
        ]);
        model.add_filter(nav("Details").any_where(col("Discount").gt(0.06)));

        let statement = translate(&model).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT t0.\"EmployeeID\" AS \"EmployeeID\", \
             (SELECT MAX(t1.\"Discount\") FROM \"Order Details\" AS t1 WHERE t0.\"OrderID\" = t1.\"OrderID\") AS \"MaxDiscount\" \
             FROM \"Orders\" AS t0 \
             WHERE EXISTS (SELECT 1 FROM \"Order Details\" AS t2 WHERE t0.\"OrderID\" = t2.\"OrderID\" AND (t2.\"Discount\" > ?1))"
        );
        assert_eq!(statement.params, vec![SqlValue::Float(0.06)]);
    }

    #[test]
    fn test_predicate_association_renders_its_predicate() {
        let mut model = orders();
        model.selection = fields(vec![("Big", nav("DetailsWithBigDiscount").count())]);
        model.add_filter(nav("DetailsWithBigDiscount").any());

        let statement = translate(&model).unwrap();
        assert_eq!(
            statement.sql,
            "SELECT (SELECT COUNT(*) FROM \"Order Details\" AS t1 \
             WHERE ((t0.\"OrderID\" = t1.\"OrderID\") AND (t1.\"Discount\" > ?1))) AS \"Big\" \
             FROM \"Orders\" AS t0 \
             WHERE EXISTS (SELECT 1 FROM \"Order Details\" AS t2 \
             WHERE ((t0.\"OrderID\" = t2.\"OrderID\") AND (t2.\"Discount\" > ?2)))"
        );
        assert_eq!(
            statement.params,
            vec![SqlValue::Float(0.06), SqlValue::Float(0.06)]
        );
    }

    #[test]
    fn test_repeated_path_reuses_one_join() {
        let mut model = orders();
        model.selection = fields(vec![
            ("Address", nav("Employee").col("Address")),
            ("City", nav("Employee").col("City")),
        ]);
        model.add_filter(nav("Employee").col("LastName").ne("Fuller"));

        let statement = translate(&model).unwrap();
        assert_eq!(statement.sql.matches("JOIN").count(), 1);
        assert!(statement.sql.contains("t1.\"City\" AS \"City\""));
    }

    #[test]
    fn test_outer_reference_inside_reduction() {
        let mut model = orders();
        model.add_filter(
            nav("Details").any_where(outer().col("EmployeeID").is_not_null()),
        );

        let statement = translate(&model).unwrap();
        assert!(statement.sql.ends_with(
            "WHERE EXISTS (SELECT 1 FROM \"Order Details\" AS t1 \
             WHERE t0.\"OrderID\" = t1.\"OrderID\" AND NOT (t0.\"EmployeeID\" IS NULL))"
        ));
    }

    #[test]
    fn test_null_comparison_uses_is_null() {
        let mut model = orders();
        model.add_filter(col("EmployeeID").eq(SqlValue::Null));

        let statement = translate(&model).unwrap();
        assert!(statement.sql.ends_with("WHERE t0.\"EmployeeID\" IS NULL"));
        assert!(statement.params.is_empty());
    }

    #[test]
    fn test_unregistered_descriptor_can_be_navigated() {
        let mut model = orders();
        model.selection = fields(vec![("Address", via(&extensions::EMPLOYEE).col("Address"))]);

        let statement = translate(&model).unwrap();
        assert!(statement.sql.contains(
            "LEFT JOIN \"Employees\" AS t1 ON t0.\"EmployeeID\" = t1.\"EmployeeID\""
        ));
    }

    #[test]
    fn test_translation_errors() {
        let mut model = orders();
        model.selection = fields(vec![("Discount", nav("Details").col("Discount"))]);
        assert_matches!(
            translate(&model),
            Err(TranslateError::CollectionInScalarContext { name: "Details", .. })
        );

        let mut model = orders();
        model.add_filter(nav("Employee").any());
        assert_matches!(
            translate(&model),
            Err(TranslateError::SingularInReduction { name: "Employee", .. })
        );

        let mut model = orders();
        model.add_filter(col("Freight").gt(10));
        assert_matches!(
            translate(&model),
            Err(TranslateError::UnknownColumn { column: "Freight", .. })
        );

        let mut model = orders();
        model.add_filter(nav("Customer").col("CompanyName").is_null());
        assert_matches!(
            translate(&model),
            Err(TranslateError::UnknownAssociation { name: "Customer", .. })
        );

        let mut model = orders();
        model.add_filter(outer().col("OrderID").eq(1));
        assert_matches!(translate(&model), Err(TranslateError::NoOuterScope));

        let mut model = QueryModel::new(EntityMeta::of::<EmployeeTerritory>());
        model.add_filter(via(&extensions::EMPLOYEE).col("Address").is_null());
        assert_matches!(
            translate(&model),
            Err(TranslateError::AssociationSourceMismatch { expected: "Orders", .. })
        );
    }

    fn employee_address(order: Side, detail: Side) -> Expr {
        Expr::Column(ColumnRef {
            base: Base::Source,
            hops: vec![AssociationRef::Named("Employee")],
            column: "Address",
        })
        .eq(detail.col("OrderID"))
        .and(order.col("OrderID").eq(detail.col("OrderID")))
    }

    #[test]
    fn test_side_columns_only_render_inside_join_predicates() {
        let mut model = orders();
        model.add_filter(Side::SOURCE.col("OrderID").eq(1));
        assert_matches!(translate(&model), Err(TranslateError::UnboundSide));

        let registry = models::build_registry().unwrap();
        let descriptor = AssociationDescriptor::to_many::<Order, models::OrderDetail>("Lines")
            .predicate(employee_address);
        assert_matches!(
            Translator::new(&registry).join_condition(&descriptor, "t0", "t1"),
            Err(TranslateError::UnsupportedPredicate)
        );
    }

    #[test]
    fn test_association_load_for_one_source_row() {
        let registry = models::build_registry().unwrap();
        let statement = Translator::new(&registry)
            .translate_association_load(&models::order::ORDER_DETAILS, &[SqlValue::Int(10248)])
            .unwrap();

        assert!(
            statement
                .sql
                .starts_with("SELECT t0.\"OrderID\" AS \"OrderID\", t0.\"ProductID\" AS \"ProductID\"")
        );
        assert!(statement.sql.ends_with(
            "FROM \"Order Details\" AS t0 WHERE EXISTS (SELECT 1 FROM \"Orders\" AS t1 \
             WHERE t1.\"OrderID\" = t0.\"OrderID\" AND t1.\"OrderID\" = ?1)"
        ));
        assert_eq!(statement.params, vec![SqlValue::Int(10248)]);

        let error = Translator::new(&registry)
            .translate_association_load(&models::order::ORDER_DETAILS, &[])
            .unwrap_err();
        assert_matches!(error, TranslateError::KeyValueCount { expected: 1, actual: 0, .. });
    }
}
