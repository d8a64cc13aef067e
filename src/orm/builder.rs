//! Query builders bound to a data connection
//!
//! ```rust,ignore
//! let rows = conn
//!     .table::<Order>()
//!     .filter(nav("Employee").col("Address").starts_with("B"))
//!     .select([
//!         ("OrderID", col("OrderID")),
//!         ("Address", nav("Employee").col("Address")),
//!     ])
//!     .take(10)
//!     .fetch_all()
//!     .await?;
//! ```

use std::marker::PhantomData;

use super::error::Result;
use super::expr::Expr;
use super::projection::ProjectionRow;
use super::traits::{Entity, EntityMeta, SortDirection};
use super::translator::{QueryModel, Selection, SqlStatement, Translator};
use crate::db::DataConnection;

/// A query returning whole entities.
pub struct EntityQuery<'c, E: Entity> {
    conn: &'c mut DataConnection,
    model: QueryModel,
    _phantom: PhantomData<E>,
}

impl<'c, E: Entity> EntityQuery<'c, E> {
    pub fn new(conn: &'c mut DataConnection) -> Self {
        Self {
            conn,
            model: QueryModel::new(EntityMeta::of::<E>()),
            _phantom: PhantomData,
        }
    }

    /// Add a filter condition. Repeated filters are ANDed.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.model.add_filter(condition);
        self
    }

    pub fn order_by(mut self, expr: Expr, direction: SortDirection) -> Self {
        self.model.order_by.push((expr, direction));
        self
    }

    /// Keep at most `count` rows.
    pub fn take(mut self, count: i64) -> Self {
        self.model.limit = Some(count);
        self
    }

    /// Switch to a projection of named expressions.
    pub fn select<I, N>(mut self, fields: I) -> ProjectionQuery<'c>
    where
        I: IntoIterator<Item = (N, Expr)>,
        N: Into<String>,
    {
        self.model.selection = Selection::Fields(
            fields
                .into_iter()
                .map(|(name, expr)| (name.into(), expr))
                .collect(),
        );
        ProjectionQuery {
            conn: self.conn,
            model: self.model,
        }
    }

    pub fn to_statement(&self) -> Result<SqlStatement> {
        Ok(Translator::new(self.conn.registry()).translate(&self.model)?)
    }

    /// Execute the query and return all matching entities.
    pub async fn fetch_all(self) -> Result<Vec<E>> {
        let statement = self.to_statement()?;
        let rows = self.conn.fetch_rows(&statement).await?;
        Ok(rows.iter().map(E::from_row).collect::<std::result::Result<_, _>>()?)
    }

    /// Execute the query and return the first entity, if any.
    pub async fn fetch_optional(self) -> Result<Option<E>> {
        let results = self.take(1).fetch_all().await?;
        Ok(results.into_iter().next())
    }
}

/// A query returning named columns.
pub struct ProjectionQuery<'c> {
    conn: &'c mut DataConnection,
    model: QueryModel,
}

impl<'c> ProjectionQuery<'c> {
    pub fn order_by(mut self, expr: Expr, direction: SortDirection) -> Self {
        self.model.order_by.push((expr, direction));
        self
    }

    pub fn take(mut self, count: i64) -> Self {
        self.model.limit = Some(count);
        self
    }

    pub fn to_statement(&self) -> Result<SqlStatement> {
        Ok(Translator::new(self.conn.registry()).translate(&self.model)?)
    }

    pub async fn fetch_all(self) -> Result<Vec<ProjectionRow>> {
        let statement = self.to_statement()?;
        let rows = self.conn.fetch_rows(&statement).await?;
        Ok(rows
            .iter()
            .map(ProjectionRow::from_row)
            .collect::<std::result::Result<_, _>>()?)
    }
}
