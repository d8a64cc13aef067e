//! Loading the targets of an association for one materialized row
//!
//! ```rust,ignore
//! let details: Vec<OrderDetail> =
//!     load_association(&mut conn, &order, &order::ORDER_DETAILS).await?;
//! let employee: Option<Employee> =
//!     load_reference(&mut conn, &order, &order::ORDER_EMPLOYEE).await?;
//! ```

use std::marker::PhantomData;

use super::association::AssociationDescriptor;
use super::error::{OrmError, Result, TranslateError};
use super::traits::{DatabaseEntity, Entity, SqlValue};
use super::translator::{SqlStatement, Translator};
use crate::db::DataConnection;

/// Query for the target rows of one association from one source row.
pub struct AssociationQuery<'c, T: Entity> {
    conn: &'c mut DataConnection,
    descriptor: &'static AssociationDescriptor,
    key_values: Vec<SqlValue>,
    _phantom: PhantomData<T>,
}

impl<'c, T: Entity> AssociationQuery<'c, T> {
    /// Both entity types must match the ends of `descriptor`.
    pub fn new<S: DatabaseEntity>(
        conn: &'c mut DataConnection,
        source: &S,
        descriptor: &'static AssociationDescriptor,
    ) -> Result<Self> {
        if descriptor.source.table != S::TABLE_NAME {
            return Err(TranslateError::AssociationSourceMismatch {
                name: descriptor.name,
                expected: descriptor.source.table,
                actual: S::TABLE_NAME,
            }
            .into());
        }
        if descriptor.target.table != T::TABLE_NAME {
            return Err(TranslateError::TargetMismatch {
                name: descriptor.name,
                expected: descriptor.target.table,
                actual: T::TABLE_NAME,
            }
            .into());
        }

        Ok(Self {
            conn,
            descriptor,
            key_values: source.primary_key_values(),
            _phantom: PhantomData,
        })
    }

    pub fn to_statement(&self) -> Result<SqlStatement> {
        Ok(Translator::new(self.conn.registry())
            .translate_association_load(self.descriptor, &self.key_values)?)
    }

    pub async fn fetch_all(self) -> Result<Vec<T>> {
        let statement = self.to_statement()?;
        let rows = self.conn.fetch_rows(&statement).await?;
        Ok(rows.iter().map(T::from_row).collect::<std::result::Result<_, _>>()?)
    }
}

/// All target rows of `descriptor` for `source`.
pub async fn load_association<S: DatabaseEntity, T: Entity>(
    conn: &mut DataConnection,
    source: &S,
    descriptor: &'static AssociationDescriptor,
) -> Result<Vec<T>> {
    AssociationQuery::new(conn, source, descriptor)?
        .fetch_all()
        .await
}

/// The target row of a singular association, `None` when it does not resolve.
pub async fn load_reference<S: DatabaseEntity, T: Entity>(
    conn: &mut DataConnection,
    source: &S,
    descriptor: &'static AssociationDescriptor,
) -> Result<Option<T>> {
    if descriptor.is_collection() {
        return Err(OrmError::Translate(
            TranslateError::CollectionInScalarContext {
                table: descriptor.source.table,
                name: descriptor.name,
            },
        ));
    }
    let targets = load_association(conn, source, descriptor).await?;
    Ok(targets.into_iter().next())
}
