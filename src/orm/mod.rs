//! Association-aware ORM layer
//!
//! Entities get their table metadata and row decoding from
//! `#[derive(Entity)]` (see the `northwind-macros` crate). Navigations between
//! entities are declared as static [`AssociationDescriptor`]s, collected into an
//! [`AssociationRegistry`], and used inside query expressions:
//!
//! ```rust,ignore
//! let orders = conn
//!     .table::<Order>()
//!     .filter(nav("DetailsWithBigDiscount").any())
//!     .select([
//!         ("EmployeeID", col("EmployeeID")),
//!         ("MaxDiscount", nav("DetailsWithBigDiscount").max(col("Discount"))),
//!     ])
//!     .take(10)
//!     .fetch_all()
//!     .await?;
//! ```
//!
//! The [`translator`] turns singular navigations into joins and collection
//! reductions into correlated subqueries.

mod association;
mod builder;
mod error;
mod expr;
mod projection;
mod registry;
mod repository;
pub mod translator;
mod traits;

pub use association::*;
pub use builder::*;
pub use error::*;
pub use expr::*;
pub use projection::*;
pub use registry::*;
pub use repository::*;
pub use traits::*;
pub use translator::{QueryModel, Selection, SqlStatement, Translator};

pub use northwind_macros::Entity;
