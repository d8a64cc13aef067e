//! Error types for the ORM layer

use thiserror::Error;

/// Errors raised while registering or validating an association.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssociationError {
    /// Neither a key pair nor a predicate was declared
    #[error("association {source_table}.{name} declares neither keys nor a predicate")]
    MissingJoinCondition {
        source_table: &'static str,
        name: &'static str,
    },

    /// `this_key` and `other_key` do not pair up
    #[error(
        "association {source_table}.{name} has {this_keys} source key(s) but {other_keys} target key(s)"
    )]
    KeyArityMismatch {
        source_table: &'static str,
        name: &'static str,
        this_keys: usize,
        other_keys: usize,
    },

    /// A key or predicate column does not exist on its entity
    #[error("association {source_table}.{name} references unknown column {table}.{column}")]
    UnknownKeyColumn {
        source_table: &'static str,
        name: &'static str,
        table: &'static str,
        column: &'static str,
    },

    /// The join predicate uses something other than direct source/target columns
    #[error("association {source_table}.{name} has an invalid predicate: {reason}")]
    InvalidPredicate {
        source_table: &'static str,
        name: &'static str,
        reason: &'static str,
    },

    /// The same navigation was registered twice on one entity
    #[error("association {source_table}.{name} is already registered")]
    DuplicateAssociation {
        source_table: &'static str,
        name: &'static str,
    },
}

/// Errors raised while translating a query into SQL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    #[error("entity {table} has no association named {name}")]
    UnknownAssociation {
        table: &'static str,
        name: &'static str,
    },

    #[error("entity {table} has no column named {column}")]
    UnknownColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A collection navigation appeared where a single value is required
    #[error("collection association {table}.{name} cannot be used as a scalar path")]
    CollectionInScalarContext {
        table: &'static str,
        name: &'static str,
    },

    /// A reduction (any, max, ...) was applied to a singular association
    #[error("association {table}.{name} is not a collection and cannot be reduced")]
    SingularInReduction {
        table: &'static str,
        name: &'static str,
    },

    /// A descriptor was applied to a row of a different entity
    #[error("association {name} starts at {expected}, not at {actual}")]
    AssociationSourceMismatch {
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("navigation has no association hops")]
    EmptyNavigation,

    /// `outer(...)` used at the top level of a query
    #[error("outer row referenced outside of a subquery")]
    NoOuterScope,

    /// `Side` columns used outside of an association predicate
    #[error("association side referenced outside of a join predicate")]
    UnboundSide,

    #[error("join predicates may only reference direct source and target columns")]
    UnsupportedPredicate,

    #[error("association {name} targets {expected}, not {actual}")]
    TargetMismatch {
        name: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("expected {expected} key value(s) for {table}, got {actual}")]
    KeyValueCount {
        table: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An unregistered descriptor failed validation when applied
    #[error(transparent)]
    InvalidAssociation(#[from] AssociationError),
}

/// Errors that may occur when working with the ORM
#[derive(Error, Debug)]
pub enum OrmError {
    #[error(transparent)]
    Association(#[from] AssociationError),

    #[error(transparent)]
    Translate(#[from] TranslateError),

    /// The requested named configuration does not exist
    #[error("no connection configuration named {0}")]
    UnknownConfiguration(String),

    #[error("unsupported data provider {0}")]
    UnsupportedProvider(String),

    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Error from the sqlx library. Standard sqlx errors are converted to this variant
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, OrmError>;
