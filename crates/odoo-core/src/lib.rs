//! odoo-core - Core types and traits for the Odoo connector.
//!
//! This crate holds everything that does not touch the network: validated
//! identifiers, the filter translator, typed operation requests, the
//! [`Session`] and [`Host`] seams, and the execution loop that ties them
//! together.

pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod executor;
pub mod filter;
pub mod operation;
pub mod traits;
pub mod types;

pub use credentials::Credentials;
pub use error::Error;
pub use filter::{Domain, FilterCondition, FilterOperator, FilterSet};
pub use operation::{
    AccessKind, DisplayName, Operation, OperationKind, OperationRequest, OperationResult,
    Pagination, ReadGroupQuery, Record,
};
pub use traits::{Host, Session};
pub use types::{ModelName, RecordId, ServerUrl};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
