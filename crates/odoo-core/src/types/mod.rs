//! Validated connector types.
//!
//! These types check their invariants at construction time so the rest of
//! the crate never has to re-validate them.

mod model;
mod record_id;
mod server_url;

pub use model::ModelName;
pub use record_id::RecordId;
pub use server_url::ServerUrl;
