//! Core traits for the host and session seams.

mod host;
mod session;

pub use host::Host;
pub use session::Session;
