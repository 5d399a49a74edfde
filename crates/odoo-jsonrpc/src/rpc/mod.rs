//! JSON-RPC transport.
//!
//! Envelope construction, the HTTP round trip and response unwrapping.

mod client;
mod envelope;

pub use client::JsonRpcClient;
pub(crate) use envelope::*;
