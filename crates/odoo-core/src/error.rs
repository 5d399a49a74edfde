//! Error types for the Odoo connector.
//!
//! One error type with explicit variants for transport failures,
//! authentication, server-side faults and input validation.

use std::fmt;
use thiserror::Error;

/// The unified error type for connector operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed response).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication and session resolution errors.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Fault returned by the server inside a JSON-RPC `error` envelope.
    ///
    /// Displays the server message unchanged.
    #[error(transparent)]
    Rpc(#[from] RpcFault),

    /// Missing or malformed input, detected before any call is made.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Returns the server fault if this error came from an `error` envelope.
    pub fn as_fault(&self) -> Option<&RpcFault> {
        match self {
            Error::Rpc(fault) => Some(fault),
            _ => None,
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-success HTTP status and no JSON-RPC body.
    #[error("HTTP {status}")]
    Status { status: u16 },

    /// Body was not a JSON-RPC response envelope.
    #[error("malformed response: {message}")]
    MalformedResponse { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

/// Authentication-related errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The server returned no usable user id for the credentials.
    #[error("authentication failed for user '{username}' on database '{database}'")]
    AuthenticationFailed { username: String, database: String },

    /// No database was configured and none could be discovered.
    #[error("cannot determine database: {reason}")]
    DatabaseUnresolved { reason: String },
}

/// A fault reported by the server.
#[derive(Debug, Clone)]
pub struct RpcFault {
    /// JSON-RPC error code.
    pub code: i64,
    /// Server exception name (e.g. `odoo.exceptions.AccessError`).
    pub name: Option<String>,
    /// Human readable message, passed through verbatim.
    pub message: String,
    /// Server traceback, if sent.
    pub debug: Option<String>,
}

impl RpcFault {
    /// Create a new fault.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            name: None,
            message: message.into(),
            debug: None,
        }
    }

    /// Check if the server classified this as an access error.
    pub fn is_access_error(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| n.ends_with("AccessError") || n.ends_with("AccessDenied"))
    }
}

impl fmt::Display for RpcFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RpcFault {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A parameter required by the selected operation is absent.
    #[error("missing parameter '{name}' for operation '{operation}'")]
    MissingParameter { name: String, operation: String },

    /// A parameter is present but has the wrong shape.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Unknown operation name.
    #[error("unsupported operation '{value}'")]
    UnknownOperation { value: String },

    /// Invalid server URL.
    #[error("invalid server URL '{value}': {reason}")]
    ServerUrl { value: String, reason: String },

    /// Invalid model name.
    #[error("invalid model '{value}': {reason}")]
    Model { value: String, reason: String },

    /// Invalid record id.
    #[error("invalid record id '{value}': {reason}")]
    RecordId { value: String, reason: String },

    /// Filter condition whose value does not fit its operator.
    #[error("invalid filter on '{field}': {reason}")]
    Filter { field: String, reason: String },
}
