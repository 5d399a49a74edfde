//! JSON-RPC HTTP client implementation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tracing::{debug, instrument, trace};

use odoo_core::Result;
use odoo_core::error::{Error, RpcFault, TransportError};
use odoo_core::types::ServerUrl;

use super::envelope::{RpcEnvelope, RpcErrorObject};

/// HTTP client for JSON-RPC calls against one server.
///
/// One attempt per call; retries and timeouts are left to the transport.
#[derive(Debug)]
pub struct JsonRpcClient {
    client: reqwest::Client,
    url: ServerUrl,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Create a new client for the given server.
    pub fn new(url: ServerUrl) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("odoo-jsonrpc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    /// Returns the server URL this client is configured for.
    pub fn url(&self) -> &ServerUrl {
        &self.url
    }

    /// Invoke `service.method` with positional `args` and return `result`.
    ///
    /// An `error` envelope becomes [`Error::Rpc`]; anything that is not a
    /// JSON-RPC envelope becomes [`Error::Transport`].
    #[instrument(skip(self, args), fields(server = %self.url))]
    pub async fn call(&self, service: &str, method: &str, args: Vec<Value>) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = RpcEnvelope::call(id, service, method, args);
        debug!(id, service, method, "JSON-RPC call");

        let response = self
            .client
            .post(self.url.jsonrpc_url())
            .json(&envelope)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        trace!(status = %status, bytes = body.len(), "JSON-RPC response");

        parse_response(status.as_u16(), &body)
    }
}

/// Unwrap a response body into its `result`.
pub(crate) fn parse_response(status: u16, body: &str) -> Result<Value> {
    let success = (200..300).contains(&status);

    let envelope = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) if !success => return Err(TransportError::Status { status }.into()),
        Ok(other) => {
            return Err(malformed(format!("expected an object, got {}", kind_of(&other))));
        }
        Err(e) => return Err(malformed(format!("invalid JSON: {}", e))),
    };

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(Error::Rpc(fault_from(error)));
    }

    match envelope.get("result") {
        Some(result) => Ok(result.clone()),
        None if !success => Err(TransportError::Status { status }.into()),
        None => Err(malformed("envelope has neither result nor error".to_string())),
    }
}

fn fault_from(error: &Value) -> RpcFault {
    match serde_json::from_value::<RpcErrorObject>(error.clone()) {
        Ok(object) => {
            let data = object.data;
            let message = data
                .as_ref()
                .and_then(|d| d.message.clone())
                .filter(|m| !m.is_empty())
                .or(object.message)
                .unwrap_or_else(|| "unknown server error".to_string());

            RpcFault {
                code: object.code,
                name: data.as_ref().and_then(|d| d.name.clone()),
                message,
                debug: data.and_then(|d| d.debug),
            }
        }
        Err(_) => RpcFault::new(0, error.to_string()),
    }
}

fn malformed(message: String) -> Error {
    TransportError::MalformedResponse { message }.into()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let err = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_decode() {
        TransportError::MalformedResponse {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(err)
}
