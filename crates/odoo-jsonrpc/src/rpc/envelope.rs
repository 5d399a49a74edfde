//! JSON-RPC envelope and service definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Services and methods
// ============================================================================

/// Authentication and version service.
pub const SERVICE_COMMON: &str = "common";

/// Model method invocation service.
pub const SERVICE_OBJECT: &str = "object";

/// Database management service.
pub const SERVICE_DB: &str = "db";

/// common.login
pub const LOGIN: &str = "login";

/// object.execute_kw
pub const EXECUTE_KW: &str = "execute_kw";

/// db.list
pub const LIST_DATABASES: &str = "list";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request envelope posted to `/jsonrpc`.
#[derive(Debug, Serialize)]
pub struct RpcEnvelope<'a> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: CallParams<'a>,
    pub id: u64,
}

impl<'a> RpcEnvelope<'a> {
    pub fn call(id: u64, service: &'a str, method: &'a str, args: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: "call",
            params: CallParams {
                service,
                method,
                args,
            },
            id,
        }
    }
}

/// `params` of a `call` envelope.
#[derive(Debug, Serialize)]
pub struct CallParams<'a> {
    pub service: &'a str,
    pub method: &'a str,
    pub args: Vec<Value>,
}

/// The `error` member of a failed response.
#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RpcErrorData>,
}

/// Server exception details.
#[derive(Debug, Deserialize)]
pub struct RpcErrorData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
}
