//! Shared fixtures for mock-server tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::{Map, Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use odoo_core::{Credentials, ServerUrl};

pub const DATABASE: &str = "testdb";
pub const USER_ID: i64 = 2;

/// Server URL pointing at a mock server.
pub fn mock_url(server: &MockServer) -> ServerUrl {
    ServerUrl::new(server.uri()).unwrap()
}

pub fn credentials(server: &MockServer) -> Credentials {
    Credentials::new(mock_url(server), Some(DATABASE.to_string()), "admin", "admin")
}

/// Successful JSON-RPC response.
pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "id": 1, "result": result}))
}

/// Server fault response in the shape the server sends.
pub fn rpc_fault(name: &str, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {
            "code": 200,
            "message": "Odoo Server Error",
            "data": {"name": name, "message": message, "debug": "Traceback (most recent call last): ..."}
        }
    }))
}

/// The `params` of a captured request body.
pub fn params(request: &Request) -> Value {
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    body["params"].clone()
}

/// An in-memory stand-in for the server's `/jsonrpc` endpoint.
///
/// Supports login, `db.list` and the model methods the connector calls,
/// with a small domain evaluator (`=`, `!=`, `>`, `<`, `in`, `not in`).
/// Records with `active: false` are hidden from searches unless the call
/// sets `active_test: false` in its context.
pub struct FakeOdoo {
    databases: Vec<String>,
    denied: Vec<String>,
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    tables: BTreeMap<String, BTreeMap<i64, Map<String, Value>>>,
}

impl FakeOdoo {
    pub fn new() -> Self {
        Self {
            databases: vec![DATABASE.to_string()],
            denied: Vec::new(),
            state: Mutex::new(FakeState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    pub fn with_databases(mut self, databases: &[&str]) -> Self {
        self.databases = databases.iter().map(|d| d.to_string()).collect();
        self
    }

    /// Deny an access kind (`read`, `write`, ...) on every model.
    pub fn deny(mut self, access: &str) -> Self {
        self.denied.push(access.to_string());
        self
    }

    /// Seed `count` records into `model` with a `name` and a numeric `age`.
    pub fn with_records(self, model: &str, count: usize) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for i in 0..count {
                let id = state.next_id;
                state.next_id += 1;
                let mut record = Map::new();
                record.insert("id".to_string(), json!(id));
                record.insert("name".to_string(), json!(format!("Record {}", i)));
                record.insert("age".to_string(), json!(i));
                state
                    .tables
                    .entry(model.to_string())
                    .or_default()
                    .insert(id, record);
            }
        }
        self
    }

    pub async fn mount(self, server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/jsonrpc"))
            .respond_with(self)
            .mount(server)
            .await;
    }

    fn handle(&self, params: &Value) -> Result<Value, (String, String)> {
        let service = params["service"].as_str().unwrap_or_default();
        let method = params["method"].as_str().unwrap_or_default();
        let args = params["args"].as_array().cloned().unwrap_or_default();

        match (service, method) {
            ("common", "login") => {
                let ok = args.first() == Some(&json!(DATABASE))
                    && args.get(1) == Some(&json!("admin"))
                    && args.get(2) == Some(&json!("admin"));
                Ok(if ok { json!(USER_ID) } else { json!(false) })
            }
            ("db", "list") => Ok(json!(self.databases)),
            ("object", "execute_kw") => self.execute_kw(&args),
            _ => Err((
                "werkzeug.exceptions.NotFound".to_string(),
                format!("unknown method {}.{}", service, method),
            )),
        }
    }

    fn execute_kw(&self, args: &[Value]) -> Result<Value, (String, String)> {
        let model = args[3].as_str().unwrap_or_default().to_string();
        let method = args[4].as_str().unwrap_or_default();
        let positional = args.get(5).and_then(Value::as_array).cloned().unwrap_or_default();
        let kwargs = args.get(6).and_then(Value::as_object).cloned().unwrap_or_default();

        let mut state = self.state.lock().unwrap();

        match method {
            "create" => {
                let id = state.next_id;
                state.next_id += 1;
                let mut record = positional[0].as_object().cloned().unwrap_or_default();
                record.insert("id".to_string(), json!(id));
                state.tables.entry(model).or_default().insert(id, record);
                Ok(json!(id))
            }
            "read" => {
                let table = state.tables.get(&model).cloned().unwrap_or_default();
                let records: Vec<Value> = ids_of(&positional[0])
                    .into_iter()
                    .filter_map(|id| table.get(&id))
                    .map(|r| project(r, &kwargs))
                    .collect();
                Ok(json!(records))
            }
            "write" => {
                let values = positional[1].as_object().cloned().unwrap_or_default();
                let table = state.tables.entry(model).or_default();
                for id in ids_of(&positional[0]) {
                    if let Some(record) = table.get_mut(&id) {
                        record.extend(values.clone());
                    }
                }
                Ok(json!(true))
            }
            "unlink" => {
                let table = state.tables.entry(model).or_default();
                for id in ids_of(&positional[0]) {
                    table.remove(&id);
                }
                Ok(json!(true))
            }
            "search" | "search_read" | "search_count" => {
                let table = state.tables.get(&model).cloned().unwrap_or_default();
                let active_test = kwargs
                    .get("context")
                    .and_then(|c| c.get("active_test"))
                    != Some(&json!(false));
                let matching: Vec<&Map<String, Value>> = table
                    .values()
                    .filter(|r| !active_test || r.get("active") != Some(&json!(false)))
                    .filter(|r| matches_domain(r, &positional[0]))
                    .collect();
                if method == "search_count" {
                    return Ok(json!(matching.len()));
                }
                let offset = kwargs.get("offset").and_then(Value::as_u64).unwrap_or(0) as usize;
                let window = matching.into_iter().skip(offset);
                let window: Vec<&Map<String, Value>> = match kwargs.get("limit").and_then(Value::as_u64) {
                    Some(limit) => window.take(limit as usize).collect(),
                    None => window.collect(),
                };
                if method == "search" {
                    Ok(json!(window.iter().map(|r| r["id"].clone()).collect::<Vec<_>>()))
                } else {
                    Ok(json!(window.iter().map(|r| project(r, &kwargs)).collect::<Vec<_>>()))
                }
            }
            "check_access_rights" => {
                let access = positional[0].as_str().unwrap_or_default();
                let allowed = !self.denied.iter().any(|d| d == access);
                let raise = kwargs.get("raise_exception") == Some(&json!(true));
                if !allowed && raise {
                    return Err((
                        "odoo.exceptions.AccessError".to_string(),
                        format!("You are not allowed to {} '{}' records.", access, model),
                    ));
                }
                Ok(json!(allowed))
            }
            other => Err((
                "builtins.AttributeError".to_string(),
                format!("The method '{}' does not exist on the model '{}'", other, model),
            )),
        }
    }
}

impl Respond for FakeOdoo {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.handle(&params(request)) {
            Ok(result) => rpc_result(result),
            Err((name, message)) => rpc_fault(&name, &message),
        }
    }
}

fn ids_of(value: &Value) -> Vec<i64> {
    match value {
        Value::Array(items) => items.iter().filter_map(Value::as_i64).collect(),
        Value::Number(n) => n.as_i64().into_iter().collect(),
        _ => Vec::new(),
    }
}

fn project(record: &Map<String, Value>, kwargs: &Map<String, Value>) -> Value {
    let Some(fields) = kwargs.get("fields").and_then(Value::as_array) else {
        return Value::Object(record.clone());
    };
    let mut out = Map::new();
    out.insert("id".to_string(), record["id"].clone());
    for field in fields.iter().filter_map(Value::as_str) {
        out.insert(field.to_string(), record.get(field).cloned().unwrap_or(json!(false)));
    }
    Value::Object(out)
}

fn matches_domain(record: &Map<String, Value>, domain: &Value) -> bool {
    let Some(terms) = domain.as_array() else {
        return true;
    };
    terms.iter().all(|term| {
        let field = term[0].as_str().unwrap_or_default();
        let op = term[1].as_str().unwrap_or_default();
        let expected = &term[2];
        let actual = record.get(field).cloned().unwrap_or(json!(false));
        let as_f64 = |v: &Value| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse::<f64>().ok(),
            _ => None,
        };
        let loose_eq = |a: &Value, b: &Value| a == b || (as_f64(a).is_some() && as_f64(a) == as_f64(b));
        match op {
            "=" => loose_eq(&actual, expected),
            "!=" => !loose_eq(&actual, expected),
            ">" => as_f64(&actual) > as_f64(expected),
            "<" => as_f64(&actual) < as_f64(expected),
            "in" => expected.as_array().is_some_and(|l| l.iter().any(|v| loose_eq(&actual, v))),
            "not in" => !expected.as_array().is_some_and(|l| l.iter().any(|v| loose_eq(&actual, v))),
            _ => false,
        }
    })
}
