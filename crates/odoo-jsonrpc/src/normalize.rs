//! Response normalization.
//!
//! The server answers `false` where it means "nothing", returns singleton
//! objects where callers expect lists, and encodes display names as
//! `[id, name]` pairs. Everything here turns those shapes into honest types
//! so no other module has to know about them.

use serde_json::Value;

use odoo_core::error::{Error, TransportError};
use odoo_core::{DisplayName, Record, RecordId, Result};

/// Records from a read-like call: `false` → `[]`, object → `[object]`,
/// list → list.
pub(crate) fn records(value: Value) -> Result<Vec<Record>> {
    match value {
        Value::Bool(false) | Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(vec![map]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(unexpected("record", &other)),
            })
            .collect(),
        other => Err(unexpected("records", &other)),
    }
}

/// Id list from `search`.
pub(crate) fn ids(value: Value) -> Result<Vec<RecordId>> {
    match value {
        Value::Bool(false) | Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(id_from).collect(),
        number @ Value::Number(_) => Ok(vec![id_from(&number)?]),
        other => Err(unexpected("ids", &other)),
    }
}

/// A single new id, returned bare or as a one-element list.
pub(crate) fn single_id(value: Value) -> Result<RecordId> {
    match value {
        Value::Array(items) if items.len() == 1 => id_from(&items[0]),
        number @ Value::Number(_) => id_from(&number),
        other => Err(unexpected("record id", &other)),
    }
}

pub(crate) fn count(value: Value) -> Result<u64> {
    match value {
        Value::Bool(false) | Value::Null => Ok(0),
        Value::Number(n) => n.as_u64().ok_or_else(|| unexpected("count", &Value::Number(n))),
        other => Err(unexpected("count", &other)),
    }
}

/// Boolean outcome of write-like and access calls.
pub(crate) fn flag(value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        Value::Null => Ok(false),
        Value::Number(n) => Ok(n.as_i64().is_some_and(|n| n != 0)),
        other => Err(unexpected("boolean", &other)),
    }
}

/// `[[id, name], ...]` pairs. A `false` name becomes empty.
pub(crate) fn display_names(value: Value) -> Result<Vec<DisplayName>> {
    match value {
        Value::Bool(false) | Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(display_name).collect(),
        other => Err(unexpected("display names", &other)),
    }
}

fn display_name(pair: Value) -> Result<DisplayName> {
    let Value::Array(parts) = &pair else {
        return Err(unexpected("[id, name] pair", &pair));
    };
    match parts.as_slice() {
        [id, name] => Ok(DisplayName {
            id: id_from(id)?,
            name: match name {
                Value::String(s) => s.clone(),
                Value::Bool(false) | Value::Null => String::new(),
                other => other.to_string(),
            },
        }),
        _ => Err(unexpected("[id, name] pair", &pair)),
    }
}

fn id_from(value: &Value) -> Result<RecordId> {
    value
        .as_i64()
        .ok_or_else(|| unexpected("record id", value))
        .and_then(RecordId::new)
}

fn unexpected(expected: &str, got: &Value) -> Error {
    let mut shown = got.to_string();
    if shown.len() > 120 {
        let cut = (0..=120).rev().find(|i| shown.is_char_boundary(*i)).unwrap_or(0);
        shown.truncate(cut);
        shown.push('…');
    }
    TransportError::MalformedResponse {
        message: format!("expected {}, got {}", expected, shown),
    }
    .into()
}
