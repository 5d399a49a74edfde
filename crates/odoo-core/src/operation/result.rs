//! Operation results and their flattening into output records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::AccessKind;
use crate::types::RecordId;

/// A generic output record: field name to value.
pub type Record = Map<String, Value>;

/// An `(id, display name)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName {
    pub id: RecordId,
    pub name: String,
}

/// What an operation handler produced, before flattening.
#[derive(Clone, Debug, PartialEq)]
pub enum OperationResult {
    /// A newly created record id (`create`, `copy`).
    Created(RecordId),
    /// Records as read from the server (`get`, `getAll`, `readGroup`).
    Records(Vec<Record>),
    /// Outcome of `update` or `delete`.
    Written { id: RecordId, success: bool },
    /// Matching ids (`search`).
    Ids(Vec<RecordId>),
    /// Number of matching records.
    Count(u64),
    Exists { id: RecordId, exists: bool },
    Names(Vec<DisplayName>),
    Access { access: AccessKind, allowed: bool },
}

impl OperationResult {
    /// Flatten into zero or more output records.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            OperationResult::Created(id) => vec![object(json!({ "id": id }))],
            OperationResult::Records(records) => records,
            OperationResult::Written { id, success } => {
                vec![object(json!({ "id": id, "success": success }))]
            }
            OperationResult::Ids(ids) => ids
                .into_iter()
                .map(|id| object(json!({ "id": id })))
                .collect(),
            OperationResult::Count(count) => vec![object(json!({ "count": count }))],
            OperationResult::Exists { id, exists } => {
                vec![object(json!({ "id": id, "exists": exists }))]
            }
            OperationResult::Names(names) => names
                .into_iter()
                .map(|n| object(json!({ "id": n.id, "name": n.name })))
                .collect(),
            OperationResult::Access { access, allowed } => {
                vec![object(json!({ "operation": access, "allowed": allowed }))]
            }
        }
    }
}

fn object(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}
