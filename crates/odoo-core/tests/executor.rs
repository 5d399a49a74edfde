//! Execution loop tests against an in-memory session.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use odoo_core::error::{AuthError, RpcFault};
use odoo_core::executor::run_items;
use odoo_core::{
    AccessKind, Credentials, DisplayName, Domain, Error, Host, ModelName, Pagination,
    ReadGroupQuery, Record, RecordId, Result, ServerUrl, Session,
};

/// Host backed by a list of per-item parameter objects.
struct JobHost {
    items: Vec<Value>,
    continue_on_fail: bool,
}

#[async_trait]
impl Host for JobHost {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn parameter(&self, name: &str, item: usize) -> Option<Value> {
        self.items.get(item)?.get(name).cloned()
    }

    async fn credentials(&self) -> Result<Credentials> {
        Ok(Credentials::new(
            ServerUrl::new("http://localhost:8069")?,
            Some("test".to_string()),
            "admin",
            "admin",
        ))
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

/// Session recording the calls it receives.
#[derive(Default)]
struct FakeSession {
    calls: Mutex<Vec<String>>,
    domains: Mutex<Vec<Value>>,
}

impl FakeSession {
    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn id(n: i64) -> RecordId {
    RecordId::new(n).unwrap()
}

#[async_trait]
impl Session for FakeSession {
    fn database(&self) -> &str {
        "test"
    }

    fn user_id(&self) -> i64 {
        2
    }

    async fn create(&self, _model: &ModelName, _values: &Record) -> Result<RecordId> {
        self.record("create");
        Ok(id(100))
    }

    async fn read(
        &self,
        _model: &ModelName,
        ids: &[RecordId],
        _fields: &[String],
    ) -> Result<Vec<Record>> {
        self.record("read");
        if ids[0].get() == 666 {
            return Err(RpcFault::new(200, "Record does not exist or has been deleted.").into());
        }
        Ok(Vec::new())
    }

    async fn write(&self, _model: &ModelName, _id: RecordId, _values: &Record) -> Result<bool> {
        self.record("write");
        Ok(true)
    }

    async fn unlink(&self, _model: &ModelName, _id: RecordId) -> Result<bool> {
        self.record("unlink");
        Ok(true)
    }

    async fn search(
        &self,
        _model: &ModelName,
        domain: &Domain,
        _page: Pagination,
    ) -> Result<Vec<RecordId>> {
        self.record("search");
        self.domains.lock().unwrap().push(domain.to_value());
        Ok(vec![id(1), id(2)])
    }

    async fn search_read(
        &self,
        _model: &ModelName,
        _domain: &Domain,
        _fields: &[String],
        _page: Pagination,
    ) -> Result<Vec<Record>> {
        self.record("search_read");
        Ok(vec![Record::new(), Record::new(), Record::new()])
    }

    async fn search_count(&self, _model: &ModelName, domain: &Domain) -> Result<u64> {
        self.record("search_count");
        self.domains.lock().unwrap().push(domain.to_value());
        Ok(0)
    }

    async fn copy(&self, _model: &ModelName, _id: RecordId, _defaults: &Record) -> Result<RecordId> {
        self.record("copy");
        Ok(id(101))
    }

    async fn name_get(&self, _model: &ModelName, ids: &[RecordId]) -> Result<Vec<DisplayName>> {
        self.record("name_get");
        Ok(ids
            .iter()
            .map(|id| DisplayName {
                id: *id,
                name: format!("Record {}", id),
            })
            .collect())
    }

    async fn name_search(
        &self,
        _model: &ModelName,
        _name: &str,
        _domain: &Domain,
        _limit: u64,
    ) -> Result<Vec<DisplayName>> {
        self.record("name_search");
        Ok(Vec::new())
    }

    async fn read_group(
        &self,
        _model: &ModelName,
        _domain: &Domain,
        _query: &ReadGroupQuery,
    ) -> Result<Vec<Record>> {
        self.record("read_group");
        Ok(Vec::new())
    }

    async fn check_access_rights(
        &self,
        _model: &ModelName,
        _access: AccessKind,
        raise_exception: bool,
    ) -> Result<bool> {
        self.record("check_access_rights");
        if raise_exception {
            return Err(RpcFault::new(200, "You are not allowed to modify 'Contact' records.").into());
        }
        Ok(false)
    }
}

fn three_items_second_failing() -> Vec<Value> {
    vec![
        json!({"resource": "res.partner", "operation": "create", "fieldsToCreateOrUpdate": {"name": "A"}}),
        json!({"resource": "res.partner", "operation": "get", "id": 666}),
        json!({"resource": "res.partner", "operation": "searchCount"}),
    ]
}

#[tokio::test]
async fn continue_on_fail_substitutes_error_record() {
    let host = JobHost {
        items: three_items_second_failing(),
        continue_on_fail: true,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();

    assert_eq!(output.len(), 3);
    assert_eq!(output[0].get("id"), Some(&json!(100)));
    assert_eq!(
        Value::Object(output[1].clone()),
        json!({"error": "Record does not exist or has been deleted."})
    );
    assert_eq!(output[2].get("count"), Some(&json!(0)));
}

#[tokio::test]
async fn failure_aborts_batch_without_continue() {
    let host = JobHost {
        items: three_items_second_failing(),
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let err = run_items(&session, &host).await.unwrap_err();

    assert_eq!(err.to_string(), "Record does not exist or has been deleted.");
    assert_eq!(session.calls(), vec!["create", "read"]);
}

#[tokio::test]
async fn validation_errors_happen_before_any_call() {
    let host = JobHost {
        items: vec![json!({"resource": "res.partner", "operation": "delete"})],
        continue_on_fail: true,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();

    assert!(output[0]["error"].as_str().unwrap().contains("missing parameter 'id'"));
    assert!(session.calls().is_empty());
}

#[tokio::test]
async fn search_translates_filter() {
    let host = JobHost {
        items: vec![json!({
            "resource": "res.partner",
            "operation": "search",
            "filterRequest": {"filter": [{"fieldName": "age", "operator": "greaterThen", "value": "18"}]}
        })],
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(session.domains.lock().unwrap()[0], json!([["age", ">", "18"]]));
}

#[tokio::test]
async fn exists_defaults_to_count_by_id() {
    let host = JobHost {
        items: vec![json!({"resource": "res.partner", "operation": "exists", "id": "9"})],
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();

    assert_eq!(Value::Object(output[0].clone()), json!({"id": 9, "exists": false}));
    assert_eq!(session.calls(), vec!["search_count"]);
    assert_eq!(session.domains.lock().unwrap()[0], json!([["id", "=", 9]]));
}

#[tokio::test]
async fn one_item_may_yield_many_records() {
    let host = JobHost {
        items: vec![
            json!({"resource": "res.partner", "operation": "getAll", "returnAll": true}),
            json!({"resource": "res.partner", "operation": "nameGet", "ids": "1,2"}),
            json!({"resource": "res.partner", "operation": "get", "id": 5}),
        ],
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();

    // three records, two names, zero for the missing id
    assert_eq!(output.len(), 5);
    assert_eq!(output[3].get("name"), Some(&json!("Record 1")));
}

#[tokio::test]
async fn raised_access_denial_is_an_error() {
    let host = JobHost {
        items: vec![json!({
            "resource": "res.partner",
            "operation": "checkAccessRights",
            "accessOperation": "write",
            "options": {"raiseException": true}
        })],
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let err = run_items(&session, &host).await.unwrap_err();
    assert!(matches!(err, Error::Rpc(_)));
}

#[tokio::test]
async fn unraised_access_denial_is_false() {
    let host = JobHost {
        items: vec![json!({
            "resource": "res.partner",
            "operation": "checkAccessRights",
            "accessOperation": "unlink"
        })],
        continue_on_fail: false,
    };
    let session = FakeSession::default();

    let output = run_items(&session, &host).await.unwrap();
    assert_eq!(Value::Object(output[0].clone()), json!({"operation": "unlink", "allowed": false}));
}

#[test]
fn auth_errors_are_distinct_from_faults() {
    let err = Error::from(AuthError::AuthenticationFailed {
        username: "admin".into(),
        database: "test".into(),
    });
    assert!(err.as_fault().is_none());
}
