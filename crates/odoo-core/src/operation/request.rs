//! Typed operation requests and how they are read from a host.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use super::{Operation, Record};
use crate::Result;
use crate::error::{Error, ValidationError};
use crate::filter::FilterSet;
use crate::traits::Host;
use crate::types::{ModelName, RecordId};

/// Page size used when a paged search does not specify a limit.
pub const DEFAULT_LIMIT: u64 = 50;

/// Result limit for name searches when none is given.
pub const DEFAULT_NAME_SEARCH_LIMIT: u64 = 100;

/// Which slice of the matching records to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pagination {
    /// Every matching record, however many there are.
    All,
    /// A single window.
    Page { offset: u64, limit: u64 },
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination::Page {
            offset: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Access kind probed by `checkAccessRights`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    #[default]
    Read,
    Write,
    Create,
    #[serde(alias = "delete")]
    Unlink,
}

impl AccessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AccessKind::Read => "read",
            AccessKind::Write => "write",
            AccessKind::Create => "create",
            AccessKind::Unlink => "unlink",
        }
    }
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping parameters for `read_group`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadGroupQuery {
    pub fields: Vec<String>,
    pub group_by: Vec<String>,
    pub offset: u64,
    pub limit: Option<u64>,
    pub order_by: Option<String>,
    pub lazy: bool,
}

impl Default for ReadGroupQuery {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            group_by: Vec::new(),
            offset: 0,
            limit: None,
            order_by: None,
            lazy: true,
        }
    }
}

/// Field/value map supplied for writes.
///
/// Accepts the host's name/value collection `{"fields": [{"fieldName",
/// "fieldValue"}]}` or a plain JSON object. In a collection, a later entry
/// for the same field wins.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "FieldValuesRepr")]
pub struct FieldValues(Record);

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValuesRepr {
    Collection { fields: Vec<NameValue> },
    Map(Record),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameValue {
    field_name: String,
    #[serde(default)]
    field_value: Value,
}

impl From<FieldValuesRepr> for FieldValues {
    fn from(repr: FieldValuesRepr) -> Self {
        match repr {
            FieldValuesRepr::Collection { fields } => Self(
                fields
                    .into_iter()
                    .map(|pair| (pair.field_name, pair.field_value))
                    .collect(),
            ),
            FieldValuesRepr::Map(map) => Self(map),
        }
    }
}

impl FieldValues {
    pub fn into_record(self) -> Record {
        self.0
    }
}

/// The shared `options` parameter.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    #[serde(deserialize_with = "string_list")]
    pub fields_list: Vec<String>,
    pub default_values: FieldValues,
    #[serde(deserialize_with = "string_list")]
    pub group_by: Vec<String>,
    pub lazy: Option<bool>,
    pub order_by: Option<String>,
    pub raise_exception: bool,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub filter_request: FilterSet,
}

/// A list given either as an array or as comma separated text.
fn string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Repr>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Repr::List(items)) => items,
        Some(Repr::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Operation-specific parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum OperationKind {
    Create {
        values: Record,
    },
    Get {
        id: RecordId,
        fields: Vec<String>,
    },
    Update {
        id: RecordId,
        values: Record,
    },
    Delete {
        id: RecordId,
    },
    Search {
        filter: FilterSet,
        page: Pagination,
    },
    GetAll {
        filter: FilterSet,
        fields: Vec<String>,
        page: Pagination,
    },
    SearchCount {
        filter: FilterSet,
    },
    Copy {
        id: RecordId,
        defaults: Record,
    },
    Exists {
        id: RecordId,
    },
    NameGet {
        ids: Vec<RecordId>,
    },
    NameSearch {
        name: String,
        filter: FilterSet,
        limit: u64,
    },
    ReadGroup {
        filter: FilterSet,
        query: ReadGroupQuery,
    },
    CheckAccessRights {
        access: AccessKind,
        raise_exception: bool,
    },
}

impl OperationKind {
    pub fn operation(&self) -> Operation {
        match self {
            OperationKind::Create { .. } => Operation::Create,
            OperationKind::Get { .. } => Operation::Get,
            OperationKind::Update { .. } => Operation::Update,
            OperationKind::Delete { .. } => Operation::Delete,
            OperationKind::Search { .. } => Operation::Search,
            OperationKind::GetAll { .. } => Operation::GetAll,
            OperationKind::SearchCount { .. } => Operation::SearchCount,
            OperationKind::Copy { .. } => Operation::Copy,
            OperationKind::Exists { .. } => Operation::Exists,
            OperationKind::NameGet { .. } => Operation::NameGet,
            OperationKind::NameSearch { .. } => Operation::NameSearch,
            OperationKind::ReadGroup { .. } => Operation::ReadGroup,
            OperationKind::CheckAccessRights { .. } => Operation::CheckAccessRights,
        }
    }
}

/// A fully validated request for one input item.
#[derive(Clone, Debug, PartialEq)]
pub struct OperationRequest {
    pub model: ModelName,
    pub kind: OperationKind,
}

impl OperationRequest {
    pub fn new(model: ModelName, kind: OperationKind) -> Self {
        Self { model, kind }
    }

    pub fn operation(&self) -> Operation {
        self.kind.operation()
    }

    /// Read and validate the parameters of one input item.
    ///
    /// Fails with a validation error before anything is sent when a
    /// parameter the operation needs is absent or malformed.
    pub fn from_host<H: Host + ?Sized>(host: &H, item: usize) -> Result<Self> {
        let operation = match host.parameter("operation", item) {
            Some(Value::String(s)) => s.parse::<Operation>()?,
            Some(other) => {
                return Err(ValidationError::InvalidParameter {
                    name: "operation".to_string(),
                    reason: format!("expected a string, got {}", other),
                }
                .into());
            }
            None => {
                return Err(ValidationError::InvalidParameter {
                    name: "operation".to_string(),
                    reason: "must be set".to_string(),
                }
                .into());
            }
        };

        let params = Params {
            host,
            item,
            operation,
        };

        let model = ModelName::new(params.required::<String>("resource")?)?;
        let kind = params.kind()?;

        Ok(Self { model, kind })
    }
}

struct Params<'a, H: Host + ?Sized> {
    host: &'a H,
    item: usize,
    operation: Operation,
}

impl<H: Host + ?Sized> Params<'_, H> {
    fn kind(&self) -> Result<OperationKind> {
        let kind = match self.operation {
            Operation::Create => OperationKind::Create {
                values: self.field_values()?,
            },
            Operation::Get => OperationKind::Get {
                id: self.id()?,
                fields: self.options()?.fields_list,
            },
            Operation::Update => OperationKind::Update {
                id: self.id()?,
                values: self.field_values()?,
            },
            Operation::Delete => OperationKind::Delete { id: self.id()? },
            Operation::Search => OperationKind::Search {
                filter: self.filter()?,
                page: self.pagination()?,
            },
            Operation::GetAll => OperationKind::GetAll {
                filter: self.filter()?,
                fields: self.options()?.fields_list,
                page: self.pagination()?,
            },
            Operation::SearchCount => OperationKind::SearchCount {
                filter: self.filter()?,
            },
            Operation::Copy => OperationKind::Copy {
                id: self.id()?,
                defaults: self.options()?.default_values.into_record(),
            },
            Operation::Exists => OperationKind::Exists { id: self.id()? },
            Operation::NameGet => OperationKind::NameGet { ids: self.ids()? },
            Operation::NameSearch => {
                let options = self.options()?;
                OperationKind::NameSearch {
                    name: self.optional::<String>("name")?.unwrap_or_default(),
                    filter: options.filter_request,
                    limit: options
                        .limit
                        .filter(|l| *l > 0)
                        .unwrap_or(DEFAULT_NAME_SEARCH_LIMIT),
                }
            }
            Operation::ReadGroup => {
                let options = self.options()?;
                OperationKind::ReadGroup {
                    filter: self.filter()?,
                    query: ReadGroupQuery {
                        fields: options.fields_list,
                        group_by: options.group_by,
                        offset: options.offset.unwrap_or(0),
                        limit: options.limit.filter(|l| *l > 0),
                        order_by: options.order_by.filter(|o| !o.trim().is_empty()),
                        lazy: options.lazy.unwrap_or(true),
                    },
                }
            }
            Operation::CheckAccessRights => OperationKind::CheckAccessRights {
                access: self.optional("accessOperation")?.unwrap_or_default(),
                raise_exception: self.options()?.raise_exception,
            },
        };
        Ok(kind)
    }

    fn raw(&self, name: &str) -> Option<Value> {
        self.host
            .parameter(name, self.item)
            .filter(|value| !value.is_null())
    }

    fn optional<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.raw(name)
            .map(|value| {
                serde_json::from_value(value).map_err(|e| {
                    Error::from(ValidationError::InvalidParameter {
                        name: name.to_string(),
                        reason: e.to_string(),
                    })
                })
            })
            .transpose()
    }

    fn required<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        self.optional(name)?.ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> Error {
        ValidationError::MissingParameter {
            name: name.to_string(),
            operation: self.operation.to_string(),
        }
        .into()
    }

    fn id(&self) -> Result<RecordId> {
        match self.raw("id") {
            None => Err(self.missing("id")),
            Some(Value::String(s)) if s.trim().is_empty() => Err(self.missing("id")),
            Some(value) => RecordId::from_value(&value),
        }
    }

    fn ids(&self) -> Result<Vec<RecordId>> {
        let ids = match self.raw("ids") {
            None => Vec::new(),
            Some(Value::String(s)) => RecordId::parse_list(&s)?,
            Some(Value::Array(items)) => items
                .iter()
                .map(RecordId::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(value) => vec![RecordId::from_value(&value)?],
        };
        if ids.is_empty() {
            return Err(self.missing("ids"));
        }
        Ok(ids)
    }

    fn field_values(&self) -> Result<Record> {
        Ok(self
            .optional::<FieldValues>("fieldsToCreateOrUpdate")?
            .unwrap_or_default()
            .into_record())
    }

    fn filter(&self) -> Result<FilterSet> {
        Ok(self.optional("filterRequest")?.unwrap_or_default())
    }

    fn options(&self) -> Result<Options> {
        Ok(self.optional("options")?.unwrap_or_default())
    }

    fn pagination(&self) -> Result<Pagination> {
        if self.optional::<bool>("returnAll")?.unwrap_or(false) {
            return Ok(Pagination::All);
        }
        Ok(Pagination::Page {
            offset: self.optional("offset")?.unwrap_or(0),
            limit: self.optional("limit")?.unwrap_or(DEFAULT_LIMIT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Credentials;
    use crate::filter::FilterOperator;
    use async_trait::async_trait;
    use serde_json::json;

    struct OneItem(Value);

    #[async_trait]
    impl Host for OneItem {
        fn item_count(&self) -> usize {
            1
        }

        fn parameter(&self, name: &str, _item: usize) -> Option<Value> {
            self.0.get(name).cloned()
        }

        async fn credentials(&self) -> Result<Credentials> {
            unreachable!("not used by request parsing")
        }

        fn continue_on_fail(&self) -> bool {
            false
        }
    }

    fn parse(params: Value) -> Result<OperationRequest> {
        OperationRequest::from_host(&OneItem(params), 0)
    }

    #[test]
    fn create_collapses_name_value_collection() {
        let request = parse(json!({
            "resource": "res.partner",
            "operation": "create",
            "fieldsToCreateOrUpdate": {"fields": [
                {"fieldName": "name", "fieldValue": "Acme"},
                {"fieldName": "city", "fieldValue": "Ghent"},
                {"fieldName": "name", "fieldValue": "Acme NV"}
            ]}
        }))
        .unwrap();

        let OperationKind::Create { values } = request.kind else {
            panic!("expected create");
        };
        assert_eq!(values.get("name"), Some(&json!("Acme NV")));
        assert_eq!(values.get("city"), Some(&json!("Ghent")));
    }

    #[test]
    fn update_accepts_plain_object() {
        let request = parse(json!({
            "resource": "res.partner",
            "operation": "update",
            "id": "12",
            "fieldsToCreateOrUpdate": {"email": "a@b.c"}
        }))
        .unwrap();
        assert_eq!(
            request.kind,
            OperationKind::Update {
                id: RecordId::new(12).unwrap(),
                values: json!({"email": "a@b.c"}).as_object().unwrap().clone(),
            }
        );
    }

    #[test]
    fn get_without_id_is_a_validation_error() {
        let err = parse(json!({"resource": "res.partner", "operation": "get", "id": ""}))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingParameter { ref name, .. }) if name == "id"
        ));
    }

    #[test]
    fn missing_resource_is_reported() {
        let err = parse(json!({"operation": "searchCount"})).unwrap_err();
        assert!(err.to_string().contains("resource"));
    }

    #[test]
    fn search_pagination() {
        let paged = parse(json!({
            "resource": "res.partner",
            "operation": "search",
            "offset": 10,
            "limit": 5,
            "filterRequest": {"filter": [{"fieldName": "age", "operator": "greaterThen", "value": "18"}]}
        }))
        .unwrap();
        let OperationKind::Search { filter, page } = paged.kind else {
            panic!("expected search");
        };
        assert_eq!(page, Pagination::Page { offset: 10, limit: 5 });
        assert_eq!(filter.conditions()[0].operator, FilterOperator::GreaterThen);

        let all = parse(json!({"resource": "res.partner", "operation": "getAll", "returnAll": true}))
            .unwrap();
        assert!(matches!(all.kind, OperationKind::GetAll { page: Pagination::All, .. }));

        let default = parse(json!({"resource": "res.partner", "operation": "getAll"})).unwrap();
        assert!(matches!(
            default.kind,
            OperationKind::GetAll { page: Pagination::Page { offset: 0, limit: DEFAULT_LIMIT }, .. }
        ));
    }

    #[test]
    fn name_get_splits_ids() {
        let request = parse(json!({"resource": "res.partner", "operation": "nameGet", "ids": "1, 2,3"}))
            .unwrap();
        let OperationKind::NameGet { ids } = request.kind else {
            panic!("expected nameGet");
        };
        assert_eq!(ids.len(), 3);

        assert!(parse(json!({"resource": "res.partner", "operation": "nameGet", "ids": " "})).is_err());
    }

    #[test]
    fn read_group_defaults() {
        let request = parse(json!({
            "resource": "sale.order",
            "operation": "readGroup",
            "options": {"fieldsList": ["amount_total"], "groupBy": "partner_id, state", "orderBy": ""}
        }))
        .unwrap();
        let OperationKind::ReadGroup { query, .. } = request.kind else {
            panic!("expected readGroup");
        };
        assert_eq!(query.group_by, vec!["partner_id", "state"]);
        assert!(query.lazy);
        assert_eq!(query.limit, None);
        assert_eq!(query.order_by, None);
    }

    #[test]
    fn name_search_uses_option_filter_and_limit() {
        let request = parse(json!({
            "resource": "res.partner",
            "operation": "nameSearch",
            "name": "Acme",
            "options": {"filterRequest": {"filter": [{"fieldName": "is_company", "value": true}]}}
        }))
        .unwrap();
        let OperationKind::NameSearch { name, filter, limit } = request.kind else {
            panic!("expected nameSearch");
        };
        assert_eq!(name, "Acme");
        assert_eq!(filter.conditions().len(), 1);
        assert_eq!(limit, DEFAULT_NAME_SEARCH_LIMIT);
    }

    #[test]
    fn check_access_rights_options() {
        let request = parse(json!({
            "resource": "res.partner",
            "operation": "checkAccessRights",
            "accessOperation": "unlink",
            "options": {"raiseException": true}
        }))
        .unwrap();
        assert_eq!(
            request.kind,
            OperationKind::CheckAccessRights {
                access: AccessKind::Unlink,
                raise_exception: true,
            }
        );
    }

    #[test]
    fn copy_default_values() {
        let request = parse(json!({
            "resource": "res.partner",
            "operation": "copy",
            "id": 4,
            "options": {"defaultValues": {"fields": [{"fieldName": "name", "fieldValue": "Copy"}]}}
        }))
        .unwrap();
        let OperationKind::Copy { defaults, .. } = request.kind else {
            panic!("expected copy");
        };
        assert_eq!(defaults.get("name"), Some(&json!("Copy")));
    }
}
