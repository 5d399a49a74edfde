//! Filter translation.
//!
//! Hosts describe search criteria as an ordered list of
//! `{fieldName, operator, value}` conditions. The server expects a *domain*:
//! a list of `[field, symbol, value]` terms combined under implicit AND.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;
use crate::error::ValidationError;
use crate::types::RecordId;

/// Comparison operator of a filter condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    #[default]
    Equal,
    NotEqual,
    LesserThen,
    LesserOrEqual,
    GreaterThen,
    GreaterOrEqual,
    Like,
    In,
    NotIn,
    ChildOf,
}

impl FilterOperator {
    /// Domain symbol sent to the server.
    pub fn symbol(self) -> &'static str {
        match self {
            FilterOperator::Equal => "=",
            FilterOperator::NotEqual => "!=",
            FilterOperator::LesserThen => "<",
            FilterOperator::LesserOrEqual => "<=",
            FilterOperator::GreaterThen => ">",
            FilterOperator::GreaterOrEqual => ">=",
            FilterOperator::Like => "like",
            FilterOperator::In => "in",
            FilterOperator::NotIn => "not in",
            FilterOperator::ChildOf => "child_of",
        }
    }

    /// Whether the operator compares against a list of values.
    pub fn takes_list(self) -> bool {
        matches!(self, FilterOperator::In | FilterOperator::NotIn)
    }
}

/// A single `(field, operator, value)` condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(rename = "fieldName", alias = "field")]
    pub field: String,
    #[serde(default)]
    pub operator: FilterOperator,
    #[serde(default)]
    pub value: Value,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    fn to_term(&self) -> Result<DomainTerm> {
        let field = self.field.trim();
        if field.is_empty() {
            return Err(ValidationError::Filter {
                field: self.field.clone(),
                reason: "field name must not be empty".to_string(),
            }
            .into());
        }

        let value = if self.operator.takes_list() {
            self.list_value(field)?
        } else {
            self.scalar_value(field)?
        };

        Ok(DomainTerm(field.to_string(), self.operator.symbol(), value))
    }

    fn list_value(&self, field: &str) -> Result<Value> {
        match &self.value {
            Value::String(s) => Ok(Value::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(|part| Value::String(part.to_string()))
                    .collect(),
            )),
            Value::Array(items) => Ok(Value::Array(items.clone())),
            Value::Null => Ok(Value::Array(Vec::new())),
            Value::Object(_) => Err(ValidationError::Filter {
                field: field.to_string(),
                reason: format!("operator '{}' expects a list", self.operator.symbol()),
            }
            .into()),
            scalar => Ok(Value::Array(vec![scalar.clone()])),
        }
    }

    fn scalar_value(&self, field: &str) -> Result<Value> {
        match &self.value {
            Value::Array(_) | Value::Object(_) => Err(ValidationError::Filter {
                field: field.to_string(),
                reason: format!("operator '{}' expects a single value", self.operator.symbol()),
            }
            .into()),
            scalar => Ok(scalar.clone()),
        }
    }
}

/// Ordered conditions, combined by conjunction.
///
/// Deserializes from either a bare list of conditions or the host's
/// collection shape `{"filter": [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FilterSetRepr")]
pub struct FilterSet(Vec<FilterCondition>);

#[derive(Deserialize)]
#[serde(untagged)]
enum FilterSetRepr {
    List(Vec<FilterCondition>),
    Collection {
        #[serde(default)]
        filter: Vec<FilterCondition>,
    },
}

impl From<FilterSetRepr> for FilterSet {
    fn from(repr: FilterSetRepr) -> Self {
        match repr {
            FilterSetRepr::List(conditions) | FilterSetRepr::Collection { filter: conditions } => {
                Self(conditions)
            }
        }
    }
}

impl FilterSet {
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self(conditions)
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Translate into the server's domain syntax, one term per condition.
    pub fn translate(&self) -> Result<Domain> {
        self.0
            .iter()
            .map(FilterCondition::to_term)
            .collect::<Result<Vec<_>>>()
            .map(Domain)
    }
}

impl FromIterator<FilterCondition> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FilterCondition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One `[field, symbol, value]` domain term. Serializes as a 3-element array.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DomainTerm(String, &'static str, Value);

impl DomainTerm {
    pub fn field(&self) -> &str {
        &self.0
    }

    pub fn symbol(&self) -> &'static str {
        self.1
    }

    pub fn value(&self) -> &Value {
        &self.2
    }
}

/// A translated search domain. Empty matches every record.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Domain(Vec<DomainTerm>);

impl Domain {
    /// Domain matching a single record by id.
    pub fn id_equals(id: RecordId) -> Self {
        Self(vec![DomainTerm("id".to_string(), "=", Value::from(id))])
    }

    pub fn terms(&self) -> &[DomainTerm] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON form used as a call argument.
    pub fn to_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|term| {
                    Value::Array(vec![
                        Value::String(term.0.clone()),
                        Value::String(term.1.to_string()),
                        term.2.clone(),
                    ])
                })
                .collect(),
        )
    }
}
