//! Record id type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// A database record id. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RecordId(i64);

impl RecordId {
    /// Create a record id from an integer.
    pub fn new(id: i64) -> Result<Self, Error> {
        if id <= 0 {
            return Err(ValidationError::RecordId {
                value: id.to_string(),
                reason: "must be a positive integer".to_string(),
            }
            .into());
        }
        Ok(Self(id))
    }

    /// Returns the raw integer.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Parse a comma separated list such as `"1, 2,3"`.
    ///
    /// Empty elements are skipped.
    pub fn parse_list(s: &str) -> Result<Vec<Self>, Error> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::from_str)
            .collect()
    }

    /// Interpret a JSON value (number or numeric string) as an id.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(id) => Self::new(id),
                None => Err(invalid(&n.to_string(), "must be an integer")),
            },
            Value::String(s) => s.parse(),
            other => Err(invalid(&other.to_string(), "must be a number or string")),
        }
    }
}

fn invalid(value: &str, reason: &str) -> Error {
    ValidationError::RecordId {
        value: value.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let id = trimmed
            .parse::<i64>()
            .map_err(|e| invalid(trimmed, &e.to_string()))?;
        Self::new(id)
    }
}

impl TryFrom<i64> for RecordId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::from(id.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
