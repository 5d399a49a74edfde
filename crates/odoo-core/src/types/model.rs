//! Model name type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// A validated model name such as `res.partner` or `x_custom.model`.
///
/// Model names are dot-separated segments of lowercase ASCII letters,
/// digits and underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelName(String);

impl ModelName {
    /// Create a new model name, validating the format.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Returns the model name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(s: &str) -> Result<(), Error> {
        let invalid = |reason: &str| {
            Error::from(ValidationError::Model {
                value: s.to_string(),
                reason: reason.to_string(),
            })
        };

        if s.is_empty() {
            return Err(invalid("must not be empty"));
        }

        for segment in s.split('.') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
            {
                return Err(invalid(
                    "segments may only contain lowercase letters, digits and underscores",
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ModelName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ModelName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ModelName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_models() {
        assert!(ModelName::new("res.partner").is_ok());
        assert!(ModelName::new("sale.order.line").is_ok());
        assert!(ModelName::new("x_studio_model").is_ok());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(ModelName::new(" res.partner ").unwrap().as_str(), "res.partner");
    }

    #[test]
    fn invalid_models() {
        assert!(ModelName::new("").is_err());
        assert!(ModelName::new("res..partner").is_err());
        assert!(ModelName::new(".res").is_err());
        assert!(ModelName::new("Res.Partner").is_err());
        assert!(ModelName::new("res partner").is_err());
    }
}
