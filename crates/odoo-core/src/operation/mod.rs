//! Operations a host can request and the typed shapes they carry.

mod request;
mod result;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

pub use request::{
    AccessKind, FieldValues, OperationKind, OperationRequest, Options, Pagination, ReadGroupQuery,
};
pub use result::{DisplayName, OperationResult, Record};

/// The supported operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Create,
    Get,
    Update,
    Delete,
    Search,
    GetAll,
    SearchCount,
    Copy,
    Exists,
    NameGet,
    NameSearch,
    ReadGroup,
    CheckAccessRights,
}

impl Operation {
    /// Every operation, in catalogue order.
    pub const ALL: [Operation; 13] = [
        Operation::Create,
        Operation::Get,
        Operation::Update,
        Operation::Delete,
        Operation::Search,
        Operation::GetAll,
        Operation::SearchCount,
        Operation::Copy,
        Operation::Exists,
        Operation::NameGet,
        Operation::NameSearch,
        Operation::ReadGroup,
        Operation::CheckAccessRights,
    ];

    /// Configuration value used by hosts.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::GetAll => "getAll",
            Operation::SearchCount => "searchCount",
            Operation::Copy => "copy",
            Operation::Exists => "exists",
            Operation::NameGet => "nameGet",
            Operation::NameSearch => "nameSearch",
            Operation::ReadGroup => "readGroup",
            Operation::CheckAccessRights => "checkAccessRights",
        }
    }

    /// Model method invoked through `execute_kw`.
    pub fn rpc_method(self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Get => "read",
            Operation::Update => "write",
            Operation::Delete => "unlink",
            Operation::Search => "search",
            Operation::GetAll => "search_read",
            Operation::SearchCount | Operation::Exists => "search_count",
            Operation::Copy => "copy",
            Operation::NameGet => "name_get",
            Operation::NameSearch => "name_search",
            Operation::ReadGroup => "read_group",
            Operation::CheckAccessRights => "check_access_rights",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Operation::Create => "Create",
            Operation::Get => "Read",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Search => "Search",
            Operation::GetAll => "Get Many",
            Operation::SearchCount => "Search Count",
            Operation::Copy => "Copy",
            Operation::Exists => "Exists",
            Operation::NameGet => "Name Get",
            Operation::NameSearch => "Name Search",
            Operation::ReadGroup => "Read Group",
            Operation::CheckAccessRights => "Check Access Rights",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Operation::Create => "Create a new record",
            Operation::Get => "Read a specific record by ID",
            Operation::Update => "Update an existing record",
            Operation::Delete => "Delete a record",
            Operation::Search => "Search for record IDs matching criteria",
            Operation::GetAll => "Search and read records matching criteria",
            Operation::SearchCount => "Count records matching search criteria",
            Operation::Copy => "Duplicate an existing record",
            Operation::Exists => "Check if a record exists",
            Operation::NameGet => "Get display names for record IDs",
            Operation::NameSearch => "Search records by name/display text",
            Operation::ReadGroup => "Read grouped and aggregated data",
            Operation::CheckAccessRights => "Check user access rights for operations",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| {
                ValidationError::UnknownOperation {
                    value: s.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_catalogue_entry() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn serde_names_match_config_values() {
        for op in Operation::ALL {
            let json = serde_json::to_value(op).unwrap();
            assert_eq!(json, serde_json::Value::String(op.as_str().to_string()));
        }
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let err = "archive".parse::<Operation>().unwrap_err();
        assert!(err.to_string().contains("archive"));
    }

    #[test]
    fn rpc_methods() {
        assert_eq!(Operation::Get.rpc_method(), "read");
        assert_eq!(Operation::GetAll.rpc_method(), "search_read");
        assert_eq!(Operation::Delete.rpc_method(), "unlink");
        assert_eq!(Operation::Exists.rpc_method(), "search_count");
    }
}
