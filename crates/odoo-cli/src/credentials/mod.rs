//! Persisted connection credentials.

pub mod storage;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use odoo_core::{Credentials, ServerUrl};

/// Credentials as written to disk.
#[derive(Serialize, Deserialize)]
pub struct StoredCredentials {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub username: String,
    pub password: String,
}

impl StoredCredentials {
    pub fn into_credentials(self) -> Result<Credentials> {
        let url = ServerUrl::new(&self.url).context("Invalid server URL in credentials file")?;
        Ok(Credentials::new(
            url,
            self.database,
            self.username,
            self.password,
        ))
    }
}

impl From<&Credentials> for StoredCredentials {
    fn from(credentials: &Credentials) -> Self {
        Self {
            url: credentials.url().to_string(),
            database: credentials.database().map(str::to_string),
            username: credentials.username().to_string(),
            password: credentials.password().to_string(),
        }
    }
}
