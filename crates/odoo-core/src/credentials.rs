//! Connection credentials type.

use std::fmt;

use crate::types::ServerUrl;

/// Stored connection credentials for an Odoo server.
///
/// # Security
///
/// The password is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use odoo_core::{Credentials, ServerUrl};
///
/// let url = ServerUrl::new("https://acme.odoo.com").unwrap();
/// let creds = Credentials::new(url, None, "admin", "secret");
/// assert_eq!(creds.username(), "admin");
/// assert!(creds.database().is_none());
/// ```
#[derive(Clone)]
pub struct Credentials {
    url: ServerUrl,
    database: Option<String>,
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// An empty or whitespace-only database is treated as absent, which
    /// triggers discovery during session resolution.
    pub fn new(
        url: ServerUrl,
        database: Option<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let database = database
            .map(|db| db.trim().to_string())
            .filter(|db| !db.is_empty());

        Self {
            url,
            database,
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the server URL.
    pub fn url(&self) -> &ServerUrl {
        &self.url
    }

    /// Returns the configured database, if any.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// Returns the login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// Only use this when building authentication or call envelopes.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
