//! Credential storage in the platform data directory.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use odoo_core::Credentials;

use super::StoredCredentials;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// Get the credentials file path.
fn credentials_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "odoo").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("credentials.json"))
}

/// Save credentials to disk.
pub fn save_credentials(credentials: &Credentials) -> Result<()> {
    let path = credentials_path()?;
    let json = serde_json::to_string_pretty(&StoredCredentials::from(credentials))?;

    write_private(&path, json.as_bytes()).context("Failed to write credentials file")?;
    tracing::debug!(path = %path.display(), "Saved credentials");

    Ok(())
}

/// Write `contents` to a file only the owner can read.
///
/// On Unix a new file is created with mode 0600, and an existing file is
/// narrowed to 0600 before anything is written to it.
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;

    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;

    file.write_all(contents)
}

/// Load credentials from disk, if any were saved.
pub fn load_credentials() -> Result<Option<Credentials>> {
    let path = credentials_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read credentials file")?;
    let stored: StoredCredentials =
        serde_json::from_str(&json).context("Invalid credentials file")?;

    stored.into_credentials().map(Some)
}

/// Load credentials or fail with a hint to log in.
pub fn require_credentials() -> Result<Credentials> {
    load_credentials()?.context("No stored credentials. Run 'odoo login' first.")
}

/// Remove stored credentials. Returns whether a file was removed.
pub fn clear_credentials() -> Result<bool> {
    let path = credentials_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove credentials file")?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_private_round_trips_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        write_private(&path, b"{\"password\":\"first\"}").unwrap();
        write_private(&path, b"{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[cfg(unix)]
    #[test]
    fn write_private_creates_owner_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        write_private(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn write_private_narrows_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&path, b"{}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
