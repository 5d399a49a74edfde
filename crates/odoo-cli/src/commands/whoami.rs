//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::credentials::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(_args: WhoamiArgs) -> Result<()> {
    let credentials = storage::require_credentials()?;

    output::field("URL", credentials.url().base());
    output::field("Database", credentials.database().unwrap_or("(discovered)"));
    output::field("Username", credentials.username());

    Ok(())
}
