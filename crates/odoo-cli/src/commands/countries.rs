//! Countries command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct CountriesArgs {}

pub async fn run(_args: CountriesArgs) -> Result<()> {
    let session = super::connect().await?;
    let countries = session
        .list_countries()
        .await
        .context("Failed to list countries")?;
    output::json_lines(&countries, false)
}
