//! States command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct StatesArgs {}

pub async fn run(_args: StatesArgs) -> Result<()> {
    let session = super::connect().await?;
    let states = session
        .list_states()
        .await
        .context("Failed to list states")?;
    output::json_lines(&states, false)
}
