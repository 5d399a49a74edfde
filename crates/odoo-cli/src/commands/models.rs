//! Models command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct ModelsArgs {
    /// Pretty-print each model
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: ModelsArgs) -> Result<()> {
    let session = super::connect().await?;
    let models = session.list_models().await.context("Failed to list models")?;
    output::json_lines(&models, args.pretty)
}
