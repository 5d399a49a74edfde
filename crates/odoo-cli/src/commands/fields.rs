//! Fields command implementation.

use anyhow::{Context, Result};
use clap::Args;

use odoo_core::ModelName;

use crate::output;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Technical model name (e.g. res.partner)
    pub model: String,

    /// Pretty-print each field
    #[arg(long)]
    pub pretty: bool,
}

pub async fn run(args: FieldsArgs) -> Result<()> {
    let model = ModelName::new(&args.model).context("Invalid model name")?;
    let session = super::connect().await?;
    let fields = session
        .fields_get(&model)
        .await
        .context("Failed to fetch fields")?;
    output::json_lines(&fields, args.pretty)
}
