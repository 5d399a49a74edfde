//! Operations command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use odoo_core::Operation;

#[derive(Args, Debug)]
pub struct OperationsArgs {}

pub fn run(_args: OperationsArgs) -> Result<()> {
    for operation in Operation::ALL {
        println!(
            "{:<18} {:<20} {}",
            operation.as_str().bold(),
            operation.display_name(),
            operation.description()
        );
    }
    Ok(())
}
