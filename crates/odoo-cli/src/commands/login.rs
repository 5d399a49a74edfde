//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use odoo_core::{Credentials, ServerUrl, Session};
use odoo_jsonrpc::JsonRpcSession;

use crate::credentials::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Server base URL (e.g. https://acme.odoo.com)
    #[arg(long)]
    pub url: String,

    /// Database name (discovered from the server when omitted)
    #[arg(long)]
    pub database: Option<String>,

    /// Login name
    #[arg(long)]
    pub username: String,

    /// Password or API key
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs) -> Result<()> {
    let url = ServerUrl::new(&args.url).context("Invalid server URL")?;
    let credentials = Credentials::new(url, args.database, args.username, args.password);

    eprintln!("{}", "Testing credentials...".dimmed());

    let session = JsonRpcSession::login(&credentials)
        .await
        .context("Failed to login")?;

    // Pin the resolved database so later runs skip discovery.
    let credentials = Credentials::new(
        credentials.url().clone(),
        Some(session.database().to_string()),
        credentials.username(),
        credentials.password(),
    );
    storage::save_credentials(&credentials).context("Failed to save credentials")?;

    output::success("Logged in successfully");
    println!();
    output::field("URL", credentials.url().base());
    output::field("Database", session.database());
    output::field("User ID", &session.user_id().to_string());

    Ok(())
}
