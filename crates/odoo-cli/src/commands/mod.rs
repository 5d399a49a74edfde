//! Subcommand implementations.

mod countries;
mod fields;
mod login;
mod logout;
mod models;
mod operations;
mod run;
mod states;
mod whoami;

use anyhow::{Context, Result};
use clap::Subcommand;

use odoo_jsonrpc::JsonRpcSession;

use crate::credentials::storage;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test and store connection credentials
    Login(login::LoginArgs),

    /// Remove stored credentials
    Logout(logout::LogoutArgs),

    /// Display the stored connection
    Whoami(whoami::WhoamiArgs),

    /// Run a job file through the connector
    Run(run::RunArgs),

    /// List installed models
    Models(models::ModelsArgs),

    /// List the fields of a model
    Fields(fields::FieldsArgs),

    /// List countries
    Countries(countries::CountriesArgs),

    /// List country states
    States(states::StatesArgs),

    /// List supported operations
    Operations(operations::OperationsArgs),
}

pub async fn handle(command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(args).await,
        Commands::Logout(args) => logout::run(args),
        Commands::Whoami(args) => whoami::run(args),
        Commands::Run(args) => run::run(args).await,
        Commands::Models(args) => models::run(args).await,
        Commands::Fields(args) => fields::run(args).await,
        Commands::Countries(args) => countries::run(args).await,
        Commands::States(args) => states::run(args).await,
        Commands::Operations(args) => operations::run(args),
    }
}

/// Log in with the stored credentials.
async fn connect() -> Result<JsonRpcSession> {
    let credentials = storage::require_credentials()?;
    JsonRpcSession::login(&credentials)
        .await
        .context("Failed to connect")
}
