//! Run command implementation.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Args;
use serde::Deserialize;
use serde_json::{Map, Value};

use odoo_core::{Credentials, Host};

use crate::credentials::storage;
use crate::output;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a JSON job file
    pub job: PathBuf,

    /// Record failed items as {"error": ...} and keep going
    #[arg(long)]
    pub continue_on_fail: bool,

    /// Pretty-print each output record
    #[arg(long)]
    pub pretty: bool,
}

/// A job file: shared parameters plus per-item overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobFile {
    #[serde(default)]
    parameters: Map<String, Value>,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
    #[serde(default)]
    continue_on_fail: bool,
}

/// Host backed by a job file.
struct JobHost {
    credentials: Credentials,
    shared: Map<String, Value>,
    items: Vec<Map<String, Value>>,
    continue_on_fail: bool,
}

impl JobHost {
    fn new(job: JobFile, credentials: Credentials, continue_on_fail: bool) -> Self {
        // A job without items is a single item made of the shared parameters.
        let items = if job.items.is_empty() {
            vec![Map::new()]
        } else {
            job.items
        };

        Self {
            credentials,
            shared: job.parameters,
            items,
            continue_on_fail: continue_on_fail || job.continue_on_fail,
        }
    }
}

#[async_trait]
impl Host for JobHost {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn parameter(&self, name: &str, item: usize) -> Option<Value> {
        self.items
            .get(item)?
            .get(name)
            .or_else(|| self.shared.get(name))
            .cloned()
    }

    async fn credentials(&self) -> odoo_core::Result<Credentials> {
        Ok(self.credentials.clone())
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}

pub async fn run(args: RunArgs) -> Result<()> {
    let text = fs::read_to_string(&args.job)
        .with_context(|| format!("Failed to read job file {}", args.job.display()))?;
    let job: JobFile = serde_json::from_str(&text).context("Invalid job file")?;

    let credentials = storage::require_credentials()?;
    let host = JobHost::new(job, credentials, args.continue_on_fail);
    tracing::debug!(
        items = host.item_count(),
        continue_on_fail = host.continue_on_fail(),
        "Running job"
    );

    let records = odoo_jsonrpc::execute(&host).await.context("Job failed")?;

    output::json_lines(&records, args.pretty)?;

    let failed = records.iter().filter(|r| r.contains_key("error")).count();
    if failed > 0 {
        output::warning(&format!("{} item(s) failed", failed));
    }

    Ok(())
}
