//! Batch entry point.

use tracing::{info, instrument};

use odoo_core::executor::run_items;
use odoo_core::{Host, Record, Result};

use crate::session::JsonRpcSession;

/// Resolve a session from the host's credentials and process every item.
///
/// Session failures abort before any item is touched.
#[instrument(skip(host), fields(items = host.item_count()))]
pub async fn execute<H: Host + ?Sized>(host: &H) -> Result<Vec<Record>> {
    let credentials = host.credentials().await?;
    let session = JsonRpcSession::login(&credentials).await?;

    let records = run_items(&session, host).await?;
    info!(records = records.len(), "Batch complete");
    Ok(records)
}
