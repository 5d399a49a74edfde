//! Host trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::{Credentials, Result};

/// The workflow host driving a batch of input items.
#[async_trait]
pub trait Host: Send + Sync {
    /// Number of input items in this batch.
    fn item_count(&self) -> usize;

    /// Look up a named configuration value for one item.
    fn parameter(&self, name: &str, item: usize) -> Option<Value>;

    /// Fetch the stored connection credentials.
    async fn credentials(&self) -> Result<Credentials>;

    /// Whether a failed item is recorded as `{error}` instead of aborting.
    fn continue_on_fail(&self) -> bool;
}
