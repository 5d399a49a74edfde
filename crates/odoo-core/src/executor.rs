//! The execution loop.
//!
//! Items are processed one at a time, in input order, against a single
//! session resolved before the loop starts.

use serde_json::Value;
use tracing::{Instrument, debug, info_span, warn};

use crate::Result;
use crate::dispatch;
use crate::operation::{OperationRequest, Record};
use crate::traits::{Host, Session};

/// Process every input item and collect one flat list of output records.
///
/// A failing item either becomes an `{"error": message}` record (when the
/// host allows continuing) or aborts the batch with the original error.
pub async fn run_items<S, H>(session: &S, host: &H) -> Result<Vec<Record>>
where
    S: Session + ?Sized,
    H: Host + ?Sized,
{
    let count = host.item_count();
    let mut output = Vec::new();

    for item in 0..count {
        let span = info_span!("item", index = item);
        let outcome = async {
            let request = OperationRequest::from_host(host, item)?;
            dispatch::perform(session, &request).await
        }
        .instrument(span)
        .await;

        match outcome {
            Ok(result) => {
                let records = result.into_records();
                debug!(item, produced = records.len(), "item succeeded");
                output.extend(records);
            }
            Err(err) if host.continue_on_fail() => {
                warn!(item, error = %err, "item failed, continuing");
                output.push(error_record(&err.to_string()));
            }
            Err(err) => {
                warn!(item, error = %err, "item failed, aborting batch");
                return Err(err);
            }
        }
    }

    Ok(output)
}

/// The substitute record for a failed item.
pub fn error_record(message: &str) -> Record {
    let mut record = Record::new();
    record.insert("error".to_string(), Value::String(message.to_string()));
    record
}
