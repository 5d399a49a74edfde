//! Routing a validated request to its session call.

use tracing::{debug, instrument};

use crate::Result;
use crate::operation::{OperationKind, OperationRequest, OperationResult};
use crate::traits::Session;

/// Run one request against a session and shape the result.
///
/// Filters are translated before the session is called, so a malformed
/// filter never reaches the server.
#[instrument(skip(session, request), fields(model = %request.model, operation = %request.operation()))]
pub async fn perform<S>(session: &S, request: &OperationRequest) -> Result<OperationResult>
where
    S: Session + ?Sized,
{
    let model = &request.model;
    debug!("dispatching operation");

    let result = match &request.kind {
        OperationKind::Create { values } => {
            OperationResult::Created(session.create(model, values).await?)
        }
        OperationKind::Get { id, fields } => {
            OperationResult::Records(session.read(model, &[*id], fields).await?)
        }
        OperationKind::Update { id, values } => OperationResult::Written {
            id: *id,
            success: session.write(model, *id, values).await?,
        },
        OperationKind::Delete { id } => OperationResult::Written {
            id: *id,
            success: session.unlink(model, *id).await?,
        },
        OperationKind::Search { filter, page } => {
            let domain = filter.translate()?;
            OperationResult::Ids(session.search(model, &domain, *page).await?)
        }
        OperationKind::GetAll {
            filter,
            fields,
            page,
        } => {
            let domain = filter.translate()?;
            OperationResult::Records(session.search_read(model, &domain, fields, *page).await?)
        }
        OperationKind::SearchCount { filter } => {
            let domain = filter.translate()?;
            OperationResult::Count(session.search_count(model, &domain).await?)
        }
        OperationKind::Copy { id, defaults } => {
            OperationResult::Created(session.copy(model, *id, defaults).await?)
        }
        OperationKind::Exists { id } => OperationResult::Exists {
            id: *id,
            exists: session.exists(model, *id).await?,
        },
        OperationKind::NameGet { ids } => {
            OperationResult::Names(session.name_get(model, ids).await?)
        }
        OperationKind::NameSearch {
            name,
            filter,
            limit,
        } => {
            let domain = filter.translate()?;
            OperationResult::Names(session.name_search(model, name, &domain, *limit).await?)
        }
        OperationKind::ReadGroup { filter, query } => {
            let domain = filter.translate()?;
            OperationResult::Records(session.read_group(model, &domain, query).await?)
        }
        OperationKind::CheckAccessRights {
            access,
            raise_exception,
        } => OperationResult::Access {
            access: *access,
            allowed: session
                .check_access_rights(model, *access, *raise_exception)
                .await?,
        },
    };

    Ok(result)
}
