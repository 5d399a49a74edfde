//! JSON-RPC backed session.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, info, instrument};

use odoo_core::error::AuthError;
use odoo_core::{
    AccessKind, Credentials, DisplayName, Domain, ModelName, Operation, Pagination, ReadGroupQuery,
    Record, RecordId, Result, ServerUrl, Session,
};

use crate::normalize;
use crate::rpc::{
    EXECUTE_KW, JsonRpcClient, LIST_DATABASES, LOGIN, SERVICE_COMMON, SERVICE_DB, SERVICE_OBJECT,
};

/// Page size used when every matching record is requested.
pub(crate) const RETURN_ALL_PAGE_SIZE: u64 = 500;

/// Order used while paging so windows do not overlap.
const PAGING_ORDER: &str = "id";

/// An authenticated session against one database.
///
/// Created once per batch by [`JsonRpcSession::login`] and never mutated
/// afterwards. Clones share the same connection.
#[derive(Clone)]
pub struct JsonRpcSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    client: JsonRpcClient,
    database: String,
    user_id: i64,
    password: String,
}

impl JsonRpcSession {
    /// Resolve the database and authenticate.
    ///
    /// # Errors
    ///
    /// [`AuthError::DatabaseUnresolved`] when no database is configured and
    /// discovery is ambiguous; [`AuthError::AuthenticationFailed`] when the
    /// server returns no user id.
    #[instrument(skip(credentials), fields(url = %credentials.url(), username = %credentials.username()))]
    pub async fn login(credentials: &Credentials) -> Result<Self> {
        info!("Resolving session");

        let client = JsonRpcClient::new(credentials.url().clone())?;
        let database = resolve_database(&client, credentials).await?;

        let response = client
            .call(
                SERVICE_COMMON,
                LOGIN,
                vec![
                    json!(database),
                    json!(credentials.username()),
                    json!(credentials.password()),
                ],
            )
            .await?;

        let user_id = match response.as_i64() {
            Some(uid) if uid > 0 => uid,
            _ => {
                return Err(AuthError::AuthenticationFailed {
                    username: credentials.username().to_string(),
                    database,
                }
                .into());
            }
        };

        debug!(%database, user_id, "Session resolved");

        Ok(Self {
            inner: Arc::new(SessionInner {
                client,
                database,
                user_id,
                password: credentials.password().to_string(),
            }),
        })
    }

    /// Returns the server URL for this session.
    pub fn url(&self) -> &ServerUrl {
        self.inner.client.url()
    }

    /// Call a model method through `execute_kw`.
    ///
    /// Positional arguments are `[db, uid, password, model, method, args, kwargs]`.
    #[instrument(skip(self, args, kwargs), fields(db = %self.inner.database, %model))]
    pub async fn execute_kw(
        &self,
        model: &ModelName,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        debug!(method, "execute_kw");
        self.inner
            .client
            .call(
                SERVICE_OBJECT,
                EXECUTE_KW,
                vec![
                    json!(self.inner.database),
                    json!(self.inner.user_id),
                    json!(self.inner.password),
                    json!(model.as_str()),
                    json!(method),
                    Value::Array(args),
                    Value::Object(kwargs),
                ],
            )
            .await
    }

    async fn search_page(
        &self,
        model: &ModelName,
        domain: &Domain,
        offset: u64,
        limit: u64,
        order: Option<&str>,
    ) -> Result<Vec<RecordId>> {
        let response = self
            .execute_kw(
                model,
                Operation::Search.rpc_method(),
                vec![domain.to_value()],
                page_kwargs(offset, limit, order),
            )
            .await?;
        normalize::ids(response)
    }

    async fn search_read_page(
        &self,
        model: &ModelName,
        domain: &Domain,
        fields: &[String],
        offset: u64,
        limit: u64,
        order: Option<&str>,
    ) -> Result<Vec<Record>> {
        let mut kwargs = page_kwargs(offset, limit, order);
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(fields));
        }
        let response = self
            .execute_kw(model, Operation::GetAll.rpc_method(), vec![domain.to_value()], kwargs)
            .await?;
        normalize::records(response)
    }
}

/// Work out which database to log into.
async fn resolve_database(client: &JsonRpcClient, credentials: &Credentials) -> Result<String> {
    if let Some(db) = credentials.database() {
        return Ok(db.to_string());
    }

    if let Some(hint) = credentials.url().database_hint() {
        debug!(database = hint, "Database derived from host");
        return Ok(hint.to_string());
    }

    let listed = client.call(SERVICE_DB, LIST_DATABASES, Vec::new()).await?;
    let names: Vec<String> = match listed {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    match names.as_slice() {
        [only] => {
            debug!(database = %only, "Database discovered from server");
            Ok(only.clone())
        }
        [] => Err(AuthError::DatabaseUnresolved {
            reason: "no database configured and the server lists none".to_string(),
        }
        .into()),
        many => Err(AuthError::DatabaseUnresolved {
            reason: format!(
                "no database configured and the server lists several: {}",
                many.join(", ")
            ),
        }
        .into()),
    }
}

fn page_kwargs(offset: u64, limit: u64, order: Option<&str>) -> Map<String, Value> {
    let mut kwargs = Map::new();
    kwargs.insert("offset".to_string(), json!(offset));
    kwargs.insert("limit".to_string(), json!(limit));
    if let Some(order) = order {
        kwargs.insert("order".to_string(), json!(order));
    }
    kwargs
}

/// Fetch consecutive pages until a short one arrives.
async fn collect_pages<T, F, Fut>(page_size: u64, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut all = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch(offset).await?;
        let fetched = page.len() as u64;
        all.extend(page);
        if fetched < page_size {
            break;
        }
        offset += fetched;
    }
    debug!(total = all.len(), "Collected all pages");
    Ok(all)
}

#[async_trait]
impl Session for JsonRpcSession {
    fn database(&self) -> &str {
        &self.inner.database
    }

    fn user_id(&self) -> i64 {
        self.inner.user_id
    }

    async fn create(&self, model: &ModelName, values: &Record) -> Result<RecordId> {
        let response = self
            .execute_kw(
                model,
                Operation::Create.rpc_method(),
                vec![Value::Object(values.clone())],
                Map::new(),
            )
            .await?;
        normalize::single_id(response)
    }

    async fn read(
        &self,
        model: &ModelName,
        ids: &[RecordId],
        fields: &[String],
    ) -> Result<Vec<Record>> {
        let mut kwargs = Map::new();
        if !fields.is_empty() {
            kwargs.insert("fields".to_string(), json!(fields));
        }
        let response = self
            .execute_kw(model, Operation::Get.rpc_method(), vec![json!(ids)], kwargs)
            .await?;
        normalize::records(response)
    }

    async fn write(&self, model: &ModelName, id: RecordId, values: &Record) -> Result<bool> {
        let response = self
            .execute_kw(
                model,
                Operation::Update.rpc_method(),
                vec![json!([id]), Value::Object(values.clone())],
                Map::new(),
            )
            .await?;
        normalize::flag(response)
    }

    async fn unlink(&self, model: &ModelName, id: RecordId) -> Result<bool> {
        let response = self
            .execute_kw(model, Operation::Delete.rpc_method(), vec![json!([id])], Map::new())
            .await?;
        normalize::flag(response)
    }

    async fn search(
        &self,
        model: &ModelName,
        domain: &Domain,
        page: Pagination,
    ) -> Result<Vec<RecordId>> {
        match page {
            Pagination::Page { offset, limit } => {
                self.search_page(model, domain, offset, limit, None).await
            }
            Pagination::All => {
                collect_pages(RETURN_ALL_PAGE_SIZE, move |offset| {
                    self.search_page(
                        model,
                        domain,
                        offset,
                        RETURN_ALL_PAGE_SIZE,
                        Some(PAGING_ORDER),
                    )
                })
                .await
            }
        }
    }

    async fn search_read(
        &self,
        model: &ModelName,
        domain: &Domain,
        fields: &[String],
        page: Pagination,
    ) -> Result<Vec<Record>> {
        match page {
            Pagination::Page { offset, limit } => {
                self.search_read_page(model, domain, fields, offset, limit, None)
                    .await
            }
            Pagination::All => {
                collect_pages(RETURN_ALL_PAGE_SIZE, move |offset| {
                    self.search_read_page(
                        model,
                        domain,
                        fields,
                        offset,
                        RETURN_ALL_PAGE_SIZE,
                        Some(PAGING_ORDER),
                    )
                })
                .await
            }
        }
    }

    async fn search_count(&self, model: &ModelName, domain: &Domain) -> Result<u64> {
        let response = self
            .execute_kw(
                model,
                Operation::SearchCount.rpc_method(),
                vec![domain.to_value()],
                Map::new(),
            )
            .await?;
        normalize::count(response)
    }

    /// Counts by id with `active_test` off, so archived records still exist.
    async fn exists(&self, model: &ModelName, id: RecordId) -> Result<bool> {
        let mut kwargs = Map::new();
        kwargs.insert("context".to_string(), json!({"active_test": false}));
        let response = self
            .execute_kw(
                model,
                Operation::Exists.rpc_method(),
                vec![Domain::id_equals(id).to_value()],
                kwargs,
            )
            .await?;
        Ok(normalize::count(response)? > 0)
    }

    async fn copy(&self, model: &ModelName, id: RecordId, defaults: &Record) -> Result<RecordId> {
        let mut kwargs = Map::new();
        if !defaults.is_empty() {
            kwargs.insert("default".to_string(), Value::Object(defaults.clone()));
        }
        let response = self
            .execute_kw(model, Operation::Copy.rpc_method(), vec![json!(id)], kwargs)
            .await?;
        normalize::single_id(response)
    }

    async fn name_get(&self, model: &ModelName, ids: &[RecordId]) -> Result<Vec<DisplayName>> {
        let response = self
            .execute_kw(model, Operation::NameGet.rpc_method(), vec![json!(ids)], Map::new())
            .await?;
        normalize::display_names(response)
    }

    async fn name_search(
        &self,
        model: &ModelName,
        name: &str,
        domain: &Domain,
        limit: u64,
    ) -> Result<Vec<DisplayName>> {
        let mut kwargs = Map::new();
        kwargs.insert("name".to_string(), json!(name));
        kwargs.insert("args".to_string(), domain.to_value());
        kwargs.insert("operator".to_string(), json!("ilike"));
        kwargs.insert("limit".to_string(), json!(limit));
        let response = self
            .execute_kw(model, Operation::NameSearch.rpc_method(), Vec::new(), kwargs)
            .await?;
        normalize::display_names(response)
    }

    async fn read_group(
        &self,
        model: &ModelName,
        domain: &Domain,
        query: &ReadGroupQuery,
    ) -> Result<Vec<Record>> {
        let mut kwargs = Map::new();
        kwargs.insert("offset".to_string(), json!(query.offset));
        if let Some(limit) = query.limit {
            kwargs.insert("limit".to_string(), json!(limit));
        }
        if let Some(order_by) = &query.order_by {
            kwargs.insert("orderby".to_string(), json!(order_by));
        }
        kwargs.insert("lazy".to_string(), json!(query.lazy));

        let response = self
            .execute_kw(
                model,
                Operation::ReadGroup.rpc_method(),
                vec![domain.to_value(), json!(query.fields), json!(query.group_by)],
                kwargs,
            )
            .await?;
        normalize::records(response)
    }

    async fn check_access_rights(
        &self,
        model: &ModelName,
        access: AccessKind,
        raise_exception: bool,
    ) -> Result<bool> {
        let mut kwargs = Map::new();
        kwargs.insert("raise_exception".to_string(), json!(raise_exception));
        let response = self
            .execute_kw(
                model,
                Operation::CheckAccessRights.rpc_method(),
                vec![json!(access.as_str())],
                kwargs,
            )
            .await?;
        normalize::flag(response)
    }
}

impl std::fmt::Debug for JsonRpcSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcSession")
            .field("url", self.inner.client.url())
            .field("database", &self.inner.database)
            .field("user_id", &self.inner.user_id)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
