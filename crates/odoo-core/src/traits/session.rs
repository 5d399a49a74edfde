//! Authenticated session trait.

use async_trait::async_trait;

use crate::Result;
use crate::filter::Domain;
use crate::operation::{AccessKind, DisplayName, Pagination, ReadGroupQuery, Record};
use crate::types::{ModelName, RecordId};

/// An authenticated session against one database.
///
/// Implementations return honest types: absent records are empty lists,
/// never protocol sentinels.
#[async_trait]
pub trait Session: Send + Sync {
    /// Database this session is bound to.
    fn database(&self) -> &str;

    /// Opaque user id resolved at login.
    fn user_id(&self) -> i64;

    /// Create a record and return its id.
    async fn create(&self, model: &ModelName, values: &Record) -> Result<RecordId>;

    /// Read records by id. Ids that do not exist are simply absent.
    async fn read(
        &self,
        model: &ModelName,
        ids: &[RecordId],
        fields: &[String],
    ) -> Result<Vec<Record>>;

    async fn write(&self, model: &ModelName, id: RecordId, values: &Record) -> Result<bool>;

    async fn unlink(&self, model: &ModelName, id: RecordId) -> Result<bool>;

    /// Ids of records matching `domain`.
    async fn search(
        &self,
        model: &ModelName,
        domain: &Domain,
        page: Pagination,
    ) -> Result<Vec<RecordId>>;

    /// Records matching `domain`, projected to `fields` (all when empty).
    async fn search_read(
        &self,
        model: &ModelName,
        domain: &Domain,
        fields: &[String],
        page: Pagination,
    ) -> Result<Vec<Record>>;

    async fn search_count(&self, model: &ModelName, domain: &Domain) -> Result<u64>;

    /// Duplicate a record, overriding `defaults`, and return the new id.
    async fn copy(&self, model: &ModelName, id: RecordId, defaults: &Record) -> Result<RecordId>;

    /// Whether a record with this id exists.
    async fn exists(&self, model: &ModelName, id: RecordId) -> Result<bool> {
        Ok(self.search_count(model, &Domain::id_equals(id)).await? > 0)
    }

    async fn name_get(&self, model: &ModelName, ids: &[RecordId]) -> Result<Vec<DisplayName>>;

    async fn name_search(
        &self,
        model: &ModelName,
        name: &str,
        domain: &Domain,
        limit: u64,
    ) -> Result<Vec<DisplayName>>;

    async fn read_group(
        &self,
        model: &ModelName,
        domain: &Domain,
        query: &ReadGroupQuery,
    ) -> Result<Vec<Record>>;

    /// Probe the current user's access. With `raise_exception` a denial is
    /// an error instead of `false`.
    async fn check_access_rights(
        &self,
        model: &ModelName,
        access: AccessKind,
        raise_exception: bool,
    ) -> Result<bool>;
}
