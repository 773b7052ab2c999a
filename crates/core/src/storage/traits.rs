use async_trait::async_trait;

use super::{AttributeMap, Consistency, Page, PutCondition, QueryRequest, Result, ScanRequest};

/// Physical key-value backend the single-table store runs on.
///
/// Implementations must evaluate [`PutCondition`]s atomically with the write.
/// A failed `NotExists` condition is reported as
/// [`RepositoryError::AlreadyExists`](super::RepositoryError::AlreadyExists), a
/// failed `VersionEquals` condition as
/// [`RepositoryError::Conflict`](super::RepositoryError::Conflict). The store
/// re-labels both with the record type and key it was writing.
#[async_trait]
pub trait TableBackend: Send + Sync {
    /// Point lookup by primary key.
    async fn get_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
        consistency: Consistency,
    ) -> Result<Option<AttributeMap>>;

    /// Writes a full item, optionally under a condition.
    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
        condition: Option<PutCondition>,
    ) -> Result<()>;

    /// Deletes by primary key. Deleting a missing item is not an error.
    async fn delete_item(&self, table_name: &str, key: &AttributeMap) -> Result<()>;

    /// Fetches one page of a partition query, starting after `start`.
    async fn query_page(&self, request: &QueryRequest, start: Option<AttributeMap>)
        -> Result<Page>;

    /// Fetches one page of a table scan, starting after `start`.
    async fn scan_page(&self, request: &ScanRequest, start: Option<AttributeMap>) -> Result<Page>;

    /// Writes items in bulk. Returns the items that were not applied.
    async fn batch_put(
        &self,
        table_name: &str,
        items: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>>;

    /// Deletes keys in bulk. Returns the keys that were not applied.
    async fn batch_delete(
        &self,
        table_name: &str,
        keys: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>>;
}
