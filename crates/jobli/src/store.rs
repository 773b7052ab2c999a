//! Generic CRUD and query engine over a [`TableBackend`].
//!
//! The store derives and injects key attributes, stamps audit attributes,
//! drains pagination and strips key attributes before anything is returned.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use jobli_core::record::codec::{
    format_timestamp, get_optional_u64, ATTR_CREATED_BY, ATTR_CREATION_TIME, ATTR_ENTITY_TYPE,
    ATTR_LAST_UPDATED_BY, ATTR_LAST_UPDATE_TIME, ATTR_VERSION,
};
use jobli_core::record::SingleTableRecord;
use jobli_core::storage::{
    AttributeMap, BatchOutcome, Consistency, PutCondition, QueryRequest, RepositoryError, Result,
    ScanFilter, ScanRequest, SortPrefix, TableBackend, TableSchema,
};

/// Store bound to one table.
pub struct SingleTableStore<B> {
    backend: Arc<B>,
    schema: TableSchema,
}

impl<B> Clone for SingleTableStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            schema: self.schema.clone(),
        }
    }
}

impl<B: TableBackend> SingleTableStore<B> {
    pub fn new(backend: Arc<B>, schema: TableSchema) -> Self {
        Self { backend, schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Point lookup. Absence is `None`.
    pub async fn get(&self, pk: &str, sk: &str) -> Result<Option<AttributeMap>> {
        self.get_with(pk, sk, Consistency::Eventual).await
    }

    /// Point lookup with a strongly consistent read.
    pub async fn get_consistent(&self, pk: &str, sk: &str) -> Result<Option<AttributeMap>> {
        self.get_with(pk, sk, Consistency::Strong).await
    }

    async fn get_with(
        &self,
        pk: &str,
        sk: &str,
        consistency: Consistency,
    ) -> Result<Option<AttributeMap>> {
        let key = self.schema.item_key(pk, sk);
        let item = self
            .backend
            .get_item(&self.schema.table_name, &key, consistency)
            .await?;
        Ok(item.map(|item| self.strip(item)))
    }

    /// Every item of partition `pk` whose sort key starts with `sk_prefix`.
    pub async fn query_by_partition_and_sort_prefix(
        &self,
        pk: &str,
        sk_prefix: &str,
    ) -> Result<Vec<AttributeMap>> {
        let sort_attribute = self.schema.sort_key.clone().ok_or_else(|| {
            RepositoryError::QueryFailed(format!(
                "Table {} has no sort key to query by prefix",
                self.schema.table_name
            ))
        })?;

        let request = QueryRequest {
            table_name: self.schema.table_name.clone(),
            index_name: None,
            partition_attribute: self.schema.partition_key.clone(),
            partition_value: pk.to_string(),
            sort_prefix: Some(SortPrefix {
                attribute: sort_attribute,
                prefix: sk_prefix.to_string(),
            }),
        };
        self.drain_query(&request).await
    }

    /// Every item of index partition `index_pk`, optionally narrowed by an
    /// index sort-key prefix.
    pub async fn query_by_secondary_index(
        &self,
        index_pk: &str,
        sk_prefix: Option<&str>,
    ) -> Result<Vec<AttributeMap>> {
        let index = self.schema.require_index()?;
        let request = QueryRequest {
            table_name: self.schema.table_name.clone(),
            index_name: Some(index.name.clone()),
            partition_attribute: index.partition_key.clone(),
            partition_value: index_pk.to_string(),
            sort_prefix: sk_prefix.map(|prefix| SortPrefix {
                attribute: index.sort_key.clone(),
                prefix: prefix.to_string(),
            }),
        };
        self.drain_query(&request).await
    }

    /// Full scan of items whose partition key starts with `pk_prefix`.
    pub async fn scan_by_prefix(&self, pk_prefix: &str) -> Result<Vec<AttributeMap>> {
        let filter = ScanFilter::begins_with(self.schema.partition_key.clone(), pk_prefix);
        self.scan_by_filter(filter).await
    }

    /// Full scan with a predicate evaluated by the backend.
    pub async fn scan_by_filter(&self, filter: ScanFilter) -> Result<Vec<AttributeMap>> {
        let request = ScanRequest {
            table_name: self.schema.table_name.clone(),
            filter,
        };

        let mut items = Vec::new();
        let mut start = None;
        let mut pages = 0usize;
        loop {
            let page = self.backend.scan_page(&request, start.take()).await?;
            pages += 1;
            tracing::debug!(
                table = %request.table_name,
                page = pages,
                items = page.items.len(),
                "Fetched scan page"
            );
            items.extend(page.items.into_iter().map(|item| self.strip(item)));

            match page.last_evaluated_key {
                Some(key) => {
                    tracing::info!(table = %request.table_name, page = pages, "Continuing scan");
                    start = Some(key);
                }
                None => break,
            }
        }
        Ok(items)
    }

    async fn drain_query(&self, request: &QueryRequest) -> Result<Vec<AttributeMap>> {
        let mut items = Vec::new();
        let mut start = None;
        let mut pages = 0usize;
        loop {
            let page = self.backend.query_page(request, start.take()).await?;
            pages += 1;
            tracing::debug!(
                table = %request.table_name,
                index = ?request.index_name,
                partition = %request.partition_value,
                page = pages,
                items = page.items.len(),
                "Fetched query page"
            );
            items.extend(page.items.into_iter().map(|item| self.strip(item)));

            match page.last_evaluated_key {
                Some(key) => {
                    tracing::info!(
                        table = %request.table_name,
                        partition = %request.partition_value,
                        page = pages,
                        "Continuing query"
                    );
                    start = Some(key);
                }
                None => break,
            }
        }
        Ok(items)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Stores a new record at version 0.
    ///
    /// Fails with `AlreadyExists` when an item with the same key is present;
    /// the check and the write are one conditional put.
    pub async fn create<R: SingleTableRecord>(
        &self,
        record: &R,
        actor: &str,
    ) -> Result<AttributeMap> {
        let pk = record.partition_key();
        let mut item = record.to_attributes()?;
        self.schema
            .apply_keys(&mut item, pk.clone(), record.sort_key(), record.index_key())?;

        let now = Value::String(format_timestamp(Utc::now()));
        item.insert(ATTR_ENTITY_TYPE.to_string(), R::ENTITY_TYPE.into());
        item.insert(ATTR_VERSION.to_string(), 0u64.into());
        item.insert(ATTR_CREATION_TIME.to_string(), now.clone());
        item.insert(ATTR_LAST_UPDATE_TIME.to_string(), now);
        item.insert(ATTR_CREATED_BY.to_string(), actor.into());
        item.insert(ATTR_LAST_UPDATED_BY.to_string(), actor.into());

        let condition = PutCondition::NotExists {
            attribute: self.schema.partition_key.clone(),
        };
        self.backend
            .put_item(&self.schema.table_name, item.clone(), Some(condition))
            .await
            .map_err(|e| e.for_record(R::ENTITY_TYPE, pk.clone()))?;

        tracing::debug!(entity = R::ENTITY_TYPE, key = %pk, "Created record");
        Ok(self.strip(item))
    }

    /// Replaces a stored record, bumping its version by one.
    ///
    /// The record must carry the version and creation stamps it was read
    /// with. If the stored version moved on, the creation stamps differ, or
    /// the item is gone, the write is rejected with `Conflict` and nothing
    /// changes.
    pub async fn update<R: SingleTableRecord>(
        &self,
        record: &R,
        actor: &str,
    ) -> Result<AttributeMap> {
        let pk = record.partition_key();
        let mut item = record.to_attributes()?;

        let version = get_optional_u64(&item, ATTR_VERSION).ok_or_else(|| {
            RepositoryError::BadRequest(format!("{} {} has no version", R::ENTITY_TYPE, pk))
        })?;
        let unchanged = creation_stamps(&item);
        if unchanged.len() != CREATION_STAMPS.len() {
            return Err(RepositoryError::BadRequest(format!(
                "{} {} has not been stored yet",
                R::ENTITY_TYPE,
                pk
            )));
        }

        self.schema
            .apply_keys(&mut item, pk.clone(), record.sort_key(), record.index_key())?;
        item.insert(ATTR_ENTITY_TYPE.to_string(), R::ENTITY_TYPE.into());
        item.insert(ATTR_VERSION.to_string(), (version + 1).into());
        item.insert(
            ATTR_LAST_UPDATE_TIME.to_string(),
            format_timestamp(Utc::now()).into(),
        );
        item.insert(ATTR_LAST_UPDATED_BY.to_string(), actor.into());

        let condition = PutCondition::VersionEquals {
            attribute: ATTR_VERSION.to_string(),
            expected: version,
            unchanged,
        };
        self.backend
            .put_item(&self.schema.table_name, item.clone(), Some(condition))
            .await
            .map_err(|e| e.for_record(R::ENTITY_TYPE, pk.clone()))?;

        tracing::debug!(
            entity = R::ENTITY_TYPE,
            key = %pk,
            version = version + 1,
            "Updated record"
        );
        Ok(self.strip(item))
    }

    /// Unconditional delete. Deleting a missing item succeeds.
    pub async fn remove_item(&self, pk: &str, sk: &str) -> Result<()> {
        let key = self.schema.item_key(pk, sk);
        self.backend
            .delete_item(&self.schema.table_name, &key)
            .await
    }

    /// Best-effort bulk delete. Unapplied keys are returned, not retried.
    pub async fn remove_batch<R: SingleTableRecord>(&self, records: &[R]) -> Result<BatchOutcome> {
        let keys: Vec<AttributeMap> = records
            .iter()
            .map(|r| self.schema.item_key(&r.partition_key(), &r.sort_key()))
            .collect();
        let items = records
            .iter()
            .map(|r| r.to_attributes())
            .collect::<Result<Vec<_>>>()?;

        let unprocessed = self
            .backend
            .batch_delete(&self.schema.table_name, keys)
            .await?;
        if !unprocessed.is_empty() {
            tracing::warn!(
                entity = R::ENTITY_TYPE,
                unprocessed = unprocessed.len(),
                "Batch delete left items unprocessed"
            );
        }

        Ok(BatchOutcome { items, unprocessed })
    }

    /// Best-effort bulk overwrite.
    ///
    /// Items that are already stored keep their stored version and creation
    /// stamps, whatever the incoming record carries. New items start at
    /// version 0 unless the record brings its own stamps. Unapplied items are
    /// returned, not retried.
    ///
    /// Stored stamps are read item by item before the batch is sent; the
    /// batch itself is not conditional.
    pub async fn write_batch<R: SingleTableRecord>(
        &self,
        records: &[R],
        actor: &str,
    ) -> Result<BatchOutcome> {
        let now = format_timestamp(Utc::now());
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            let (pk, sk) = (record.partition_key(), record.sort_key());
            let mut item = record.to_attributes()?;

            match self.get_consistent(&pk, &sk).await? {
                Some(stored) => {
                    for attribute in [ATTR_VERSION, ATTR_CREATION_TIME, ATTR_CREATED_BY] {
                        match stored.get(attribute) {
                            Some(value) => item.insert(attribute.to_string(), value.clone()),
                            None => item.remove(attribute),
                        };
                    }
                }
                None => {
                    item.entry(ATTR_VERSION).or_insert_with(|| 0u64.into());
                    if !item.contains_key(ATTR_CREATION_TIME) {
                        item.insert(ATTR_CREATION_TIME.to_string(), now.clone().into());
                        item.insert(ATTR_CREATED_BY.to_string(), actor.into());
                    }
                }
            }

            self.schema.apply_keys(&mut item, pk, sk, record.index_key())?;
            item.insert(ATTR_ENTITY_TYPE.to_string(), R::ENTITY_TYPE.into());
            item.insert(ATTR_LAST_UPDATE_TIME.to_string(), now.clone().into());
            item.insert(ATTR_LAST_UPDATED_BY.to_string(), actor.into());
            items.push(item);
        }

        let unprocessed = self
            .backend
            .batch_put(&self.schema.table_name, items.clone())
            .await?;
        if !unprocessed.is_empty() {
            tracing::warn!(
                entity = R::ENTITY_TYPE,
                unprocessed = unprocessed.len(),
                "Batch write left items unprocessed"
            );
        }

        Ok(BatchOutcome {
            items: items.into_iter().map(|item| self.strip(item)).collect(),
            unprocessed,
        })
    }

    fn strip(&self, mut item: AttributeMap) -> AttributeMap {
        self.schema.strip_keys(&mut item);
        item
    }
}

/// Attributes fixed by the first write of an item.
const CREATION_STAMPS: [&str; 2] = [ATTR_CREATION_TIME, ATTR_CREATED_BY];

fn creation_stamps(item: &AttributeMap) -> AttributeMap {
    CREATION_STAMPS
        .iter()
        .filter_map(|name| Some((name.to_string(), item.get(*name)?.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use jobli_core::matching::AnswerSheet;
    use jobli_core::seeker::{Experience, JobSeekerAnswers};
    use serde_json::json;

    use super::*;
    use crate::storage::inmemory::InMemoryBackend;

    fn store_with_page_size(page_size: usize) -> SingleTableStore<InMemoryBackend> {
        let schema = TableSchema::single_table("jobli", "GSI1");
        let backend = InMemoryBackend::new(page_size).with_table(&schema);
        SingleTableStore::new(Arc::new(backend), schema)
    }

    fn experiences(seeker: &str, count: usize) -> Vec<Experience> {
        (0..count)
            .map(|i| Experience::new(seeker, format!("Workplace {i}"), 2010, 2012, "Cook"))
            .collect()
    }

    async fn read_experience(
        store: &SingleTableStore<InMemoryBackend>,
        experience: &Experience,
    ) -> Experience {
        let item = store
            .get(&experience.partition_key(), &experience.sort_key())
            .await
            .unwrap()
            .unwrap();
        Experience::from_attributes(&item).unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = store_with_page_size(10);
        assert_eq!(store.get("EXPERIENCE#nobody", "x").await.unwrap(), None);
        assert_eq!(
            store.get_consistent("EXPERIENCE#nobody", "x").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_create_stamps_audit_and_strips_keys() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);

        let created = store.create(&experience, "s1").await.unwrap();

        assert_eq!(created.get("version"), Some(&json!(0)));
        assert_eq!(created.get("createdBy"), Some(&json!("s1")));
        assert_eq!(created.get("entityType"), Some(&json!("Experience")));
        assert!(created.contains_key("creationTime"));
        for key in ["pk", "sk", "gsi1Pk", "gsi1Sk"] {
            assert!(!created.contains_key(key), "{key} leaked");
        }

        let stored = read_experience(&store, &experience).await;
        assert_eq!(stored.workplace, experience.workplace);
        assert_eq!(stored.audit.version, 0);
    }

    #[tokio::test]
    async fn test_create_twice_is_already_exists() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();

        let result = store.create(&experience, "s1").await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "Experience",
                id: "EXPERIENCE#s1".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_update_increments_version() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();

        for expected in 1..=3u64 {
            let mut current = read_experience(&store, &experience).await;
            current.role = format!("Role {expected}");
            store.update(&current, "s1").await.unwrap();
            assert_eq!(read_experience(&store, &experience).await.audit.version, expected);
        }
    }

    #[tokio::test]
    async fn test_update_keeps_creation_time() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let before = read_experience(&store, &experience).await;

        store.update(&before, "admin").await.unwrap();

        let after = read_experience(&store, &experience).await;
        assert_eq!(after.audit.created_at, before.audit.created_at);
        assert_eq!(after.audit.created_by.as_deref(), Some("s1"));
        assert_eq!(after.audit.updated_by.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_stale_update_is_rejected_without_mutation() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();

        let stale = read_experience(&store, &experience).await;
        let mut fresh = stale.clone();
        fresh.role = "Chef".to_string();
        store.update(&fresh, "s1").await.unwrap();

        let mut late = stale;
        late.role = "Dishwasher".to_string();
        let result = store.update(&late, "s1").await;

        assert!(matches!(
            result,
            Err(RepositoryError::Conflict {
                entity_type: "Experience",
                ..
            })
        ));
        let stored = read_experience(&store, &experience).await;
        assert_eq!(stored.role, "Chef");
        assert_eq!(stored.audit.version, 1);
    }

    #[tokio::test]
    async fn test_update_cannot_rewrite_creation_stamps() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let before = read_experience(&store, &experience).await;

        let mut backdated = before.clone();
        backdated.audit.created_at = Some(Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap());
        let result = store.update(&backdated, "s1").await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));

        let mut reassigned = before.clone();
        reassigned.audit.created_by = Some("someone-else".to_string());
        let result = store.update(&reassigned, "s1").await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));

        let stored = read_experience(&store, &experience).await;
        assert_eq!(stored, before);
    }

    #[tokio::test]
    async fn test_update_without_creator_is_bad_request() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let mut current = read_experience(&store, &experience).await;
        current.audit.created_by = None;

        let result = store.update(&current, "s1").await;

        assert!(matches!(result, Err(RepositoryError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_concurrent_updates_from_same_version_one_wins() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let base = read_experience(&store, &experience).await;

        let mut first = base.clone();
        first.role = "First".to_string();
        let mut second = base;
        second.role = "Second".to_string();

        let (a, b) = tokio::join!(store.update(&first, "a"), store.update(&second, "b"));

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let loser = if a.is_err() { a } else { b };
        assert!(matches!(loser, Err(RepositoryError::Conflict { .. })));
        assert_eq!(read_experience(&store, &experience).await.audit.version, 1);
    }

    #[tokio::test]
    async fn test_update_unsaved_record_is_bad_request() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);

        let result = store.update(&experience, "s1").await;

        assert!(matches!(result, Err(RepositoryError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_update_of_deleted_item_conflicts() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let current = read_experience(&store, &experience).await;
        store
            .remove_item(&experience.partition_key(), &experience.sort_key())
            .await
            .unwrap();

        let result = store.update(&current, "s1").await;

        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_remove_missing_item_is_ok() {
        let store = store_with_page_size(10);
        store.remove_item("EXPERIENCE#s1", "EXPERIENCE_ID#x").await.unwrap();
    }

    #[tokio::test]
    async fn test_query_pagination_is_exhaustive() {
        // page size 2: 1 item -> 1 page, 4 items -> 2 pages, 10 items -> 5 pages
        for count in [1usize, 4, 10] {
            let store = store_with_page_size(2);
            for experience in experiences("s1", count) {
                store.create(&experience, "s1").await.unwrap();
            }
            for experience in experiences("s2", 3) {
                store.create(&experience, "s2").await.unwrap();
            }

            let items = store
                .query_by_partition_and_sort_prefix("EXPERIENCE#s1", "EXPERIENCE_ID#")
                .await
                .unwrap();

            assert_eq!(items.len(), count);
            assert!(items.iter().all(|item| !item.contains_key("pk")));
        }
    }

    #[tokio::test]
    async fn test_scan_pagination_is_exhaustive() {
        for count in [1usize, 4, 10] {
            let store = store_with_page_size(2);
            for experience in experiences("s1", count) {
                store.create(&experience, "s1").await.unwrap();
            }
            let answers = JobSeekerAnswers::new("s1", "Noa", AnswerSheet::default());
            store.create(&answers, "s1").await.unwrap();

            let items = store.scan_by_prefix("EXPERIENCE#").await.unwrap();
            assert_eq!(items.len(), count);

            let all = store.scan_by_filter(ScanFilter::All).await.unwrap();
            assert_eq!(all.len(), count + 1);
        }
    }

    #[tokio::test]
    async fn test_scan_by_equals_filter() {
        let store = store_with_page_size(3);
        for experience in experiences("s1", 5) {
            store.create(&experience, "s1").await.unwrap();
        }

        let items = store
            .scan_by_filter(ScanFilter::equals("workplace", "Workplace 3"))
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get("workplace"), Some(&json!("Workplace 3")));
    }

    #[tokio::test]
    async fn test_index_query_without_index_fails() {
        let schema = TableSchema::partition_only("jobli_employers");
        let backend = InMemoryBackend::new(10).with_table(&schema);
        let store = SingleTableStore::new(Arc::new(backend), schema);

        let result = store.query_by_secondary_index("EMPLOYER#1", None).await;

        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_write_batch_and_remove_batch() {
        let store = store_with_page_size(4);
        let records = experiences("s1", 30);

        let written = store.write_batch(&records, "import").await.unwrap();
        assert!(written.is_complete());
        assert_eq!(written.items.len(), 30);
        assert!(written.items.iter().all(|item| !item.contains_key("sk")));

        let stored = store
            .query_by_partition_and_sort_prefix("EXPERIENCE#s1", "EXPERIENCE_ID#")
            .await
            .unwrap();
        assert_eq!(stored.len(), 30);
        assert!(stored
            .iter()
            .all(|item| item.get("version") == Some(&json!(0))));

        let removed = store.remove_batch(&records).await.unwrap();
        assert!(removed.is_complete());
        assert!(store
            .query_by_partition_and_sort_prefix("EXPERIENCE#s1", "EXPERIENCE_ID#")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_write_batch_keeps_existing_creation_time() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        let stored = read_experience(&store, &experience).await;

        store
            .write_batch(std::slice::from_ref(&stored), "import")
            .await
            .unwrap();

        let rewritten = read_experience(&store, &experience).await;
        assert_eq!(rewritten.audit.created_at, stored.audit.created_at);
        assert_eq!(rewritten.audit.version, stored.audit.version);
        assert_eq!(rewritten.audit.updated_by.as_deref(), Some("import"));
    }

    #[tokio::test]
    async fn test_write_batch_over_stored_item_keeps_stored_stamps() {
        let store = store_with_page_size(10);
        let experience = experiences("s1", 1).remove(0);
        store.create(&experience, "s1").await.unwrap();
        for _ in 0..3 {
            let current = read_experience(&store, &experience).await;
            store.update(&current, "s1").await.unwrap();
        }
        let before = read_experience(&store, &experience).await;
        assert_eq!(before.audit.version, 3);

        // unsaved copy: version 0, no creation stamps
        let mut fresh = experience.clone();
        fresh.role = "Imported".to_string();
        store
            .write_batch(std::slice::from_ref(&fresh), "import")
            .await
            .unwrap();

        let after = read_experience(&store, &experience).await;
        assert_eq!(after.role, "Imported");
        assert_eq!(after.audit.version, 3);
        assert_eq!(after.audit.created_at, before.audit.created_at);
        assert_eq!(after.audit.created_by.as_deref(), Some("s1"));

        let mut stale = fresh;
        stale.audit = after.audit.clone();
        stale.audit.version = 0;
        let result = store.update(&stale, "s1").await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
    }
}
