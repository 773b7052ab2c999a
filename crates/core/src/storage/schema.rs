//! Physical layout of a table: key attribute names and optional secondary index.

use serde_json::Value;

use crate::record::IndexKey;

use super::{AttributeMap, RepositoryError, Result};

pub const PARTITION_KEY: &str = "pk";
pub const SORT_KEY: &str = "sk";
pub const INDEX_PARTITION_KEY: &str = "gsi1Pk";
pub const INDEX_SORT_KEY: &str = "gsi1Sk";
pub const DEFAULT_INDEX_NAME: &str = "GSI1";

/// Secondary index keyed by two string attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub name: String,
    pub partition_key: String,
    pub sort_key: String,
}

/// Key attribute names of one physical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key: String,
    /// `None` for tables keyed by partition key only.
    pub sort_key: Option<String>,
    pub index: Option<IndexSchema>,
}

impl TableSchema {
    /// A `pk`/`sk` table with the `gsi1Pk`/`gsi1Sk` index.
    pub fn single_table(table_name: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self::partition_only(table_name)
            .with_sort_key(SORT_KEY)
            .with_index(index_name)
    }

    /// A table keyed by `pk` only, without index.
    pub fn partition_only(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            partition_key: PARTITION_KEY.to_string(),
            sort_key: None,
            index: None,
        }
    }

    pub fn with_sort_key(mut self, attribute: impl Into<String>) -> Self {
        self.sort_key = Some(attribute.into());
        self
    }

    /// Adds a secondary index over `gsi1Pk`/`gsi1Sk`.
    pub fn with_index(mut self, index_name: impl Into<String>) -> Self {
        self.index = Some(IndexSchema {
            name: index_name.into(),
            partition_key: INDEX_PARTITION_KEY.to_string(),
            sort_key: INDEX_SORT_KEY.to_string(),
        });
        self
    }

    /// Names of every key attribute this schema writes (table and index).
    pub fn key_attributes(&self) -> Vec<&str> {
        let mut attributes = vec![self.partition_key.as_str()];
        if let Some(sk) = &self.sort_key {
            attributes.push(sk);
        }
        if let Some(index) = &self.index {
            attributes.push(&index.partition_key);
            attributes.push(&index.sort_key);
        }
        attributes
    }

    /// Builds the primary key map. `sk` is ignored when the table has no sort key.
    pub fn item_key(&self, pk: &str, sk: &str) -> AttributeMap {
        let mut key = AttributeMap::new();
        key.insert(self.partition_key.clone(), Value::String(pk.to_string()));
        if let Some(sort_key) = &self.sort_key {
            key.insert(sort_key.clone(), Value::String(sk.to_string()));
        }
        key
    }

    /// Extracts the primary key map from a full item.
    pub fn key_of(&self, item: &AttributeMap) -> Result<AttributeMap> {
        let mut key = AttributeMap::new();
        let primary = std::iter::once(&self.partition_key).chain(self.sort_key.as_ref());
        for attribute in primary {
            let value = item.get(attribute).ok_or_else(|| {
                RepositoryError::InvalidData(format!("Missing key attribute: {attribute}"))
            })?;
            key.insert(attribute.clone(), value.clone());
        }
        Ok(key)
    }

    /// Writes the key attributes into `item`.
    ///
    /// A `NotIndexed` record leaves no index attribute behind, not even as null.
    pub fn apply_keys(
        &self,
        item: &mut AttributeMap,
        pk: String,
        sk: String,
        index_key: IndexKey,
    ) -> Result<()> {
        item.insert(self.partition_key.clone(), Value::String(pk));
        if let Some(sort_key) = &self.sort_key {
            item.insert(sort_key.clone(), Value::String(sk));
        }

        match (index_key, &self.index) {
            (IndexKey::Indexed { partition, sort }, Some(index)) => {
                item.insert(index.partition_key.clone(), Value::String(partition));
                item.insert(index.sort_key.clone(), Value::String(sort));
            }
            (IndexKey::Indexed { .. }, None) => {
                return Err(RepositoryError::QueryFailed(format!(
                    "Table {} has no secondary index for an indexed record",
                    self.table_name
                )));
            }
            (IndexKey::NotIndexed, Some(index)) => {
                item.remove(&index.partition_key);
                item.remove(&index.sort_key);
            }
            (IndexKey::NotIndexed, None) => {}
        }

        Ok(())
    }

    /// Removes every key attribute of this schema from `item`.
    pub fn strip_keys(&self, item: &mut AttributeMap) {
        for attribute in self.key_attributes() {
            item.remove(attribute);
        }
    }

    /// Returns the index, or an error naming the misconfigured table.
    pub fn require_index(&self) -> Result<&IndexSchema> {
        self.index.as_ref().ok_or_else(|| {
            RepositoryError::QueryFailed(format!(
                "Table {} has no secondary index configured",
                self.table_name
            ))
        })
    }
}
