//! In-memory table backend.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use jobli_core::storage::{
    AttributeMap, Consistency, Page, PutCondition, QueryRequest, RepositoryError, Result,
    ScanRequest, TableBackend, TableSchema,
};

type PrimaryKey = (String, String);

struct Table {
    schema: TableSchema,
    items: BTreeMap<PrimaryKey, AttributeMap>,
}

fn string_attribute(item: &AttributeMap, attribute: &str) -> String {
    item.get(attribute)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl Table {
    fn primary_key(&self, item: &AttributeMap) -> Result<PrimaryKey> {
        let pk = item
            .get(&self.schema.partition_key)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                RepositoryError::InvalidData(format!(
                    "Missing key attribute: {}",
                    self.schema.partition_key
                ))
            })?;
        let sk = match &self.schema.sort_key {
            Some(attribute) => item.get(attribute).and_then(Value::as_str).ok_or_else(|| {
                RepositoryError::InvalidData(format!("Missing key attribute: {attribute}"))
            })?,
            None => "",
        };
        Ok((pk.to_string(), sk.to_string()))
    }

    /// Ordering of an item within a query: sort attribute, then primary key.
    fn query_position(&self, item: &AttributeMap, sort_attribute: &str) -> (String, PrimaryKey) {
        let primary = (
            string_attribute(item, &self.schema.partition_key),
            self.schema
                .sort_key
                .as_deref()
                .map(|sk| string_attribute(item, sk))
                .unwrap_or_default(),
        );
        (string_attribute(item, sort_attribute), primary)
    }

    /// Key attributes a continuation token carries for this request.
    fn continuation_key(&self, item: &AttributeMap, index_name: Option<&str>) -> AttributeMap {
        let mut key = AttributeMap::new();
        let mut attributes = vec![self.schema.partition_key.as_str()];
        if let Some(sk) = &self.schema.sort_key {
            attributes.push(sk);
        }
        if let (Some(_), Some(index)) = (index_name, &self.schema.index) {
            attributes.push(&index.partition_key);
            attributes.push(&index.sort_key);
        }
        for attribute in attributes {
            if let Some(value) = item.get(attribute) {
                key.insert(attribute.to_string(), value.clone());
            }
        }
        key
    }
}

/// Table backend held in process memory.
///
/// Tables must be registered with [`InMemoryBackend::with_table`] before use.
/// Queries and scans return at most `page_size` items per page, so callers
/// see the same continuation behaviour as against DynamoDB. Conditional puts
/// are evaluated under the write lock.
pub struct InMemoryBackend {
    page_size: usize,
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryBackend {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a table. Registering a name twice replaces the table.
    pub fn with_table(mut self, schema: &TableSchema) -> Self {
        self.tables.get_mut().insert(
            schema.table_name.clone(),
            Table {
                schema: schema.clone(),
                items: BTreeMap::new(),
            },
        );
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn table_not_found(table_name: &str) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Table not found: {table_name}"))
}

#[async_trait]
impl TableBackend for InMemoryBackend {
    async fn get_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
        _consistency: Consistency,
    ) -> Result<Option<AttributeMap>> {
        let tables = self.tables.read().await;
        let table = tables
            .get(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        let key = table.primary_key(key)?;
        Ok(table.items.get(&key).cloned())
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
        condition: Option<PutCondition>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        let key = table.primary_key(&item)?;
        let existing = table.items.get(&key);

        match condition {
            Some(PutCondition::NotExists { .. }) if existing.is_some() => {
                return Err(RepositoryError::AlreadyExists {
                    entity_type: "Item",
                    id: key.0,
                });
            }
            Some(PutCondition::VersionEquals {
                attribute,
                expected,
                unchanged,
            }) => {
                let holds = existing.is_some_and(|stored| {
                    stored.get(&attribute).and_then(Value::as_u64) == Some(expected)
                        && unchanged
                            .iter()
                            .all(|(name, value)| stored.get(name) == Some(value))
                });
                if !holds {
                    return Err(RepositoryError::Conflict {
                        entity_type: "Item",
                        id: key.0,
                    });
                }
            }
            _ => {}
        }

        table.items.insert(key, item);
        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &AttributeMap) -> Result<()> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        let key = table.primary_key(key)?;
        table.items.remove(&key);
        Ok(())
    }

    async fn query_page(
        &self,
        request: &QueryRequest,
        start: Option<AttributeMap>,
    ) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables
            .get(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let sort_attribute = match (&request.index_name, &table.schema.index) {
            (None, _) => table.schema.sort_key.clone().unwrap_or_default(),
            (Some(name), Some(index)) if *name == index.name => index.sort_key.clone(),
            (Some(name), _) => {
                return Err(RepositoryError::QueryFailed(format!(
                    "Index {} not found on table {}",
                    name, request.table_name
                )))
            }
        };

        let mut matching: Vec<(_, &AttributeMap)> = table
            .items
            .values()
            .filter(|item| {
                item.get(&request.partition_attribute).and_then(Value::as_str)
                    == Some(request.partition_value.as_str())
            })
            .filter(|item| match &request.sort_prefix {
                Some(prefix) => item
                    .get(&prefix.attribute)
                    .and_then(Value::as_str)
                    .is_some_and(|sk| sk.starts_with(prefix.prefix.as_str())),
                None => true,
            })
            .map(|item| (table.query_position(item, &sort_attribute), item))
            .collect();
        matching.sort_by(|a, b| a.0.cmp(&b.0));

        let after = start.map(|key| table.query_position(&key, &sort_attribute));
        let remaining: Vec<&AttributeMap> = matching
            .into_iter()
            .filter(|(position, _)| after.as_ref().map_or(true, |after| position > after))
            .map(|(_, item)| item)
            .collect();

        let items: Vec<AttributeMap> = remaining
            .iter()
            .take(self.page_size)
            .map(|item| (*item).clone())
            .collect();
        let last_evaluated_key = if remaining.len() > self.page_size {
            items
                .last()
                .map(|item| table.continuation_key(item, request.index_name.as_deref()))
        } else {
            None
        };

        Ok(Page {
            items,
            last_evaluated_key,
        })
    }

    async fn scan_page(&self, request: &ScanRequest, start: Option<AttributeMap>) -> Result<Page> {
        let tables = self.tables.read().await;
        let table = tables
            .get(&request.table_name)
            .ok_or_else(|| table_not_found(&request.table_name))?;

        let after = start.map(|key| table.primary_key(&key)).transpose()?;
        let remaining: Vec<(&PrimaryKey, &AttributeMap)> = table
            .items
            .iter()
            .filter(|(key, _)| after.as_ref().map_or(true, |after| *key > after))
            .collect();

        // The page limit applies before the filter, so a page may come back
        // empty while more items remain.
        let evaluated = &remaining[..remaining.len().min(self.page_size)];
        let items = evaluated
            .iter()
            .filter(|(_, item)| request.filter.matches(item))
            .map(|(_, item)| (*item).clone())
            .collect();
        let last_evaluated_key = if remaining.len() > self.page_size {
            evaluated
                .last()
                .map(|(_, item)| table.continuation_key(item, None))
        } else {
            None
        };

        Ok(Page {
            items,
            last_evaluated_key,
        })
    }

    async fn batch_put(
        &self,
        table_name: &str,
        items: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        for item in items {
            let key = table.primary_key(&item)?;
            table.items.insert(key, item);
        }
        Ok(Vec::new())
    }

    async fn batch_delete(
        &self,
        table_name: &str,
        keys: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>> {
        let mut tables = self.tables.write().await;
        let table = tables
            .get_mut(table_name)
            .ok_or_else(|| table_not_found(table_name))?;
        for key in keys {
            let key = table.primary_key(&key)?;
            table.items.remove(&key);
        }
        Ok(Vec::new())
    }
}
