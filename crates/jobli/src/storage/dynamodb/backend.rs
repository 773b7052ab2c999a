//! DynamoDB table backend.
//!
//! Implements [`TableBackend`] from `jobli_core::storage` on top of the AWS
//! SDK client. Conditions, key conditions and scan filters are rendered to
//! DynamoDB expressions with placeholder names so reserved words are safe.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;
use tracing::{debug, warn};

use jobli_core::storage::{
    AttributeMap, Consistency, Page, PutCondition, QueryRequest, Result, ScanFilter, ScanRequest,
    TableBackend,
};

use super::conversions::{item_to_map, map_to_item, value_to_attribute};
use super::error::{
    map_batch_write_error, map_build_error, map_delete_item_error, map_get_item_error,
    map_put_item_error, map_query_error, map_scan_error,
};

/// Maximum number of write requests DynamoDB accepts per BatchWriteItem call.
const BATCH_WRITE_LIMIT: usize = 25;

/// DynamoDB-based table backend.
#[derive(Clone)]
pub struct DynamoDbBackend {
    client: Client,
}

impl DynamoDbBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a backend from the AWS SDK default credential chain.
    ///
    /// `endpoint_url` points the client at a local DynamoDB when set.
    pub async fn from_config(endpoint_url: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;
        Self::new(Client::new(&config))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends write requests in chunks, collecting whatever DynamoDB hands back
    /// as unprocessed.
    async fn batch_write(
        &self,
        table_name: &str,
        requests: Vec<WriteRequest>,
    ) -> Result<Vec<WriteRequest>> {
        let mut unprocessed = Vec::new();

        for chunk in requests.chunks(BATCH_WRITE_LIMIT) {
            let output = self
                .client
                .batch_write_item()
                .request_items(table_name, chunk.to_vec())
                .send()
                .await
                .map_err(map_batch_write_error)?;

            if let Some(mut pending) = output.unprocessed_items {
                if let Some(requests) = pending.remove(table_name) {
                    if !requests.is_empty() {
                        warn!(
                            table = table_name,
                            count = requests.len(),
                            "BatchWriteItem returned unprocessed requests"
                        );
                    }
                    unprocessed.extend(requests);
                }
            }
        }

        Ok(unprocessed)
    }
}

/// Placeholder names and values for one expression.
#[derive(Default)]
struct Expression {
    names: HashMap<String, String>,
    values: HashMap<String, AttributeValue>,
}

impl Expression {
    fn name(&mut self, placeholder: &str, attribute: &str) -> String {
        let key = format!("#{placeholder}");
        self.names.insert(key.clone(), attribute.to_string());
        key
    }

    fn value(&mut self, placeholder: &str, value: AttributeValue) -> String {
        let key = format!(":{placeholder}");
        self.values.insert(key.clone(), value);
        key
    }

    fn names(&self) -> Option<HashMap<String, String>> {
        (!self.names.is_empty()).then(|| self.names.clone())
    }

    fn values(&self) -> Option<HashMap<String, AttributeValue>> {
        (!self.values.is_empty()).then(|| self.values.clone())
    }
}

/// Renders a put condition to a condition expression.
fn condition_expression(condition: &PutCondition, expr: &mut Expression) -> String {
    match condition {
        PutCondition::NotExists { attribute } => {
            let name = expr.name("key", attribute);
            format!("attribute_not_exists({name})")
        }
        PutCondition::VersionEquals {
            attribute,
            expected,
            unchanged,
        } => {
            let name = expr.name("version", attribute);
            let value = expr.value("expected", AttributeValue::N(expected.to_string()));
            let mut clauses = vec![format!("{name} = {value}")];
            for (i, (attribute, stored)) in unchanged.iter().enumerate() {
                let name = expr.name(&format!("unchanged{i}"), attribute);
                let value = expr.value(&format!("unchanged{i}"), value_to_attribute(stored));
                clauses.push(format!("{name} = {value}"));
            }
            clauses.join(" AND ")
        }
    }
}

/// Renders a scan filter, `None` when it matches everything.
fn filter_expression(filter: &ScanFilter, expr: &mut Expression) -> Option<String> {
    let mut next = 0;
    render_filter(filter, expr, &mut next)
}

fn render_filter(filter: &ScanFilter, expr: &mut Expression, next: &mut usize) -> Option<String> {
    match filter {
        ScanFilter::All => None,
        ScanFilter::BeginsWith { attribute, prefix } => {
            *next += 1;
            let name = path_name(expr, &format!("attr{next}"), attribute);
            let value = expr.value(&format!("value{next}"), AttributeValue::S(prefix.clone()));
            Some(format!("begins_with({name}, {value})"))
        }
        ScanFilter::Equals { attribute, value } => {
            *next += 1;
            let name = path_name(expr, &format!("attr{next}"), attribute);
            let value = expr.value(&format!("value{next}"), value_to_attribute(value));
            Some(format!("{name} = {value}"))
        }
        ScanFilter::And(filters) => {
            let clauses: Vec<String> = filters
                .iter()
                .filter_map(|filter| render_filter(filter, expr, next))
                .collect();
            match clauses.len() {
                0 => None,
                1 => clauses.into_iter().next(),
                _ => Some(
                    clauses
                        .iter()
                        .map(|clause| format!("({clause})"))
                        .collect::<Vec<_>>()
                        .join(" AND "),
                ),
            }
        }
    }
}

/// Placeholder for a dotted attribute path, one name per segment.
fn path_name(expr: &mut Expression, placeholder: &str, path: &str) -> String {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.len() == 1 {
        return expr.name(placeholder, path);
    }
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| expr.name(&format!("{placeholder}_{i}"), segment))
        .collect::<Vec<_>>()
        .join(".")
}

/// Renders a partition query to a key condition expression.
fn key_condition_expression(request: &QueryRequest, expr: &mut Expression) -> String {
    let pk_name = expr.name("pk", &request.partition_attribute);
    let pk_value = expr.value("pk", AttributeValue::S(request.partition_value.clone()));
    match &request.sort_prefix {
        Some(sort) => {
            let sk_name = expr.name("sk", &sort.attribute);
            let sk_value = expr.value("sk", AttributeValue::S(sort.prefix.clone()));
            format!("{pk_name} = {pk_value} AND begins_with({sk_name}, {sk_value})")
        }
        None => format!("{pk_name} = {pk_value}"),
    }
}

fn items_to_maps(items: Option<Vec<HashMap<String, AttributeValue>>>) -> Result<Vec<AttributeMap>> {
    items
        .unwrap_or_default()
        .iter()
        .map(item_to_map)
        .collect()
}

fn continuation(key: Option<HashMap<String, AttributeValue>>) -> Result<Option<AttributeMap>> {
    match key {
        Some(key) if !key.is_empty() => item_to_map(&key).map(Some),
        _ => Ok(None),
    }
}

#[async_trait]
impl TableBackend for DynamoDbBackend {
    async fn get_item(
        &self,
        table_name: &str,
        key: &AttributeMap,
        consistency: Consistency,
    ) -> Result<Option<AttributeMap>> {
        let output = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(map_to_item(key)))
            .consistent_read(consistency == Consistency::Strong)
            .send()
            .await
            .map_err(map_get_item_error)?;

        output.item.as_ref().map(item_to_map).transpose()
    }

    async fn put_item(
        &self,
        table_name: &str,
        item: AttributeMap,
        condition: Option<PutCondition>,
    ) -> Result<()> {
        let mut expr = Expression::default();
        let condition_expr = condition
            .as_ref()
            .map(|condition| condition_expression(condition, &mut expr));

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(map_to_item(&item)))
            .set_condition_expression(condition_expr)
            .set_expression_attribute_names(expr.names())
            .set_expression_attribute_values(expr.values())
            .send()
            .await
            .map_err(|e| map_put_item_error(e, condition.as_ref(), table_name))?;

        Ok(())
    }

    async fn delete_item(&self, table_name: &str, key: &AttributeMap) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table_name)
            .set_key(Some(map_to_item(key)))
            .send()
            .await
            .map_err(map_delete_item_error)?;

        Ok(())
    }

    async fn query_page(
        &self,
        request: &QueryRequest,
        start: Option<AttributeMap>,
    ) -> Result<Page> {
        let mut expr = Expression::default();
        let key_condition = key_condition_expression(request, &mut expr);

        debug!(
            table = %request.table_name,
            index = ?request.index_name,
            partition = %request.partition_value,
            "Query page"
        );

        let output = self
            .client
            .query()
            .table_name(&request.table_name)
            .set_index_name(request.index_name.clone())
            .key_condition_expression(key_condition)
            .set_expression_attribute_names(expr.names())
            .set_expression_attribute_values(expr.values())
            .set_exclusive_start_key(start.as_ref().map(map_to_item))
            .send()
            .await
            .map_err(map_query_error)?;

        Ok(Page {
            items: items_to_maps(output.items)?,
            last_evaluated_key: continuation(output.last_evaluated_key)?,
        })
    }

    async fn scan_page(&self, request: &ScanRequest, start: Option<AttributeMap>) -> Result<Page> {
        let mut expr = Expression::default();
        let filter = filter_expression(&request.filter, &mut expr);

        let output = self
            .client
            .scan()
            .table_name(&request.table_name)
            .set_filter_expression(filter)
            .set_expression_attribute_names(expr.names())
            .set_expression_attribute_values(expr.values())
            .set_exclusive_start_key(start.as_ref().map(map_to_item))
            .send()
            .await
            .map_err(map_scan_error)?;

        Ok(Page {
            items: items_to_maps(output.items)?,
            last_evaluated_key: continuation(output.last_evaluated_key)?,
        })
    }

    async fn batch_put(
        &self,
        table_name: &str,
        items: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>> {
        let requests = items
            .iter()
            .map(|item| {
                let put = PutRequest::builder()
                    .set_item(Some(map_to_item(item)))
                    .build()
                    .map_err(map_build_error)?;
                Ok(WriteRequest::builder().put_request(put).build())
            })
            .collect::<Result<Vec<_>>>()?;

        self.batch_write(table_name, requests)
            .await?
            .iter()
            .filter_map(|request| request.put_request())
            .map(|put| item_to_map(put.item()))
            .collect()
    }

    async fn batch_delete(
        &self,
        table_name: &str,
        keys: Vec<AttributeMap>,
    ) -> Result<Vec<AttributeMap>> {
        let requests = keys
            .iter()
            .map(|key| {
                let delete = DeleteRequest::builder()
                    .set_key(Some(map_to_item(key)))
                    .build()
                    .map_err(map_build_error)?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<Result<Vec<_>>>()?;

        self.batch_write(table_name, requests)
            .await?
            .iter()
            .filter_map(|request| request.delete_request())
            .map(|delete| item_to_map(delete.key()))
            .collect()
    }
}
