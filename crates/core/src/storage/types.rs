//! Request and response shapes exchanged between the store and a backend.

use serde_json::{Map, Value};

/// Flat, JSON-compatible attribute map used as the storage wire format.
pub type AttributeMap = Map<String, Value>;

/// Read consistency requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Consistency {
    #[default]
    Eventual,
    /// Read-own-write paths.
    Strong,
}

/// Condition attached to a single-item put.
///
/// The backend evaluates the condition atomically with the write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutCondition {
    /// No item with this key exists yet (`attribute_not_exists(<attribute>)`).
    NotExists { attribute: String },
    /// The stored item exists, its version attribute equals `expected` and
    /// every attribute in `unchanged` still holds the given value.
    VersionEquals {
        attribute: String,
        expected: u64,
        unchanged: AttributeMap,
    },
}

/// Sort-key prefix constraint on a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortPrefix {
    pub attribute: String,
    pub prefix: String,
}

/// One partition query, against the table or one of its indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table_name: String,
    pub index_name: Option<String>,
    pub partition_attribute: String,
    pub partition_value: String,
    pub sort_prefix: Option<SortPrefix>,
}

/// Declarative scan predicate pushed down to the backend.
///
/// Attributes are paths: `business_address.city` names the `city` member of
/// the nested `business_address` map.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanFilter {
    All,
    BeginsWith { attribute: String, prefix: String },
    Equals { attribute: String, value: Value },
    /// Every filter holds. An empty conjunction matches everything.
    And(Vec<ScanFilter>),
}

impl ScanFilter {
    pub fn begins_with(attribute: impl Into<String>, prefix: impl Into<String>) -> Self {
        ScanFilter::BeginsWith {
            attribute: attribute.into(),
            prefix: prefix.into(),
        }
    }

    pub fn equals(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        ScanFilter::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn and(filters: impl IntoIterator<Item = ScanFilter>) -> Self {
        ScanFilter::And(filters.into_iter().collect())
    }

    /// Evaluates the predicate against an item.
    ///
    /// `BeginsWith` only matches string attributes; a missing attribute never
    /// matches anything but `All`.
    pub fn matches(&self, item: &AttributeMap) -> bool {
        match self {
            ScanFilter::All => true,
            ScanFilter::BeginsWith { attribute, prefix } => lookup(item, attribute)
                .and_then(Value::as_str)
                .is_some_and(|s| s.starts_with(prefix.as_str())),
            ScanFilter::Equals { attribute, value } => lookup(item, attribute) == Some(value),
            ScanFilter::And(filters) => filters.iter().all(|filter| filter.matches(item)),
        }
    }
}

/// Resolves a dotted attribute path inside an item.
fn lookup<'a>(item: &'a AttributeMap, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let first = item.get(segments.next()?)?;
    segments.try_fold(first, |value, segment| value.as_object()?.get(segment))
}

/// Full-table scan request.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    pub table_name: String,
    pub filter: ScanFilter,
}

/// One page of a query or scan.
///
/// `last_evaluated_key` is `Some` while more pages remain. A page may be empty
/// and still carry a continuation key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<AttributeMap>,
    pub last_evaluated_key: Option<AttributeMap>,
}

/// Result of a best-effort batch write or delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Items as submitted, with key attributes stripped.
    pub items: Vec<AttributeMap>,
    /// Raw requests (items for puts, keys for deletes) the backend did not apply.
    pub unprocessed: Vec<AttributeMap>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.unprocessed.is_empty()
    }
}
