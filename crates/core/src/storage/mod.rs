mod error;
mod http_mapping;
mod schema;
mod traits;
mod types;

pub use error::{ErrorKind, RepositoryError, Result};
pub use http_mapping::{error_kind_to_status_code, repository_error_to_status_code};
pub use schema::{
    IndexSchema, TableSchema, DEFAULT_INDEX_NAME, INDEX_PARTITION_KEY, INDEX_SORT_KEY,
    PARTITION_KEY, SORT_KEY,
};
pub use traits::TableBackend;
pub use types::{
    AttributeMap, BatchOutcome, Consistency, Page, PutCondition, QueryRequest, ScanFilter,
    ScanRequest, SortPrefix,
};
