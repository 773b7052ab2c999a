//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `jobli_core::storage`.
//! Throttling, request limits, internal server errors, timeouts and dispatch
//! failures are `StorageUnavailable`; failed conditions are conflicts; the
//! rest are `QueryFailed`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use jobli_core::storage::{PutCondition, RepositoryError};

const THROTTLING_CODE: &str = "ThrottlingException";

fn throughput_exceeded() -> RepositoryError {
    RepositoryError::StorageUnavailable("Throughput exceeded, please retry".to_string())
}

fn request_limit_exceeded() -> RepositoryError {
    RepositoryError::StorageUnavailable("Request limit exceeded, please retry".to_string())
}

fn internal_server_error() -> RepositoryError {
    RepositoryError::StorageUnavailable("DynamoDB internal server error".to_string())
}

fn table_not_found() -> RepositoryError {
    RepositoryError::QueryFailed("Table not found".to_string())
}

/// Splits transport failures from service errors.
///
/// Matching on the `SdkError` variants avoids treating timeouts and dispatch
/// failures as unhandled service errors.
fn service_error<E, R>(
    err: SdkError<E, R>,
    operation: &str,
) -> std::result::Result<E, RepositoryError>
where
    E: Debug,
    R: Debug,
{
    match err {
        SdkError::ServiceError(context) => Ok(context.into_err()),
        SdkError::TimeoutError(_) => Err(RepositoryError::StorageUnavailable(format!(
            "{operation} timed out"
        ))),
        SdkError::DispatchFailure(e) => Err(RepositoryError::StorageUnavailable(format!(
            "{operation} dispatch failed: {:?}",
            e
        ))),
        other => Err(RepositoryError::QueryFailed(format!(
            "{operation} failed: {:?}",
            other
        ))),
    }
}

/// Fallback for service errors without a dedicated mapping.
fn unmatched<E: ProvideErrorMetadata + Debug>(err: E, operation: &str) -> RepositoryError {
    if err.code() == Some(THROTTLING_CODE) {
        return RepositoryError::StorageUnavailable(format!("{operation} throttled, please retry"));
    }
    RepositoryError::QueryFailed(format!("{operation} failed: {:?}", err))
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
) -> RepositoryError {
    match service_error(err, "GetItem") {
        Err(mapped) => mapped,
        Ok(GetItemError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(GetItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        Ok(GetItemError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(GetItemError::InternalServerError(_)) => internal_server_error(),
        Ok(err) => unmatched(err, "GetItem"),
    }
}

/// Map a PutItem SDK error to RepositoryError.
///
/// A failed condition is `AlreadyExists` for creates and `Conflict` for
/// versioned writes.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    condition: Option<&PutCondition>,
    id: impl Into<String>,
) -> RepositoryError {
    match service_error(err, "PutItem") {
        Err(mapped) => mapped,
        Ok(PutItemError::ConditionalCheckFailedException(_)) => match condition {
            Some(PutCondition::NotExists { .. }) => RepositoryError::AlreadyExists {
                entity_type: "Item",
                id: id.into(),
            },
            _ => RepositoryError::Conflict {
                entity_type: "Item",
                id: id.into(),
            },
        },
        Ok(PutItemError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(PutItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        Ok(PutItemError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(PutItemError::InternalServerError(_)) => internal_server_error(),
        Ok(PutItemError::ItemCollectionSizeLimitExceededException(_)) => {
            RepositoryError::QueryFailed("Item collection size limit exceeded".to_string())
        }
        Ok(PutItemError::TransactionConflictException(_)) => RepositoryError::StorageUnavailable(
            "Transaction conflict, please retry".to_string(),
        ),
        Ok(err) => unmatched(err, "PutItem"),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
) -> RepositoryError {
    match service_error(err, "DeleteItem") {
        Err(mapped) => mapped,
        Ok(DeleteItemError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(DeleteItemError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        Ok(DeleteItemError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(DeleteItemError::InternalServerError(_)) => internal_server_error(),
        Ok(err) => unmatched(err, "DeleteItem"),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
) -> RepositoryError {
    match service_error(err, "Query") {
        Err(mapped) => mapped,
        Ok(QueryError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(QueryError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        Ok(QueryError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(QueryError::InternalServerError(_)) => internal_server_error(),
        Ok(err) => unmatched(err, "Query"),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
) -> RepositoryError {
    match service_error(err, "Scan") {
        Err(mapped) => mapped,
        Ok(ScanError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(ScanError::ProvisionedThroughputExceededException(_)) => throughput_exceeded(),
        Ok(ScanError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(ScanError::InternalServerError(_)) => internal_server_error(),
        Ok(err) => unmatched(err, "Scan"),
    }
}

/// Map a BatchWriteItem SDK error to RepositoryError.
pub fn map_batch_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<BatchWriteItemError, R>,
) -> RepositoryError {
    match service_error(err, "BatchWriteItem") {
        Err(mapped) => mapped,
        Ok(BatchWriteItemError::ResourceNotFoundException(_)) => table_not_found(),
        Ok(BatchWriteItemError::ProvisionedThroughputExceededException(_)) => {
            throughput_exceeded()
        }
        Ok(BatchWriteItemError::RequestLimitExceeded(_)) => request_limit_exceeded(),
        Ok(BatchWriteItemError::InternalServerError(_)) => internal_server_error(),
        Ok(err) => unmatched(err, "BatchWriteItem"),
    }
}

/// Map a request-builder error to RepositoryError.
pub fn map_build_error(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Invalid request: {}", err))
}

#[cfg(test)]
mod tests {
    use aws_sdk_dynamodb::types::error::{
        ConditionalCheckFailedException, ProvisionedThroughputExceededException,
    };
    use jobli_core::storage::ErrorKind;

    use super::*;

    fn put_error(err: PutItemError) -> SdkError<PutItemError, ()> {
        SdkError::service_error(err, ())
    }

    #[test]
    fn test_condition_failure_on_create_is_already_exists() {
        let err = put_error(PutItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build(),
        ));
        let condition = PutCondition::NotExists {
            attribute: "pk".to_string(),
        };

        let mapped = map_put_item_error(err, Some(&condition), "jobli");

        assert!(matches!(mapped, RepositoryError::AlreadyExists { .. }));
    }

    #[test]
    fn test_condition_failure_on_update_is_conflict() {
        let err = put_error(PutItemError::ConditionalCheckFailedException(
            ConditionalCheckFailedException::builder().build(),
        ));
        let condition = PutCondition::VersionEquals {
            attribute: "version".to_string(),
            expected: 2,
            unchanged: Default::default(),
        };

        let mapped = map_put_item_error(err, Some(&condition), "jobli");

        assert!(matches!(mapped, RepositoryError::Conflict { .. }));
    }

    #[test]
    fn test_throughput_is_storage_unavailable() {
        let err = put_error(PutItemError::ProvisionedThroughputExceededException(
            ProvisionedThroughputExceededException::builder().build(),
        ));

        let mapped = map_put_item_error(err, None, "jobli");

        assert_eq!(mapped.kind(), ErrorKind::StorageUnavailable);
        assert!(mapped.is_retryable());
    }

    #[test]
    fn test_timeout_is_storage_unavailable() {
        let err: SdkError<QueryError, ()> = SdkError::timeout_error("deadline elapsed");

        let mapped = map_query_error(err);

        assert_eq!(
            mapped,
            RepositoryError::StorageUnavailable("Query timed out".to_string())
        );
    }
}
