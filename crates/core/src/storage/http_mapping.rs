//! Pure functions for mapping repository errors to HTTP status codes.
//!
//! The HTTP gateway lives outside this workspace; it only needs a status
//! code per error, which is derived from the error's [`ErrorKind`].

use super::{ErrorKind, RepositoryError};

/// Maps an [`ErrorKind`] to an HTTP status code.
///
/// - `BadRequest` -> 400
/// - `NotFound` -> 404
/// - `Conflict` -> 409
/// - `StorageUnavailable` -> 500 (not exposed differently from a generic failure)
/// - `Internal` -> 500
pub fn error_kind_to_status_code(kind: ErrorKind) -> u16 {
    match kind {
        ErrorKind::BadRequest => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::StorageUnavailable | ErrorKind::Internal => 500,
    }
}

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// # Examples
///
/// ```
/// use jobli_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Experience",
///     id: "abc-123".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    error_kind_to_status_code(error.kind())
}
