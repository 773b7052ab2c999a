use thiserror::Error;

/// Coarse classification of a [`RepositoryError`].
///
/// Callers branch on the kind rather than on individual variants: a
/// `Conflict` is worth retrying after a fresh read, a `StorageUnavailable`
/// is worth retrying with backoff, the rest are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    StorageUnavailable,
    Internal,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} {id} was modified by someone else, please retry with the latest data")]
    Conflict {
        entity_type: &'static str,
        id: String,
    },
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::BadRequest(_) => ErrorKind::BadRequest,
            RepositoryError::NotFound { .. } => ErrorKind::NotFound,
            RepositoryError::AlreadyExists { .. } | RepositoryError::Conflict { .. } => {
                ErrorKind::Conflict
            }
            RepositoryError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
            RepositoryError::QueryFailed(_)
            | RepositoryError::Serialization(_)
            | RepositoryError::InvalidData(_) => ErrorKind::Internal,
        }
    }

    /// True for precondition failures on a conditional write.
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// True when the same call may succeed later, either after a fresh read
    /// (conflicts) or after a backoff (transient backend failures).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Conflict | ErrorKind::StorageUnavailable
        )
    }

    /// Re-labels a conflict raised by a backend with the record it concerns.
    ///
    /// Backends only see raw items; the store knows which record type and key
    /// it was writing.
    pub fn for_record(self, entity_type: &'static str, id: impl Into<String>) -> Self {
        match self {
            RepositoryError::Conflict { .. } => RepositoryError::Conflict {
                entity_type,
                id: id.into(),
            },
            RepositoryError::AlreadyExists { .. } => RepositoryError::AlreadyExists {
                entity_type,
                id: id.into(),
            },
            other => other,
        }
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Experience",
            id: "abc-123".to_string(),
        };
        assert_eq!(error.to_string(), "Experience not found: abc-123");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "JobSeeker",
            id: "JOB_SEEKER#u1".to_string(),
        };
        assert_eq!(error.to_string(), "JobSeeker already exists: JOB_SEEKER#u1");
    }

    #[test]
    fn test_repository_error_conflict_display() {
        let error = RepositoryError::Conflict {
            entity_type: "JobSeeker",
            id: "JOB_SEEKER#u1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "JobSeeker JOB_SEEKER#u1 was modified by someone else, please retry with the latest data"
        );
    }

    #[test]
    fn test_repository_error_storage_unavailable_display() {
        let error = RepositoryError::StorageUnavailable("throughput exceeded".to_string());
        assert_eq!(error.to_string(), "Storage unavailable: throughput exceeded");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            RepositoryError::bad_request("x").kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            RepositoryError::not_found("Employer", "1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            RepositoryError::InvalidData("bad".to_string()).kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            RepositoryError::QueryFailed("bad".to_string()).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_conflict_is_distinct_from_unavailable() {
        let conflict = RepositoryError::Conflict {
            entity_type: "Item",
            id: "k".to_string(),
        };
        let unavailable = RepositoryError::StorageUnavailable("down".to_string());

        assert!(conflict.is_conflict());
        assert!(!unavailable.is_conflict());
        assert!(conflict.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!RepositoryError::bad_request("nope").is_retryable());
    }

    #[test]
    fn test_for_record_relabels_conflicts_only() {
        let relabeled = RepositoryError::Conflict {
            entity_type: "Item",
            id: "jobli".to_string(),
        }
        .for_record("Experience", "EXPERIENCE#s1");
        assert_eq!(
            relabeled,
            RepositoryError::Conflict {
                entity_type: "Experience",
                id: "EXPERIENCE#s1".to_string(),
            }
        );

        let untouched =
            RepositoryError::QueryFailed("x".to_string()).for_record("Experience", "EXPERIENCE#s1");
        assert_eq!(untouched, RepositoryError::QueryFailed("x".to_string()));
    }
}
