//! Table backend implementations.
//!
//! Concrete implementations of [`jobli_core::storage::TableBackend`]. The
//! backend wired into [`crate::state::AppState`] is selected at compile time:
//!
//! - `inmemory` (default): process-local tables, see [`inmemory`]
//! - `dynamodb`: AWS DynamoDB via `aws-sdk-dynamodb`
//!
//! The two features are mutually exclusive. The in-memory backend is always
//! compiled so the test suite can run against it.
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p jobli --no-default-features --features dynamodb
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p jobli --features dynamodb"
);

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

pub mod inmemory;
