//! DynamoDB storage backend.
//!
//! Serves every table of the application from one client: the seeker single
//! table keyed by `pk`/`sk`, and the employer and job tables keyed by `pk`
//! alone. Secondary index queries go through `gsi1Pk`/`gsi1Sk`. Entity layout
//! and key formats live in `jobli_core::record`; this module only moves
//! attribute maps.
//!
//! # Configuration
//!
//! - `JOB_SEEKER_TABLE_NAME`, `EMPLOYERS_TABLE_NAME`, `JOBS_TABLE_NAME`: table names
//! - `DYNAMO_GSI_1`: secondary index name (default `GSI1`)
//! - `DYNAMODB_ENDPOINT_URL`: optional endpoint for a local DynamoDB
//! - standard AWS credential chain for region and credentials

mod backend;
pub mod conversions;
pub mod error;

pub use backend::DynamoDbBackend;
