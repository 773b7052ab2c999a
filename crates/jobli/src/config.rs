use std::env;

use jobli_core::matching::DEFAULT_MAX_RESULTS;
use jobli_core::storage::{TableSchema, DEFAULT_INDEX_NAME};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Single table holding seekers, experience and answers (default: "jobli")
    pub seeker_table_name: String,
    /// Employers table (default: "jobli_employers")
    pub employers_table_name: String,
    /// Jobs table (default: "jobli_jobs")
    pub jobs_table_name: String,
    /// Name of the secondary index on the seeker and jobs tables (default: "GSI1")
    pub index_name: String,
    /// Endpoint override for a local DynamoDB.
    /// Note: Only used when the `dynamodb` feature is enabled.
    pub dynamodb_endpoint_url: Option<String>,
    /// Bucket media files are uploaded to (default: "jobli-media")
    pub media_bucket_name: String,
    /// Result limit when a match request names none (default: 100)
    pub match_max_results: usize,
    /// Page size of the in-memory backend (default: 100)
    pub inmemory_page_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `JOB_SEEKER_TABLE_NAME` - Seeker single table (default: "jobli")
    /// - `EMPLOYERS_TABLE_NAME` - Employers table (default: "jobli_employers")
    /// - `JOBS_TABLE_NAME` - Jobs table (default: "jobli_jobs")
    /// - `DYNAMO_GSI_1` - Secondary index name (default: "GSI1")
    /// - `DYNAMODB_ENDPOINT_URL` - Local DynamoDB endpoint (optional)
    /// - `MEDIA_BUCKET_NAME` - Media bucket (default: "jobli-media")
    /// - `MATCH_MAX_RESULTS` - Default match limit (default: 100)
    /// - `INMEMORY_PAGE_SIZE` - In-memory page size (default: 100)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let string_or =
            |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let number_or = |name: &str, default: usize| {
            lookup(name)
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };

        Self {
            seeker_table_name: string_or("JOB_SEEKER_TABLE_NAME", "jobli"),
            employers_table_name: string_or("EMPLOYERS_TABLE_NAME", "jobli_employers"),
            jobs_table_name: string_or("JOBS_TABLE_NAME", "jobli_jobs"),
            index_name: string_or("DYNAMO_GSI_1", DEFAULT_INDEX_NAME),
            dynamodb_endpoint_url: lookup("DYNAMODB_ENDPOINT_URL").filter(|v| !v.is_empty()),
            media_bucket_name: string_or("MEDIA_BUCKET_NAME", "jobli-media"),
            match_max_results: number_or("MATCH_MAX_RESULTS", DEFAULT_MAX_RESULTS),
            inmemory_page_size: number_or("INMEMORY_PAGE_SIZE", 100),
        }
    }

    /// Seeker single table: `pk`/`sk` plus the secondary index.
    pub fn seeker_schema(&self) -> TableSchema {
        TableSchema::single_table(&self.seeker_table_name, &self.index_name)
    }

    /// Employers table, keyed by `pk` only.
    pub fn employers_schema(&self) -> TableSchema {
        TableSchema::partition_only(&self.employers_table_name)
    }

    /// Jobs table, keyed by `pk` with the employer index.
    pub fn jobs_schema(&self) -> TableSchema {
        TableSchema::partition_only(&self.jobs_table_name).with_index(&self.index_name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = config_from(&[]);

        assert_eq!(config.seeker_table_name, "jobli");
        assert_eq!(config.employers_table_name, "jobli_employers");
        assert_eq!(config.jobs_table_name, "jobli_jobs");
        assert_eq!(config.index_name, "GSI1");
        assert_eq!(config.dynamodb_endpoint_url, None);
        assert_eq!(config.media_bucket_name, "jobli-media");
        assert_eq!(config.match_max_results, 100);
        assert_eq!(config.inmemory_page_size, 100);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("JOB_SEEKER_TABLE_NAME", "seekers-dev"),
            ("DYNAMO_GSI_1", "ByEmployer"),
            ("DYNAMODB_ENDPOINT_URL", "http://localhost:8000"),
            ("MATCH_MAX_RESULTS", "25"),
        ]);

        assert_eq!(config.seeker_table_name, "seekers-dev");
        assert_eq!(config.index_name, "ByEmployer");
        assert_eq!(
            config.dynamodb_endpoint_url.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.match_max_results, 25);
    }

    #[test]
    fn test_schemas() {
        let config = config_from(&[("JOBS_TABLE_NAME", "jobs-dev")]);

        let seekers = config.seeker_schema();
        assert_eq!(seekers.sort_key.as_deref(), Some("sk"));
        assert!(seekers.index.is_some());

        let employers = config.employers_schema();
        assert_eq!(employers.table_name, "jobli_employers");
        assert!(employers.sort_key.is_none());
        assert!(employers.index.is_none());

        let jobs = config.jobs_schema();
        assert_eq!(jobs.table_name, "jobs-dev");
        assert_eq!(jobs.index.map(|i| i.name).as_deref(), Some("GSI1"));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("MATCH_MAX_RESULTS", "lots"), ("INMEMORY_PAGE_SIZE", "0")]);

        assert_eq!(config.match_max_results, 100);
        assert_eq!(config.inmemory_page_size, 100);
    }
}
