//! Application state wired once at startup.
//!
//! Config → backend → stores → repositories → services. Everything is shared
//! behind `Arc`, so cloning the state is cheap and every clone sees the same
//! backend.

use std::sync::Arc;

use jobli_core::storage::TableBackend;

use crate::config::Config;
use crate::matching::MatchingService;
use crate::media::{MediaService, ObjectStore};
use crate::repositories::{
    EmployerJobRepository, EmployerRepository, ExperienceRepository, JobSeekerAnswersRepository,
    JobSeekerRepository,
};
use crate::store::SingleTableStore;

/// Backend selected by the enabled storage feature.
#[cfg(feature = "dynamodb")]
pub type ActiveBackend = crate::storage::dynamodb::DynamoDbBackend;

/// Backend selected by the enabled storage feature.
#[cfg(not(feature = "dynamodb"))]
pub type ActiveBackend = crate::storage::inmemory::InMemoryBackend;

/// Shared application state.
pub struct AppState<B = ActiveBackend> {
    pub config: Arc<Config>,
    pub seekers: Arc<JobSeekerRepository<B>>,
    pub experience: Arc<ExperienceRepository<B>>,
    pub answers: Arc<JobSeekerAnswersRepository<B>>,
    pub employers: Arc<EmployerRepository<B>>,
    pub jobs: Arc<EmployerJobRepository<B>>,
    pub matching: Arc<MatchingService<B>>,
    pub media: Arc<MediaService<B, dyn ObjectStore>>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            seekers: self.seekers.clone(),
            experience: self.experience.clone(),
            answers: self.answers.clone(),
            employers: self.employers.clone(),
            jobs: self.jobs.clone(),
            matching: self.matching.clone(),
            media: self.media.clone(),
        }
    }
}

impl<B: TableBackend> AppState<B> {
    /// Wires repositories and services over an already connected backend.
    pub fn with_backend(config: Config, backend: Arc<B>, objects: Arc<dyn ObjectStore>) -> Self {
        let seeker_store = SingleTableStore::new(backend.clone(), config.seeker_schema());
        let employer_store = SingleTableStore::new(backend.clone(), config.employers_schema());
        let job_store = SingleTableStore::new(backend, config.jobs_schema());

        let seekers = Arc::new(JobSeekerRepository::new(seeker_store.clone()));
        let experience = Arc::new(ExperienceRepository::new(seeker_store.clone()));
        let answers = Arc::new(JobSeekerAnswersRepository::new(seeker_store));
        let employers = Arc::new(EmployerRepository::new(employer_store.clone()));
        let jobs = Arc::new(EmployerJobRepository::new(job_store, employer_store));

        let matching = Arc::new(
            MatchingService::new(answers.clone(), jobs.clone())
                .with_default_max_results(config.match_max_results),
        );
        let media = Arc::new(MediaService::new(seekers.clone(), jobs.clone(), objects));

        Self {
            config: Arc::new(config),
            seekers,
            experience,
            answers,
            employers,
            jobs,
            matching,
            media,
        }
    }
}

impl AppState<ActiveBackend> {
    /// Connects the configured backend and builds the state.
    pub async fn build(config: Config, objects: Arc<dyn ObjectStore>) -> Self {
        let backend = Arc::new(connect(&config).await);
        Self::with_backend(config, backend, objects)
    }
}

#[cfg(feature = "dynamodb")]
async fn connect(config: &Config) -> ActiveBackend {
    tracing::info!(
        endpoint = ?config.dynamodb_endpoint_url,
        seekers = %config.seeker_table_name,
        employers = %config.employers_table_name,
        jobs = %config.jobs_table_name,
        "Connecting to DynamoDB"
    );
    ActiveBackend::from_config(config.dynamodb_endpoint_url.as_deref()).await
}

#[cfg(not(feature = "dynamodb"))]
async fn connect(config: &Config) -> ActiveBackend {
    tracing::info!(page_size = config.inmemory_page_size, "Using in-memory storage");
    ActiveBackend::new(config.inmemory_page_size)
        .with_table(&config.seeker_schema())
        .with_table(&config.employers_schema())
        .with_table(&config.jobs_schema())
}
