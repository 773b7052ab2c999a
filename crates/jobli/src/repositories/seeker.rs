use jobli_core::record::{keys, SingleTableRecord};
use jobli_core::seeker::{CreateJobSeekerRequest, JobSeeker, ENTITY_TYPE_JOB_SEEKER};
use jobli_core::storage::{RepositoryError, Result, TableBackend};

use crate::store::SingleTableStore;

/// Job seeker profiles, one row per seeker.
pub struct JobSeekerRepository<B> {
    store: SingleTableStore<B>,
}

impl<B: TableBackend> JobSeekerRepository<B> {
    pub fn new(store: SingleTableStore<B>) -> Self {
        Self { store }
    }

    /// Registers the profile of `seeker_id`, an identity-provider subject.
    pub async fn create(
        &self,
        seeker_id: &str,
        request: CreateJobSeekerRequest,
        actor: &str,
    ) -> Result<JobSeeker> {
        keys::validate_segment("seeker_id", seeker_id)?;
        let seeker = request.into_job_seeker(seeker_id)?;

        tracing::debug!(seeker_id, "Creating job seeker");
        let item = self.store.create(&seeker, actor).await?;
        JobSeeker::from_attributes(&item)
    }

    pub async fn find(&self, seeker_id: &str) -> Result<Option<JobSeeker>> {
        keys::validate_segment("seeker_id", seeker_id)?;
        self.store
            .get(&keys::job_seeker_pk(seeker_id), &keys::job_seeker_sk())
            .await?
            .map(|item| JobSeeker::from_attributes(&item))
            .transpose()
    }

    pub async fn get(&self, seeker_id: &str) -> Result<JobSeeker> {
        self.find(seeker_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found(ENTITY_TYPE_JOB_SEEKER, seeker_id))
    }

    /// Versioned replace of a profile previously read from the store.
    pub async fn update(&self, seeker: &JobSeeker, actor: &str) -> Result<JobSeeker> {
        keys::validate_segment("seeker_id", &seeker.id)?;
        let item = self.store.update(seeker, actor).await?;
        JobSeeker::from_attributes(&item)
    }
}
