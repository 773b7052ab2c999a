use uuid::Uuid;

use jobli_core::employer::{
    validate_answers, CreateEmployerJobRequest, EmployerJob, ScreeningAnswer,
    ENTITY_TYPE_EMPLOYER, ENTITY_TYPE_EMPLOYER_JOB,
};
use jobli_core::record::{keys, SingleTableRecord};
use jobli_core::storage::{RepositoryError, Result, TableBackend};

use super::decode_all;
use crate::store::SingleTableStore;

/// Jobs posted by employers, indexed by employer on `GSI1`.
///
/// Holds the employers store as well so job creation can check that the
/// owning employer exists.
pub struct EmployerJobRepository<B> {
    jobs: SingleTableStore<B>,
    employers: SingleTableStore<B>,
}

impl<B: TableBackend> EmployerJobRepository<B> {
    pub fn new(jobs: SingleTableStore<B>, employers: SingleTableStore<B>) -> Self {
        Self { jobs, employers }
    }

    /// Posts a new job for an existing employer.
    pub async fn create(
        &self,
        employer_id: Uuid,
        request: CreateEmployerJobRequest,
        actor: &str,
    ) -> Result<EmployerJob> {
        let employer = self
            .employers
            .get(&keys::employer_pk(employer_id), keys::DELIMITER)
            .await?;
        if employer.is_none() {
            return Err(RepositoryError::not_found(
                ENTITY_TYPE_EMPLOYER,
                employer_id.to_string(),
            ));
        }

        let job = request.into_job(employer_id)?;
        tracing::info!(%employer_id, job_id = %job.id, "Creating job");
        let item = self.jobs.create(&job, actor).await?;
        EmployerJob::from_attributes(&item)
    }

    pub async fn find(&self, job_id: Uuid) -> Result<Option<EmployerJob>> {
        self.jobs
            .get(&keys::job_pk(job_id), keys::DELIMITER)
            .await?
            .map(|item| EmployerJob::from_attributes(&item))
            .transpose()
    }

    pub async fn get(&self, job_id: Uuid) -> Result<EmployerJob> {
        self.find(job_id).await?.ok_or_else(|| {
            RepositoryError::not_found(ENTITY_TYPE_EMPLOYER_JOB, job_id.to_string())
        })
    }

    /// Reads a job through its owner. A job of another employer is a bad
    /// request, not a miss.
    pub async fn get_for_employer(&self, employer_id: Uuid, job_id: Uuid) -> Result<EmployerJob> {
        let job = self.get(job_id).await?;
        ensure_owner(&job, employer_id)?;
        Ok(job)
    }

    /// Every job of an employer, via the employer index.
    pub async fn list_by_employer(&self, employer_id: Uuid) -> Result<Vec<EmployerJob>> {
        let items = self
            .jobs
            .query_by_secondary_index(&keys::job_gsi1_pk(employer_id), Some(keys::JOB_PREFIX))
            .await?;
        decode_all(items)
    }

    /// Every job of every employer.
    pub async fn list_all(&self) -> Result<Vec<EmployerJob>> {
        let items = self.jobs.scan_by_prefix(keys::JOB_PREFIX).await?;
        decode_all(items)
    }

    pub async fn update(&self, job: &EmployerJob, actor: &str) -> Result<EmployerJob> {
        let item = self.jobs.update(job, actor).await?;
        EmployerJob::from_attributes(&item)
    }

    /// Replaces the screening answers of a job.
    ///
    /// Reads the job with a consistent read and writes it back under the
    /// version it was read with.
    pub async fn update_answers(
        &self,
        employer_id: Uuid,
        job_id: Uuid,
        answers: Vec<ScreeningAnswer>,
        actor: &str,
    ) -> Result<EmployerJob> {
        validate_answers(&answers)?;

        let item = self
            .jobs
            .get_consistent(&keys::job_pk(job_id), keys::DELIMITER)
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(ENTITY_TYPE_EMPLOYER_JOB, job_id.to_string())
            })?;
        let mut job = EmployerJob::from_attributes(&item)?;
        ensure_owner(&job, employer_id)?;

        job.answers = answers;
        self.update(&job, actor).await
    }
}

fn ensure_owner(job: &EmployerJob, employer_id: Uuid) -> Result<()> {
    if job.employer_id != employer_id {
        return Err(RepositoryError::bad_request(format!(
            "Job {} does not belong to employer {}",
            job.id, employer_id
        )));
    }
    Ok(())
}
