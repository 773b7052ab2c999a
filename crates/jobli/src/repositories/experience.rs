use uuid::Uuid;

use jobli_core::record::{keys, SingleTableRecord};
use jobli_core::seeker::{Experience, ExperienceRequest, ENTITY_TYPE_EXPERIENCE};
use jobli_core::storage::{BatchOutcome, RepositoryError, Result, TableBackend};

use super::decode_all;
use crate::store::SingleTableStore;

/// Work experience entries, partitioned per seeker.
pub struct ExperienceRepository<B> {
    store: SingleTableStore<B>,
}

impl<B: TableBackend> ExperienceRepository<B> {
    pub fn new(store: SingleTableStore<B>) -> Self {
        Self { store }
    }

    /// Stores a new entry under a fresh experience id.
    pub async fn create(
        &self,
        seeker_id: &str,
        request: ExperienceRequest,
        actor: &str,
    ) -> Result<Experience> {
        keys::validate_segment("seeker_id", seeker_id)?;
        let experience = request.into_experience(seeker_id)?;

        tracing::debug!(
            seeker_id,
            experience_id = %experience.experience_id,
            "Creating experience"
        );
        let item = self.store.create(&experience, actor).await?;
        Experience::from_attributes(&item)
    }

    pub async fn get(&self, seeker_id: &str, experience_id: Uuid) -> Result<Experience> {
        keys::validate_segment("seeker_id", seeker_id)?;
        let item = self
            .store
            .get(
                &keys::experience_pk(seeker_id),
                &keys::experience_sk(experience_id),
            )
            .await?
            .ok_or_else(|| {
                RepositoryError::not_found(ENTITY_TYPE_EXPERIENCE, experience_id.to_string())
            })?;
        Experience::from_attributes(&item)
    }

    /// Every experience entry of a seeker.
    pub async fn get_all(&self, seeker_id: &str) -> Result<Vec<Experience>> {
        keys::validate_segment("seeker_id", seeker_id)?;
        let items = self
            .store
            .query_by_partition_and_sort_prefix(
                &keys::experience_pk(seeker_id),
                keys::EXPERIENCE_ID_PREFIX,
            )
            .await?;
        decode_all(items)
    }

    pub async fn update(&self, experience: &Experience, actor: &str) -> Result<Experience> {
        keys::validate_segment("seeker_id", &experience.seeker_id)?;
        let item = self.store.update(experience, actor).await?;
        Experience::from_attributes(&item)
    }

    /// Hard delete. Deleting a missing entry succeeds.
    pub async fn delete(&self, seeker_id: &str, experience_id: Uuid) -> Result<()> {
        keys::validate_segment("seeker_id", seeker_id)?;
        tracing::info!(seeker_id, %experience_id, "Deleting experience");
        self.store
            .remove_item(
                &keys::experience_pk(seeker_id),
                &keys::experience_sk(experience_id),
            )
            .await
    }

    /// Deletes every entry of a seeker: one query, then a best-effort batch.
    pub async fn delete_all(&self, seeker_id: &str) -> Result<BatchOutcome> {
        let experiences = self.get_all(seeker_id).await?;
        if experiences.is_empty() {
            return Ok(BatchOutcome::default());
        }
        tracing::info!(seeker_id, count = experiences.len(), "Deleting all experience");
        self.store.remove_batch(&experiences).await
    }
}
