use jobli_core::record::{keys, SingleTableRecord};
use jobli_core::seeker::{AnswersRequest, JobSeekerAnswers, ENTITY_TYPE_JOB_SEEKER_ANSWERS};
use jobli_core::storage::{BatchOutcome, RepositoryError, Result, TableBackend};

use super::decode_all;
use crate::store::SingleTableStore;

/// Screening answers of every seeker, kept in one shared partition so the
/// matching engine can read them with a single query.
pub struct JobSeekerAnswersRepository<B> {
    store: SingleTableStore<B>,
}

impl<B: TableBackend> JobSeekerAnswersRepository<B> {
    pub fn new(store: SingleTableStore<B>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        seeker_id: &str,
        seeker_name: &str,
        request: AnswersRequest,
        actor: &str,
    ) -> Result<JobSeekerAnswers> {
        keys::validate_segment("seeker_id", seeker_id)?;
        let answers = request.into_answers(seeker_id, seeker_name)?;

        let item = self.store.create(&answers, actor).await?;
        JobSeekerAnswers::from_attributes(&item)
    }

    pub async fn find(&self, seeker_id: &str) -> Result<Option<JobSeekerAnswers>> {
        keys::validate_segment("seeker_id", seeker_id)?;
        self.store
            .get(&keys::answers_pk(), &keys::answers_sk(seeker_id))
            .await?
            .map(|item| JobSeekerAnswers::from_attributes(&item))
            .transpose()
    }

    pub async fn get(&self, seeker_id: &str) -> Result<JobSeekerAnswers> {
        self.find(seeker_id).await?.ok_or_else(|| {
            RepositoryError::not_found(ENTITY_TYPE_JOB_SEEKER_ANSWERS, seeker_id)
        })
    }

    pub async fn update(
        &self,
        answers: &JobSeekerAnswers,
        actor: &str,
    ) -> Result<JobSeekerAnswers> {
        keys::validate_segment("seeker_id", &answers.seeker_id)?;
        let item = self.store.update(answers, actor).await?;
        JobSeekerAnswers::from_attributes(&item)
    }

    /// Every stored answer set, complete or not.
    pub async fn list_all(&self) -> Result<Vec<JobSeekerAnswers>> {
        let items = self
            .store
            .query_by_partition_and_sort_prefix(&keys::answers_pk(), keys::JOB_SEEKER_ID_PREFIX)
            .await?;
        decode_all(items)
    }

    /// Bulk load, overwriting existing answer sets.
    pub async fn import(&self, answers: &[JobSeekerAnswers], actor: &str) -> Result<BatchOutcome> {
        for entry in answers {
            keys::validate_segment("seeker_id", &entry.seeker_id)?;
        }
        tracing::info!(count = answers.len(), "Importing answer sets");
        self.store.write_batch(answers, actor).await
    }
}

#[cfg(test)]
mod tests {
    use jobli_core::matching::{AnswerSheet, AnswerVector};
    use jobli_core::storage::ErrorKind;

    use super::*;
    use crate::repositories::test_support::seeker_store;
    use crate::storage::inmemory::InMemoryBackend;

    fn repository() -> JobSeekerAnswersRepository<InMemoryBackend> {
        JobSeekerAnswersRepository::new(seeker_store())
    }

    fn all(value: bool) -> AnswersRequest {
        AnswersRequest {
            answers: vec![Some(value); 10],
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = repository();

        repo.create("u-1", "Noa", all(true), "u-1").await.unwrap();

        let stored = repo.get("u-1").await.unwrap();
        assert_eq!(stored.seeker_name, "Noa");
        assert!(stored.answers.is_complete());
    }

    #[tokio::test]
    async fn test_partial_answers_round_trip() {
        let repo = repository();
        let mut answers = vec![Some(true); 10];
        answers[3] = None;

        repo.create("u-1", "Noa", AnswersRequest { answers }, "u-1")
            .await
            .unwrap();

        let stored = repo.get("u-1").await.unwrap();
        assert_eq!(stored.answers.slots()[3], None);
        assert!(stored.answers.complete().is_none());
    }

    #[tokio::test]
    async fn test_wrong_length_is_bad_request() {
        let repo = repository();
        let request = AnswersRequest {
            answers: vec![Some(true); 9],
        };

        let err = repo.create("u-1", "Noa", request, "u-1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let repo = repository();

        assert_eq!(repo.get("u-9").await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_answers() {
        let repo = repository();
        let mut stored = repo.create("u-1", "Noa", all(true), "u-1").await.unwrap();

        stored.answers = AnswerSheet::from(AnswerVector([false; 10]));
        let updated = repo.update(&stored, "u-1").await.unwrap();

        assert_eq!(updated.audit.version, 1);
        assert_eq!(
            repo.get("u-1").await.unwrap().answers.complete(),
            Some(AnswerVector([false; 10]))
        );
    }

    #[tokio::test]
    async fn test_list_all_crosses_pages() {
        let repo = repository();
        for i in 0..5 {
            repo.create(&format!("u-{i}"), "Seeker", all(i % 2 == 0), "admin")
                .await
                .unwrap();
        }

        assert_eq!(repo.list_all().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_import() {
        let repo = repository();
        let batch: Vec<JobSeekerAnswers> = (0..30)
            .map(|i| {
                JobSeekerAnswers::new(
                    format!("u-{i}"),
                    format!("Seeker {i}"),
                    AnswerSheet::from(AnswerVector([true; 10])),
                )
            })
            .collect();

        let outcome = repo.import(&batch, "admin").await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(repo.list_all().await.unwrap().len(), 30);
        assert_eq!(repo.get("u-7").await.unwrap().audit.version, 0);
    }

    #[tokio::test]
    async fn test_import_over_existing_answers_keeps_version() {
        let repo = repository();
        let mut stored = repo.create("u-1", "Noa", all(true), "u-1").await.unwrap();
        for _ in 0..3 {
            stored = repo.update(&stored, "u-1").await.unwrap();
        }
        let stale = repo.get("u-1").await.unwrap();
        assert_eq!(stale.audit.version, 3);

        let replacement = JobSeekerAnswers::new(
            "u-1",
            "Noa",
            AnswerSheet::from(AnswerVector([false; 10])),
        );
        repo.import(&[replacement], "admin").await.unwrap();

        let imported = repo.get("u-1").await.unwrap();
        assert_eq!(imported.audit.version, 3);
        assert_eq!(imported.audit.created_at, stale.audit.created_at);
        assert_eq!(imported.audit.created_by.as_deref(), Some("u-1"));
        assert_eq!(imported.answers.complete(), Some(AnswerVector([false; 10])));

        let mut outdated = imported.clone();
        outdated.audit.version = 0;
        let err = repo.update(&outdated, "u-1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_ids() {
        let repo = repository();
        let batch = vec![JobSeekerAnswers::new(
            "u#1",
            "Bad",
            AnswerSheet::from(AnswerVector([true; 10])),
        )];

        let err = repo.import(&batch, "admin").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
