//! Job/seeker recommendation on top of the repositories.
//!
//! Resolves answer vectors from storage and hands them to the pure ranking in
//! `jobli_core::matching`. Candidates without a complete answer vector never
//! appear in results.

use std::sync::Arc;

use uuid::Uuid;

use jobli_core::employer::EmployerJob;
use jobli_core::matching::{rank, AnswerVector, Scored, DEFAULT_MAX_RESULTS};
use jobli_core::seeker::JobSeekerAnswers;
use jobli_core::storage::{RepositoryError, Result, TableBackend};

use crate::repositories::{EmployerJobRepository, JobSeekerAnswersRepository};

pub struct MatchingService<B> {
    answers: Arc<JobSeekerAnswersRepository<B>>,
    jobs: Arc<EmployerJobRepository<B>>,
    default_max_results: usize,
}

impl<B: TableBackend> MatchingService<B> {
    pub fn new(
        answers: Arc<JobSeekerAnswersRepository<B>>,
        jobs: Arc<EmployerJobRepository<B>>,
    ) -> Self {
        Self {
            answers,
            jobs,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }

    /// Jobs ranked by agreement with a seeker's stored answers.
    pub async fn jobs_for_seeker(
        &self,
        seeker_id: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<Scored<EmployerJob>>> {
        let stored = self.answers.get(seeker_id).await?;
        let query = stored.answers.complete().ok_or_else(|| {
            RepositoryError::bad_request(format!(
                "Answers of job seeker {seeker_id} are incomplete"
            ))
        })?;

        let jobs = self.jobs.list_all().await?;
        let candidates = jobs.len();
        let ranked = rank(
            &query,
            jobs.into_iter().map(|job| (job.answer_vector(), job)),
            max_results.unwrap_or(self.default_max_results),
        );

        tracing::info!(seeker_id, candidates, matches = ranked.len(), "Ranked jobs for seeker");
        Ok(ranked)
    }

    /// Seekers ranked by agreement with an explicit answer vector.
    ///
    /// The query must hold exactly ten set answers.
    pub async fn seekers_for_answers(
        &self,
        query: &[Option<bool>],
        max_results: Option<usize>,
    ) -> Result<Vec<Scored<JobSeekerAnswers>>> {
        let query = AnswerVector::try_from(query)?;
        self.rank_seekers(&query, max_results).await
    }

    /// Seekers ranked by agreement with a job's screening answers.
    pub async fn seekers_for_job(
        &self,
        employer_id: Uuid,
        job_id: Uuid,
        max_results: Option<usize>,
    ) -> Result<Vec<Scored<JobSeekerAnswers>>> {
        let job = self.jobs.get_for_employer(employer_id, job_id).await?;
        let query = job.answer_vector().ok_or_else(|| {
            RepositoryError::bad_request(format!(
                "Job {job_id} does not define exactly ten screening answers"
            ))
        })?;
        self.rank_seekers(&query, max_results).await
    }

    async fn rank_seekers(
        &self,
        query: &AnswerVector,
        max_results: Option<usize>,
    ) -> Result<Vec<Scored<JobSeekerAnswers>>> {
        let seekers = self.answers.list_all().await?;
        let candidates = seekers.len();
        let ranked = rank(
            query,
            seekers
                .into_iter()
                .map(|seeker| (seeker.answers.complete(), seeker)),
            max_results.unwrap_or(self.default_max_results),
        );

        tracing::info!(candidates, matches = ranked.len(), "Ranked job seekers");
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use jobli_core::employer::{CreateEmployerJobRequest, CreateEmployerRequest, JobScope, ScreeningAnswer};
    use jobli_core::matching::score;
    use jobli_core::seeker::AnswersRequest;
    use jobli_core::storage::ErrorKind;

    use super::*;
    use crate::repositories::test_support::{employer_and_job_stores, seeker_store};
    use crate::repositories::EmployerRepository;
    use crate::storage::inmemory::InMemoryBackend;

    const T: bool = true;
    const F: bool = false;

    struct Fixture {
        service: MatchingService<InMemoryBackend>,
        answers: Arc<JobSeekerAnswersRepository<InMemoryBackend>>,
        jobs: Arc<EmployerJobRepository<InMemoryBackend>>,
        employers: EmployerRepository<InMemoryBackend>,
    }

    fn fixture() -> Fixture {
        let (employers, jobs) = employer_and_job_stores();
        let answers = Arc::new(JobSeekerAnswersRepository::new(seeker_store()));
        let jobs = Arc::new(EmployerJobRepository::new(jobs, employers.clone()));
        Fixture {
            service: MatchingService::new(answers.clone(), jobs.clone()),
            answers,
            jobs,
            employers: EmployerRepository::new(employers),
        }
    }

    fn screening(values: [bool; 10]) -> Vec<ScreeningAnswer> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ScreeningAnswer::new(format!("q{i}"), format!("Question {i}?"), *v))
            .collect()
    }

    async fn seeker(f: &Fixture, id: &str, answers: Vec<Option<bool>>) {
        f.answers
            .create(id, id, AnswersRequest { answers }, id)
            .await
            .unwrap();
    }

    async fn job(f: &Fixture, employer_id: Uuid, name: &str, answers: Vec<ScreeningAnswer>) -> EmployerJob {
        f.jobs
            .create(
                employer_id,
                CreateEmployerJobRequest::new(name, JobScope::Full).with_answers(answers),
                "admin",
            )
            .await
            .unwrap()
    }

    async fn employer(f: &Fixture) -> Uuid {
        f.employers
            .create(CreateEmployerRequest::new("hr@acme.test", "Acme"), "admin")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_answers_scenario_scores_eight() {
        let f = fixture();
        let seeker_answers = [T, T, T, F, T, T, F, F, T, F];
        let job_answers = [T, F, T, F, T, T, F, F, T, T];
        seeker(&f, "seeker-a", seeker_answers.iter().map(|v| Some(*v)).collect()).await;
        let employer_id = employer(&f).await;
        job(&f, employer_id, "J", screening(job_answers)).await;

        let ranked = f.service.jobs_for_seeker("seeker-a", None).await.unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].score, 8);
        assert_eq!(ranked[0].candidate.name, "J");
        assert_eq!(
            score(&AnswerVector(seeker_answers), &AnswerVector(job_answers)),
            8
        );
    }

    #[tokio::test]
    async fn test_jobs_for_seeker_skips_jobs_without_ten_answers() {
        let f = fixture();
        seeker(&f, "s", vec![Some(T); 10]).await;
        let employer_id = employer(&f).await;
        job(&f, employer_id, "complete", screening([T; 10])).await;
        job(&f, employer_id, "short", screening([T; 10])[..9].to_vec()).await;
        job(&f, employer_id, "none", Vec::new()).await;

        let ranked = f.service.jobs_for_seeker("s", None).await.unwrap();

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate.name, "complete");
        assert_eq!(ranked[0].score, 10);
    }

    #[tokio::test]
    async fn test_jobs_for_seeker_with_partial_answers_is_bad_request() {
        let f = fixture();
        let mut answers = vec![Some(T); 10];
        answers[9] = None;
        seeker(&f, "s", answers).await;

        let err = f.service.jobs_for_seeker("s", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_jobs_for_unknown_seeker_is_not_found() {
        let f = fixture();

        let err = f.service.jobs_for_seeker("ghost", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_seekers_for_answers_ranks_and_excludes_partial() {
        let f = fixture();
        seeker(&f, "all-true", vec![Some(T); 10]).await;
        seeker(&f, "all-false", vec![Some(F); 10]).await;
        let mut partial = vec![Some(T); 10];
        partial[0] = None;
        seeker(&f, "partial", partial).await;
        let mut mostly = vec![Some(T); 10];
        mostly[0] = Some(F);
        seeker(&f, "mostly-true", mostly).await;

        let ranked = f
            .service
            .seekers_for_answers(&[Some(T); 10], None)
            .await
            .unwrap();

        let ids: Vec<(&str, u8)> = ranked
            .iter()
            .map(|s| (s.candidate.seeker_id.as_str(), s.score))
            .collect();
        assert_eq!(ids, vec![("all-true", 10), ("mostly-true", 9), ("all-false", 0)]);
    }

    #[tokio::test]
    async fn test_seekers_for_answers_truncates() {
        let f = fixture();
        for i in 0..5 {
            seeker(&f, &format!("s{i}"), vec![Some(T); 10]).await;
        }

        let ranked = f
            .service
            .seekers_for_answers(&[Some(T); 10], Some(3))
            .await
            .unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[tokio::test]
    async fn test_seekers_for_incomplete_query_is_bad_request() {
        let f = fixture();

        let mut query = [Some(T); 10];
        query[4] = None;
        let err = f.service.seekers_for_answers(&query, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = f
            .service
            .seekers_for_answers(&[Some(T); 9], None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_seekers_for_job() {
        let f = fixture();
        seeker(&f, "match", vec![Some(F); 10]).await;
        seeker(&f, "opposite", vec![Some(T); 10]).await;
        let employer_id = employer(&f).await;
        let posted = job(&f, employer_id, "J", screening([F; 10])).await;

        let ranked = f
            .service
            .seekers_for_job(employer_id, posted.id, None)
            .await
            .unwrap();

        assert_eq!(ranked[0].candidate.seeker_id, "match");
        assert_eq!(ranked[0].score, 10);
        assert_eq!(ranked[1].score, 0);

        let err = f
            .service
            .seekers_for_job(Uuid::new_v4(), posted.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn test_seekers_for_job_without_answers_is_bad_request() {
        let f = fixture();
        let employer_id = employer(&f).await;
        let posted = job(&f, employer_id, "J", Vec::new()).await;

        let err = f
            .service
            .seekers_for_job(employer_id, posted.id, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
