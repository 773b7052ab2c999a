//! Request payloads for employers and jobs.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::storage::RepositoryError;

use super::types::{
    Address, Employer, EmployerJob, JobScope, ScreeningAnswer, MAX_SCREENING_ANSWERS,
};

/// Validation failures of employer and job payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmployerError {
    #[error("Business name cannot be empty")]
    EmptyBusinessName,
    #[error("Invalid website: {0}")]
    InvalidWebsite(String),
    #[error("Job name cannot be empty")]
    EmptyJobName,
    #[error("Headcount must be at least 1")]
    ZeroHeadcount,
    #[error("A job has at most 10 screening answers, got {0}")]
    TooManyAnswers(usize),
    #[error("Time-based jobs need at least one time window")]
    MissingTimeWindows,
    #[error("Time window must end after it starts")]
    InvalidTimeWindow,
}

impl From<EmployerError> for RepositoryError {
    fn from(err: EmployerError) -> Self {
        RepositoryError::BadRequest(err.to_string())
    }
}

/// Parses an absolute `http`/`https` URL.
pub fn parse_website(value: &str) -> Result<Url, EmployerError> {
    let url = Url::parse(value).map_err(|_| EmployerError::InvalidWebsite(value.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(EmployerError::InvalidWebsite(value.to_string())),
    }
}

/// Checks the invariants of a job that storage relies on.
pub fn validate_job(job: &EmployerJob) -> Result<(), EmployerError> {
    if job.name.trim().is_empty() {
        return Err(EmployerError::EmptyJobName);
    }
    if job.headcount == 0 {
        return Err(EmployerError::ZeroHeadcount);
    }
    validate_answers(&job.answers)?;
    if let JobScope::TimeBased { windows } = &job.scope {
        if windows.is_empty() {
            return Err(EmployerError::MissingTimeWindows);
        }
        if windows.iter().any(|w| w.end <= w.start) {
            return Err(EmployerError::InvalidTimeWindow);
        }
    }
    Ok(())
}

pub fn validate_answers(answers: &[ScreeningAnswer]) -> Result<(), EmployerError> {
    if answers.len() > MAX_SCREENING_ANSWERS {
        return Err(EmployerError::TooManyAnswers(answers.len()));
    }
    Ok(())
}

/// Request payload for registering an employer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployerRequest {
    pub email: String,
    pub business_name: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub terms: Vec<String>,
}

impl CreateEmployerRequest {
    pub fn new(email: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            business_name: business_name.into(),
            address: Address::default(),
            website: None,
            description: None,
            terms: Vec::new(),
        }
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// Builds a new employer with a fresh id.
    pub fn into_employer(self) -> Result<Employer, EmployerError> {
        if self.business_name.trim().is_empty() {
            return Err(EmployerError::EmptyBusinessName);
        }
        let website = self.website.as_deref().map(parse_website).transpose()?;

        let mut employer = Employer::new(self.email, self.business_name).with_address(self.address);
        employer.website = website;
        employer.description = self.description;
        employer.terms = self.terms;
        Ok(employer)
    }
}

/// Partial update of an employer. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms: Option<Vec<String>>,
}

impl UpdateEmployerRequest {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn apply_to(self, employer: &mut Employer) -> Result<(), EmployerError> {
        if let Some(business_name) = self.business_name {
            if business_name.trim().is_empty() {
                return Err(EmployerError::EmptyBusinessName);
            }
            employer.business_name = business_name;
        }
        if let Some(website) = self.website {
            employer.website = Some(parse_website(&website)?);
        }
        if let Some(email) = self.email {
            employer.email = email;
        }
        if let Some(address) = self.address {
            employer.address = address;
        }
        if self.description.is_some() {
            employer.description = self.description;
        }
        if let Some(terms) = self.terms {
            employer.terms = terms;
        }
        Ok(())
    }
}

fn default_headcount() -> u32 {
    1
}

/// Request payload for posting a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployerJobRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default = "default_headcount")]
    pub headcount: u32,
    pub scope: JobScope,
    #[serde(default)]
    pub answers: Vec<ScreeningAnswer>,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_needed: Option<String>,
}

impl CreateEmployerJobRequest {
    pub fn new(name: impl Into<String>, scope: JobScope) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            fields: Vec::new(),
            headcount: default_headcount(),
            scope,
            answers: Vec::new(),
            requirements: Vec::new(),
            salary: None,
            experience_needed: None,
        }
    }

    pub fn with_answers(mut self, answers: Vec<ScreeningAnswer>) -> Self {
        self.answers = answers;
        self
    }

    /// Builds a new job of `employer_id` with a fresh id.
    pub fn into_job(self, employer_id: Uuid) -> Result<EmployerJob, EmployerError> {
        let mut job = EmployerJob::new(employer_id, self.name, self.scope);
        job.description = self.description;
        job.fields = self.fields;
        job.headcount = self.headcount;
        job.answers = self.answers;
        job.requirements = self.requirements;
        job.salary = self.salary;
        job.experience_needed = self.experience_needed;
        validate_job(&job)?;
        Ok(job)
    }
}
