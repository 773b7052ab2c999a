//! Request payloads for seeker-side operations.
//!
//! Pure data types with validation; the gateway deserializes these and the
//! repositories turn them into records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::{AnswerError, AnswerSheet};
use crate::storage::RepositoryError;

use super::types::{Experience, JobSeeker, JobSeekerAnswers};

/// Validation failures of seeker payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SeekerError {
    #[error("Full name cannot be empty")]
    EmptyName,
    #[error("Invalid email: {0}")]
    InvalidEmail(String),
    #[error("Workplace cannot be empty")]
    EmptyWorkplace,
    #[error(transparent)]
    Answers(#[from] AnswerError),
}

impl From<SeekerError> for RepositoryError {
    fn from(err: SeekerError) -> Self {
        RepositoryError::BadRequest(err.to_string())
    }
}

fn validate_email(email: &str) -> Result<(), SeekerError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(SeekerError::InvalidEmail(email.to_string())),
    }
}

/// Request payload for creating a seeker profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobSeekerRequest {
    pub full_name: String,
    pub birth_date: i64,
    pub address: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_ambitions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<String>,
}

impl CreateJobSeekerRequest {
    pub fn validate(&self) -> Result<(), SeekerError> {
        if self.full_name.trim().is_empty() {
            return Err(SeekerError::EmptyName);
        }
        validate_email(&self.email)
    }

    /// Builds the profile of `seeker_id`.
    pub fn into_job_seeker(self, seeker_id: impl Into<String>) -> Result<JobSeeker, SeekerError> {
        self.validate()?;
        let mut seeker = JobSeeker::new(
            seeker_id,
            self.full_name,
            self.birth_date,
            self.address,
            self.email,
        );
        seeker.languages = self.languages;
        seeker.about_me = self.about_me;
        seeker.job_ambitions = self.job_ambitions;
        seeker.hobbies = self.hobbies;
        Ok(seeker)
    }
}

/// Partial update of a seeker profile. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJobSeekerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_ambitions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hobbies: Option<String>,
}

impl UpdateJobSeekerRequest {
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_hobbies(mut self, hobbies: impl Into<String>) -> Self {
        self.hobbies = Some(hobbies.into());
        self
    }

    /// Applies the present fields to `seeker`, keeping its audit stamps.
    pub fn apply_to(self, seeker: &mut JobSeeker) -> Result<(), SeekerError> {
        if let Some(full_name) = self.full_name {
            if full_name.trim().is_empty() {
                return Err(SeekerError::EmptyName);
            }
            seeker.full_name = full_name;
        }
        if let Some(email) = self.email {
            validate_email(&email)?;
            seeker.email = email;
        }
        if let Some(address) = self.address {
            seeker.address = address;
        }
        if self.languages.is_some() {
            seeker.languages = self.languages;
        }
        if self.about_me.is_some() {
            seeker.about_me = self.about_me;
        }
        if self.job_ambitions.is_some() {
            seeker.job_ambitions = self.job_ambitions;
        }
        if self.hobbies.is_some() {
            seeker.hobbies = self.hobbies;
        }
        Ok(())
    }
}

/// Request payload for an experience entry (create and full replace).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceRequest {
    pub workplace: String,
    pub year_start: i32,
    pub year_end: i32,
    pub role: String,
    #[serde(default)]
    pub role_description: String,
}

impl ExperienceRequest {
    pub fn into_experience(self, seeker_id: impl Into<String>) -> Result<Experience, SeekerError> {
        if self.workplace.trim().is_empty() {
            return Err(SeekerError::EmptyWorkplace);
        }
        Ok(Experience::new(
            seeker_id,
            self.workplace,
            self.year_start,
            self.year_end,
            self.role,
        )
        .with_role_description(self.role_description))
    }

    /// Replaces the content fields of `experience`, keeping identity and audit.
    pub fn apply_to(self, experience: &mut Experience) -> Result<(), SeekerError> {
        if self.workplace.trim().is_empty() {
            return Err(SeekerError::EmptyWorkplace);
        }
        experience.workplace = self.workplace;
        experience.year_start = self.year_start;
        experience.year_end = self.year_end;
        experience.role = self.role;
        experience.role_description = self.role_description;
        Ok(())
    }
}

/// Ten positional answers, `null` for unanswered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswersRequest {
    pub answers: Vec<Option<bool>>,
}

impl AnswersRequest {
    pub fn to_sheet(&self) -> Result<AnswerSheet, SeekerError> {
        Ok(AnswerSheet::from_slots(&self.answers)?)
    }

    pub fn into_answers(
        self,
        seeker_id: impl Into<String>,
        seeker_name: impl Into<String>,
    ) -> Result<JobSeekerAnswers, SeekerError> {
        let sheet = self.to_sheet()?;
        Ok(JobSeekerAnswers::new(seeker_id, seeker_name, sheet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateJobSeekerRequest {
        CreateJobSeekerRequest {
            full_name: "Noa Levi".to_string(),
            birth_date: 631_152_000_000,
            address: "Haifa".to_string(),
            email: "noa@example.com".to_string(),
            languages: None,
            about_me: None,
            job_ambitions: Some("Chef".to_string()),
            hobbies: None,
        }
    }

    #[test]
    fn test_into_job_seeker() {
        let seeker = create_request().into_job_seeker("u-1").unwrap();
        assert_eq!(seeker.id, "u-1");
        assert_eq!(seeker.job_ambitions.as_deref(), Some("Chef"));
        assert_eq!(seeker.audit.version, 0);
        assert!(!seeker.audit.is_persisted());
    }

    #[test]
    fn test_create_rejects_bad_email_and_name() {
        let mut request = create_request();
        request.email = "noa.example.com".to_string();
        assert_eq!(
            request.validate(),
            Err(SeekerError::InvalidEmail("noa.example.com".to_string()))
        );

        let mut request = create_request();
        request.full_name = "  ".to_string();
        assert_eq!(request.validate(), Err(SeekerError::EmptyName));
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let mut seeker = create_request().into_job_seeker("u-1").unwrap();
        UpdateJobSeekerRequest::default()
            .with_hobbies("Climbing")
            .apply_to(&mut seeker)
            .unwrap();

        assert_eq!(seeker.hobbies.as_deref(), Some("Climbing"));
        assert_eq!(seeker.full_name, "Noa Levi");
        assert_eq!(seeker.job_ambitions.as_deref(), Some("Chef"));
    }

    #[test]
    fn test_experience_request_allows_inverted_years() {
        let experience = ExperienceRequest {
            workplace: "Cafe".to_string(),
            year_start: 2020,
            year_end: 2018,
            role: "Barista".to_string(),
            role_description: String::new(),
        }
        .into_experience("u-1")
        .unwrap();
        assert_eq!(experience.year_end, 2018);
    }

    #[test]
    fn test_answers_request_length() {
        let request = AnswersRequest {
            answers: vec![Some(true); 4],
        };
        let err: RepositoryError = request.to_sheet().unwrap_err().into();
        assert_eq!(
            err,
            RepositoryError::BadRequest("Expected 10 answers, got 4".to_string())
        );
    }
}
