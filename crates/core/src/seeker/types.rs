use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::matching::AnswerSheet;
use crate::record::Audit;

/// A job seeker's profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSeeker {
    /// Subject id issued by the identity provider.
    pub id: String,
    pub full_name: String,
    /// Epoch milliseconds.
    pub birth_date: i64,
    pub address: String,
    pub email: String,
    pub languages: Option<Vec<String>>,
    pub about_me: Option<String>,
    pub job_ambitions: Option<String>,
    pub hobbies: Option<String>,
    /// `s3://` references to uploaded media.
    pub media: Vec<String>,
    pub audit: Audit,
}

impl JobSeeker {
    pub fn new(
        id: impl Into<String>,
        full_name: impl Into<String>,
        birth_date: i64,
        address: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            birth_date,
            address: address.into(),
            email: email.into(),
            languages: None,
            about_me: None,
            job_ambitions: None,
            hobbies: None,
            media: Vec::new(),
            audit: Audit::default(),
        }
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = Some(languages);
        self
    }

    pub fn with_about_me(mut self, about_me: impl Into<String>) -> Self {
        self.about_me = Some(about_me.into());
        self
    }
}

/// One work-history entry of a seeker.
///
/// Years are not cross-checked; an end year before the start year is stored
/// as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub seeker_id: String,
    pub experience_id: Uuid,
    pub workplace: String,
    pub year_start: i32,
    pub year_end: i32,
    pub role: String,
    pub role_description: String,
    pub audit: Audit,
}

impl Experience {
    pub fn new(
        seeker_id: impl Into<String>,
        workplace: impl Into<String>,
        year_start: i32,
        year_end: i32,
        role: impl Into<String>,
    ) -> Self {
        Self {
            seeker_id: seeker_id.into(),
            experience_id: Uuid::new_v4(),
            workplace: workplace.into(),
            year_start,
            year_end,
            role: role.into(),
            role_description: String::new(),
            audit: Audit::default(),
        }
    }

    pub fn with_role_description(mut self, description: impl Into<String>) -> Self {
        self.role_description = description.into();
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.experience_id = id;
        self
    }
}

/// A seeker's answers to the ten matching questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSeekerAnswers {
    pub seeker_id: String,
    /// Display name copied from the identity provider.
    pub seeker_name: String,
    pub answers: AnswerSheet,
    pub audit: Audit,
}

impl JobSeekerAnswers {
    pub fn new(
        seeker_id: impl Into<String>,
        seeker_name: impl Into<String>,
        answers: AnswerSheet,
    ) -> Self {
        Self {
            seeker_id: seeker_id.into(),
            seeker_name: seeker_name.into(),
            answers,
            audit: Audit::default(),
        }
    }
}
