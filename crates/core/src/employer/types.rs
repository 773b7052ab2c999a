use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::matching::AnswerVector;
use crate::record::Audit;

/// Maximum number of screening answers on a job.
pub const MAX_SCREENING_ANSWERS: usize = 10;

/// Postal address; every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apartment: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.full_address.is_none()
            && self.city.is_none()
            && self.street.is_none()
            && self.apartment.is_none()
    }
}

/// A business that posts jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employer {
    pub id: Uuid,
    pub email: String,
    pub business_name: String,
    pub address: Address,
    pub website: Option<Url>,
    pub description: Option<String>,
    pub terms: Vec<String>,
    pub media: Vec<String>,
    pub audit: Audit,
}

impl Employer {
    pub fn new(email: impl Into<String>, business_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            business_name: business_name.into(),
            address: Address::default(),
            website: None,
            description: None,
            terms: Vec::new(),
            media: Vec::new(),
            audit: Audit::default(),
        }
    }

    pub fn with_website(mut self, website: Url) -> Self {
        self.website = Some(website);
        self
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Time-of-day window of a time-based job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// How much of the week a job takes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobScope {
    Full,
    Partial,
    TimeBased { windows: Vec<TimeWindow> },
}

impl JobScope {
    /// Stored tag of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobScope::Full => "full",
            JobScope::Partial => "partial",
            JobScope::TimeBased { .. } => "time_based",
        }
    }

    pub fn windows(&self) -> &[TimeWindow] {
        match self {
            JobScope::TimeBased { windows } => windows,
            _ => &[],
        }
    }
}

/// A screening question with the employer's expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningAnswer {
    pub key: String,
    pub question: String,
    pub answer: bool,
}

impl ScreeningAnswer {
    pub fn new(key: impl Into<String>, question: impl Into<String>, answer: bool) -> Self {
        Self {
            key: key.into(),
            question: question.into(),
            answer,
        }
    }
}

/// A job posted by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerJob {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub fields: Vec<String>,
    pub name: String,
    pub description: String,
    pub headcount: u32,
    pub scope: JobScope,
    pub answers: Vec<ScreeningAnswer>,
    pub requirements: Vec<String>,
    pub salary: Option<u64>,
    pub experience_needed: Option<String>,
    pub media: Vec<String>,
    pub audit: Audit,
}

impl EmployerJob {
    pub fn new(employer_id: Uuid, name: impl Into<String>, scope: JobScope) -> Self {
        Self {
            id: Uuid::new_v4(),
            employer_id,
            fields: Vec::new(),
            name: name.into(),
            description: String::new(),
            headcount: 1,
            scope,
            answers: Vec::new(),
            requirements: Vec::new(),
            salary: None,
            experience_needed: None,
            media: Vec::new(),
            audit: Audit::default(),
        }
    }

    pub fn with_answers(mut self, answers: Vec<ScreeningAnswer>) -> Self {
        self.answers = answers;
        self
    }

    /// Sets a specific ID (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Screening answers in list order, when there are exactly ten.
    pub fn answer_vector(&self) -> Option<AnswerVector> {
        let answers: Vec<bool> = self.answers.iter().map(|a| a.answer).collect();
        AnswerVector::from_answers(&answers)
    }
}
