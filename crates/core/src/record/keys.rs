//! Key derivation for every record kind.
//!
//! Pure functions that build partition, sort and index keys. Segments are
//! joined with `#` behind short all-caps tags.

use uuid::Uuid;

use crate::storage::{RepositoryError, Result};

// ============================================================================
// Key prefixes
// ============================================================================

pub const DELIMITER: &str = "#";
pub const JOB_SEEKER_PREFIX: &str = "JOB_SEEKER#";
pub const EXPERIENCE_PREFIX: &str = "EXPERIENCE#";
pub const EXPERIENCE_ID_PREFIX: &str = "EXPERIENCE_ID#";
pub const JOB_SEEKER_ANSWERS_PK: &str = "JOB_SEEKER_ANSWER";
pub const JOB_SEEKER_ID_PREFIX: &str = "JOB_SEEKER_ID#";
pub const EMPLOYER_PREFIX: &str = "EMPLOYER#";
pub const JOB_PREFIX: &str = "JOB#";

/// Checks an externally supplied identity segment.
///
/// Rejects empty values and values containing the delimiter, which would
/// let one identity's keys collide with another's prefix.
pub fn validate_segment(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RepositoryError::BadRequest(format!(
            "{field} cannot be empty"
        )));
    }
    if value.contains(DELIMITER) {
        return Err(RepositoryError::BadRequest(format!(
            "{field} cannot contain '{DELIMITER}'"
        )));
    }
    Ok(())
}

// ============================================================================
// Job seeker keys
// ============================================================================

/// Generate partition key for a JobSeeker profile.
///
/// Pattern: `JOB_SEEKER#<seeker_id>`
pub fn job_seeker_pk(seeker_id: &str) -> String {
    format!("{JOB_SEEKER_PREFIX}{seeker_id}")
}

/// Generate sort key for a JobSeeker profile.
///
/// Pattern: `#` (one profile row per seeker)
pub fn job_seeker_sk() -> String {
    DELIMITER.to_string()
}

// ============================================================================
// Experience keys
// ============================================================================

/// Generate partition key for a seeker's experiences.
///
/// Pattern: `EXPERIENCE#<seeker_id>`
pub fn experience_pk(seeker_id: &str) -> String {
    format!("{EXPERIENCE_PREFIX}{seeker_id}")
}

/// Generate sort key for one Experience.
///
/// Pattern: `EXPERIENCE_ID#<experience_id>`
pub fn experience_sk(experience_id: Uuid) -> String {
    format!("{EXPERIENCE_ID_PREFIX}{experience_id}")
}

// ============================================================================
// Answer keys
// ============================================================================

/// Generate partition key shared by every seeker's answers.
///
/// Pattern: `JOB_SEEKER_ANSWER`
pub fn answers_pk() -> String {
    JOB_SEEKER_ANSWERS_PK.to_string()
}

/// Generate sort key for a seeker's answers.
///
/// Pattern: `JOB_SEEKER_ID#<seeker_id>`
pub fn answers_sk(seeker_id: &str) -> String {
    format!("{JOB_SEEKER_ID_PREFIX}{seeker_id}")
}

// ============================================================================
// Employer and job keys
// ============================================================================

/// Generate partition key for an Employer.
///
/// Pattern: `EMPLOYER#<employer_id>`
pub fn employer_pk(employer_id: Uuid) -> String {
    format!("{EMPLOYER_PREFIX}{employer_id}")
}

/// Generate partition key for an EmployerJob.
///
/// Pattern: `JOB#<job_id>`
pub fn job_pk(job_id: Uuid) -> String {
    format!("{JOB_PREFIX}{job_id}")
}

/// Generate GSI1 partition key for jobs by employer.
///
/// Pattern: `EMPLOYER#<employer_id>`
pub fn job_gsi1_pk(employer_id: Uuid) -> String {
    employer_pk(employer_id)
}

/// Generate GSI1 sort key for jobs by employer.
///
/// Pattern: `JOB#<job_id>`
pub fn job_gsi1_sk(job_id: Uuid) -> String {
    job_pk(job_id)
}
