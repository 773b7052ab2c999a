//! Storage codecs for seeker-side records.

use serde_json::Value;

use crate::matching::{AnswerSheet, ANSWER_COUNT};
use crate::record::codec::{
    get_i32, get_i64, get_optional_bool, get_optional_string, get_string, get_string_list,
    get_uuid, put_optional, put_string,
};
use crate::record::{keys, Audit, SingleTableRecord};
use crate::storage::{AttributeMap, Result};

use super::types::{Experience, JobSeeker, JobSeekerAnswers};

// ============================================================================
// Entity type constants
// ============================================================================

pub const ENTITY_TYPE_JOB_SEEKER: &str = "JobSeeker";
pub const ENTITY_TYPE_EXPERIENCE: &str = "Experience";
pub const ENTITY_TYPE_JOB_SEEKER_ANSWERS: &str = "JobSeekerAnswers";

/// Attribute name of answer slot `position` (0-based): `a1`..`a10`.
pub fn answer_attribute(position: usize) -> String {
    format!("a{}", position + 1)
}

// ============================================================================
// JobSeeker
// ============================================================================

impl SingleTableRecord for JobSeeker {
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_JOB_SEEKER;

    fn partition_key(&self) -> String {
        keys::job_seeker_pk(&self.id)
    }

    fn sort_key(&self) -> String {
        keys::job_seeker_sk()
    }

    fn to_attributes(&self) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        put_string(&mut item, "id", self.id.as_str());
        put_string(&mut item, "full_name", self.full_name.as_str());
        item.insert("birth_date".to_string(), self.birth_date.into());
        put_string(&mut item, "address", self.address.as_str());
        put_string(&mut item, "email", self.email.as_str());
        put_optional(&mut item, "languages", self.languages.clone());
        put_optional(&mut item, "about_me", self.about_me.clone());
        put_optional(&mut item, "job_ambitions", self.job_ambitions.clone());
        put_optional(&mut item, "hobbies", self.hobbies.clone());
        if !self.media.is_empty() {
            item.insert("media".to_string(), self.media.clone().into());
        }
        self.audit.write_to(&mut item);
        Ok(item)
    }

    fn from_attributes(item: &AttributeMap) -> Result<Self> {
        Ok(Self {
            id: get_string(item, "id")?,
            full_name: get_string(item, "full_name")?,
            birth_date: get_i64(item, "birth_date")?,
            address: get_string(item, "address")?,
            email: get_string(item, "email")?,
            languages: match item.get("languages") {
                None => None,
                Some(_) => Some(get_string_list(item, "languages")?),
            },
            about_me: get_optional_string(item, "about_me"),
            job_ambitions: get_optional_string(item, "job_ambitions"),
            hobbies: get_optional_string(item, "hobbies"),
            media: get_string_list(item, "media")?,
            audit: Audit::read_from(item)?,
        })
    }
}

// ============================================================================
// Experience
// ============================================================================

impl SingleTableRecord for Experience {
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_EXPERIENCE;

    fn partition_key(&self) -> String {
        keys::experience_pk(&self.seeker_id)
    }

    fn sort_key(&self) -> String {
        keys::experience_sk(self.experience_id)
    }

    fn to_attributes(&self) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        put_string(&mut item, "seeker_id", self.seeker_id.as_str());
        put_string(&mut item, "experience_id", self.experience_id.to_string());
        put_string(&mut item, "workplace", self.workplace.as_str());
        item.insert("year_start".to_string(), self.year_start.into());
        item.insert("year_end".to_string(), self.year_end.into());
        put_string(&mut item, "role", self.role.as_str());
        put_string(&mut item, "role_description", self.role_description.as_str());
        self.audit.write_to(&mut item);
        Ok(item)
    }

    fn from_attributes(item: &AttributeMap) -> Result<Self> {
        Ok(Self {
            seeker_id: get_string(item, "seeker_id")?,
            experience_id: get_uuid(item, "experience_id")?,
            workplace: get_string(item, "workplace")?,
            year_start: get_i32(item, "year_start")?,
            year_end: get_i32(item, "year_end")?,
            role: get_string(item, "role")?,
            role_description: get_optional_string(item, "role_description").unwrap_or_default(),
            audit: Audit::read_from(item)?,
        })
    }
}

// ============================================================================
// JobSeekerAnswers
// ============================================================================

impl SingleTableRecord for JobSeekerAnswers {
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_JOB_SEEKER_ANSWERS;

    fn partition_key(&self) -> String {
        keys::answers_pk()
    }

    fn sort_key(&self) -> String {
        keys::answers_sk(&self.seeker_id)
    }

    fn to_attributes(&self) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        put_string(&mut item, "job_seeker_id", self.seeker_id.as_str());
        put_string(&mut item, "job_seeker_name", self.seeker_name.as_str());
        for (position, slot) in self.answers.slots().iter().enumerate() {
            if let Some(answer) = slot {
                item.insert(answer_attribute(position), Value::Bool(*answer));
            }
        }
        self.audit.write_to(&mut item);
        Ok(item)
    }

    fn from_attributes(item: &AttributeMap) -> Result<Self> {
        let mut slots = [None; ANSWER_COUNT];
        for (position, slot) in slots.iter_mut().enumerate() {
            *slot = get_optional_bool(item, &answer_attribute(position));
        }

        Ok(Self {
            seeker_id: get_string(item, "job_seeker_id")?,
            seeker_name: get_optional_string(item, "job_seeker_name").unwrap_or_default(),
            answers: AnswerSheet(slots),
            audit: Audit::read_from(item)?,
        })
    }
}
