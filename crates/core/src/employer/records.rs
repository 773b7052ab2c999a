//! Storage codecs for employers and their jobs.

use url::Url;

use crate::record::codec::{
    get_nested, get_optional_string, get_optional_u64, get_string, get_string_list, get_u64,
    get_uuid, put_nested, put_optional, put_string,
};
use crate::record::{keys, Audit, IndexKey, SingleTableRecord};
use crate::storage::{AttributeMap, RepositoryError, Result};

use super::types::{Address, Employer, EmployerJob, JobScope, ScreeningAnswer, TimeWindow};

pub const ENTITY_TYPE_EMPLOYER: &str = "Employer";
pub const ENTITY_TYPE_EMPLOYER_JOB: &str = "EmployerJob";

fn put_list(item: &mut AttributeMap, key: &str, values: &[String]) {
    if !values.is_empty() {
        item.insert(key.to_string(), values.to_vec().into());
    }
}

// ============================================================================
// Employer
// ============================================================================

impl SingleTableRecord for Employer {
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_EMPLOYER;

    fn partition_key(&self) -> String {
        keys::employer_pk(self.id)
    }

    fn sort_key(&self) -> String {
        keys::DELIMITER.to_string()
    }

    fn to_attributes(&self) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        put_string(&mut item, "employer_id", self.id.to_string());
        put_string(&mut item, "employer_email", self.email.as_str());
        put_string(&mut item, "business_name", self.business_name.as_str());
        if !self.address.is_empty() {
            put_nested(&mut item, "business_address", &self.address)?;
        }
        put_optional(
            &mut item,
            "business_website",
            self.website.as_ref().map(Url::to_string),
        );
        put_optional(&mut item, "description", self.description.clone());
        put_list(&mut item, "employer_terms", &self.terms);
        put_list(&mut item, "business_media", &self.media);
        self.audit.write_to(&mut item);
        Ok(item)
    }

    fn from_attributes(item: &AttributeMap) -> Result<Self> {
        let website = get_optional_string(item, "business_website")
            .map(|s| {
                Url::parse(&s).map_err(|e| {
                    RepositoryError::InvalidData(format!("Invalid business_website {s}: {e}"))
                })
            })
            .transpose()?;

        Ok(Self {
            id: get_uuid(item, "employer_id")?,
            email: get_string(item, "employer_email")?,
            business_name: get_string(item, "business_name")?,
            address: get_nested::<Address>(item, "business_address")?.unwrap_or_default(),
            website,
            description: get_optional_string(item, "description"),
            terms: get_string_list(item, "employer_terms")?,
            media: get_string_list(item, "business_media")?,
            audit: Audit::read_from(item)?,
        })
    }
}

// ============================================================================
// EmployerJob
// ============================================================================

impl SingleTableRecord for EmployerJob {
    const ENTITY_TYPE: &'static str = ENTITY_TYPE_EMPLOYER_JOB;

    fn partition_key(&self) -> String {
        keys::job_pk(self.id)
    }

    fn sort_key(&self) -> String {
        keys::DELIMITER.to_string()
    }

    fn index_key(&self) -> IndexKey {
        IndexKey::indexed(keys::job_gsi1_pk(self.employer_id), keys::job_gsi1_sk(self.id))
    }

    fn to_attributes(&self) -> Result<AttributeMap> {
        let mut item = AttributeMap::new();
        put_string(&mut item, "job_id", self.id.to_string());
        put_string(&mut item, "employer_id", self.employer_id.to_string());
        put_list(&mut item, "job_fields", &self.fields);
        put_string(&mut item, "job_name", self.name.as_str());
        put_string(&mut item, "job_description", self.description.as_str());
        item.insert("job_employees_count".to_string(), self.headcount.into());
        put_string(&mut item, "job_scope", self.scope.as_str());
        if let JobScope::TimeBased { windows } = &self.scope {
            put_nested(&mut item, "job_time_scope", windows)?;
        }
        put_nested(&mut item, "answers", &self.answers)?;
        put_list(&mut item, "job_requirements", &self.requirements);
        put_optional(&mut item, "job_salary", self.salary);
        put_optional(
            &mut item,
            "job_experience_needed",
            self.experience_needed.clone(),
        );
        put_list(&mut item, "job_media", &self.media);
        self.audit.write_to(&mut item);
        Ok(item)
    }

    fn from_attributes(item: &AttributeMap) -> Result<Self> {
        let scope = match get_string(item, "job_scope")?.as_str() {
            "full" => JobScope::Full,
            "partial" => JobScope::Partial,
            "time_based" => JobScope::TimeBased {
                windows: get_nested::<Vec<TimeWindow>>(item, "job_time_scope")?
                    .unwrap_or_default(),
            },
            other => {
                return Err(RepositoryError::InvalidData(format!(
                    "Invalid job_scope: {}",
                    other
                )))
            }
        };

        let headcount = get_u64(item, "job_employees_count")?;
        let headcount = u32::try_from(headcount).map_err(|_| {
            RepositoryError::InvalidData(format!("Invalid job_employees_count: {headcount}"))
        })?;

        Ok(Self {
            id: get_uuid(item, "job_id")?,
            employer_id: get_uuid(item, "employer_id")?,
            fields: get_string_list(item, "job_fields")?,
            name: get_string(item, "job_name")?,
            description: get_optional_string(item, "job_description").unwrap_or_default(),
            headcount,
            scope,
            answers: get_nested::<Vec<ScreeningAnswer>>(item, "answers")?.unwrap_or_default(),
            requirements: get_string_list(item, "job_requirements")?,
            salary: get_optional_u64(item, "job_salary"),
            experience_needed: get_optional_string(item, "job_experience_needed"),
            media: get_string_list(item, "job_media")?,
            audit: Audit::read_from(item)?,
        })
    }
}
