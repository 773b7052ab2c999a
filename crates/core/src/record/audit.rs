use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{AttributeMap, Result};

use super::codec::{
    format_timestamp, get_optional_datetime, get_optional_string, get_u64, put_optional,
    ATTR_CREATED_BY, ATTR_CREATION_TIME, ATTR_LAST_UPDATED_BY, ATTR_LAST_UPDATE_TIME,
    ATTR_VERSION,
};

/// Optimistic-lock version and write stamps carried by every record.
///
/// A record that was never stored has no creation time. The store fills
/// these in on create and update; callers only propagate what they read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub version: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl Audit {
    pub fn is_persisted(&self) -> bool {
        self.created_at.is_some()
    }

    pub fn write_to(&self, item: &mut AttributeMap) {
        item.insert(ATTR_VERSION.to_string(), self.version.into());
        put_optional(item, ATTR_CREATION_TIME, self.created_at.map(format_timestamp));
        put_optional(
            item,
            ATTR_LAST_UPDATE_TIME,
            self.updated_at.map(format_timestamp),
        );
        put_optional(item, ATTR_CREATED_BY, self.created_by.clone());
        put_optional(item, ATTR_LAST_UPDATED_BY, self.updated_by.clone());
    }

    pub fn read_from(item: &AttributeMap) -> Result<Self> {
        Ok(Self {
            version: get_u64(item, ATTR_VERSION)?,
            created_at: get_optional_datetime(item, ATTR_CREATION_TIME)?,
            updated_at: get_optional_datetime(item, ATTR_LAST_UPDATE_TIME)?,
            created_by: get_optional_string(item, ATTR_CREATED_BY),
            updated_by: get_optional_string(item, ATTR_LAST_UPDATED_BY),
        })
    }
}
