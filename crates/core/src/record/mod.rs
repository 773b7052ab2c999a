//! Mapping between typed records and storage attribute maps.

mod audit;
pub mod codec;
pub mod keys;

pub use audit::Audit;

use crate::storage::{AttributeMap, Result};

/// Participation of a record in the secondary index.
///
/// Both index attributes are present or both are absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexKey {
    Indexed { partition: String, sort: String },
    NotIndexed,
}

impl IndexKey {
    pub fn indexed(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        IndexKey::Indexed {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

/// A typed record stored in a partition/sort-key table.
pub trait SingleTableRecord: Sized + Send + Sync {
    /// Tag stored in `entityType` and used in error messages.
    const ENTITY_TYPE: &'static str;

    fn partition_key(&self) -> String;

    /// Sort key; tables without a sort key ignore it.
    fn sort_key(&self) -> String;

    fn index_key(&self) -> IndexKey {
        IndexKey::NotIndexed
    }

    /// Flat attribute map without key attributes. `None` fields are omitted.
    fn to_attributes(&self) -> Result<AttributeMap>;

    /// Rehydrates a record from a stored item with its key attributes stripped.
    fn from_attributes(attributes: &AttributeMap) -> Result<Self>;
}
