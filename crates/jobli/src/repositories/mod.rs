//! Typed repositories over [`SingleTableStore`](crate::store::SingleTableStore).
//!
//! Each repository validates identity fields, calls the store, and rehydrates
//! typed records. Reads of entities that must exist turn absence into
//! `NotFound`; list reads return empty vectors. Version conflicts are passed
//! through untouched.

mod answers;
mod employer;
mod experience;
mod jobs;
mod seeker;

pub use answers::JobSeekerAnswersRepository;
pub use employer::EmployerRepository;
pub use experience::ExperienceRepository;
pub use jobs::EmployerJobRepository;
pub use seeker::JobSeekerRepository;

use jobli_core::record::SingleTableRecord;
use jobli_core::storage::{AttributeMap, Result};

/// Rehydrates list results. The first item that does not decode fails the
/// whole read.
fn decode_all<R: SingleTableRecord>(items: Vec<AttributeMap>) -> Result<Vec<R>> {
    items
        .iter()
        .map(|item| {
            R::from_attributes(item).inspect_err(|e| {
                tracing::error!(
                    entity = R::ENTITY_TYPE,
                    error = %e,
                    item = ?item,
                    "Stored record does not decode"
                );
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use jobli_core::seeker::Experience;
    use jobli_core::storage::RepositoryError;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_all() {
        let first = Experience::new("u-1", "Cafe", 2019, 2021, "Barista");
        let second = Experience::new("u-1", "Bakery", 2021, 2023, "Baker");
        let items = vec![
            first.to_attributes().unwrap(),
            second.to_attributes().unwrap(),
        ];

        let decoded: Vec<Experience> = decode_all(items).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].workplace, "Cafe");
        assert_eq!(decoded[1].workplace, "Bakery");
    }

    #[test]
    fn test_decode_all_fails_on_bad_item() {
        let good = Experience::new("u-1", "Cafe", 2019, 2021, "Barista");
        let item = good.to_attributes().unwrap();
        let bad = json!({"seeker_id": "u-1"}).as_object().cloned().unwrap();

        let result = decode_all::<Experience>(vec![item, bad]);

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }
}
