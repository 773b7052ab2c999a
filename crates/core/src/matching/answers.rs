use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::RepositoryError;

/// Number of positional yes/no questions.
pub const ANSWER_COUNT: usize = 10;

/// Errors building an answer vector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnswerError {
    #[error("Expected 10 answers, got {0}")]
    WrongLength(usize),
    #[error("Answer {0} is not set")]
    Unset(usize),
}

impl From<AnswerError> for RepositoryError {
    fn from(err: AnswerError) -> Self {
        RepositoryError::BadRequest(err.to_string())
    }
}

/// Stored answers; any slot may be unset.
///
/// Positions are 1-based in messages and attribute names (`a1`..`a10`),
/// 0-based in the array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSheet(pub [Option<bool>; ANSWER_COUNT]);

impl AnswerSheet {
    pub fn from_slots(slots: &[Option<bool>]) -> Result<Self, AnswerError> {
        let array: [Option<bool>; ANSWER_COUNT] = slots
            .try_into()
            .map_err(|_| AnswerError::WrongLength(slots.len()))?;
        Ok(Self(array))
    }

    pub fn slots(&self) -> &[Option<bool>; ANSWER_COUNT] {
        &self.0
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// The complete vector, or `None` when any slot is unset.
    pub fn complete(&self) -> Option<AnswerVector> {
        AnswerVector::try_from(self).ok()
    }
}

impl From<AnswerVector> for AnswerSheet {
    fn from(vector: AnswerVector) -> Self {
        Self(vector.0.map(Some))
    }
}

/// A complete answer vector, the only form the scorer accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerVector(pub [bool; ANSWER_COUNT]);

impl AnswerVector {
    /// Builds a vector from exactly ten answers.
    pub fn from_answers(answers: &[bool]) -> Option<Self> {
        answers.try_into().ok().map(Self)
    }

    pub fn as_array(&self) -> &[bool; ANSWER_COUNT] {
        &self.0
    }

    /// Flips every answer.
    pub fn invert(&self) -> Self {
        Self(self.0.map(|answer| !answer))
    }
}

impl TryFrom<&AnswerSheet> for AnswerVector {
    type Error = AnswerError;

    fn try_from(sheet: &AnswerSheet) -> Result<Self, Self::Error> {
        let mut answers = [false; ANSWER_COUNT];
        for (position, slot) in sheet.0.iter().enumerate() {
            answers[position] = slot.ok_or(AnswerError::Unset(position + 1))?;
        }
        Ok(Self(answers))
    }
}

impl TryFrom<&[Option<bool>]> for AnswerVector {
    type Error = AnswerError;

    fn try_from(slots: &[Option<bool>]) -> Result<Self, Self::Error> {
        AnswerVector::try_from(&AnswerSheet::from_slots(slots)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_from_slots_checks_length() {
        assert_eq!(
            AnswerSheet::from_slots(&[Some(true); 9]),
            Err(AnswerError::WrongLength(9))
        );
        assert!(AnswerSheet::from_slots(&[None; 10]).is_ok());
    }

    #[test]
    fn test_partial_sheet_has_no_vector() {
        let mut slots = [Some(true); ANSWER_COUNT];
        slots[4] = None;
        let sheet = AnswerSheet(slots);

        assert!(!sheet.is_complete());
        assert_eq!(sheet.complete(), None);
        assert_eq!(
            AnswerVector::try_from(&sheet),
            Err(AnswerError::Unset(5))
        );
    }

    #[test]
    fn test_complete_sheet_converts() {
        let sheet = AnswerSheet([Some(false); ANSWER_COUNT]);
        assert_eq!(sheet.complete(), Some(AnswerVector([false; ANSWER_COUNT])));
        assert_eq!(AnswerSheet::from(AnswerVector([false; ANSWER_COUNT])), sheet);
    }

    #[test]
    fn test_vector_from_answers_requires_ten() {
        assert!(AnswerVector::from_answers(&[true; 10]).is_some());
        assert!(AnswerVector::from_answers(&[true; 11]).is_none());
        assert!(AnswerVector::from_answers(&[]).is_none());
    }

    #[test]
    fn test_vector_from_option_slice() {
        let slots = vec![Some(true); 10];
        assert!(AnswerVector::try_from(slots.as_slice()).is_ok());
        assert_eq!(
            AnswerVector::try_from(&slots[..3]),
            Err(AnswerError::WrongLength(3))
        );
    }

    #[test]
    fn test_answer_error_is_bad_request() {
        let err: RepositoryError = AnswerError::Unset(2).into();
        assert_eq!(
            err,
            RepositoryError::BadRequest("Answer 2 is not set".to_string())
        );
    }
}
