//! Functional core of jobli.
//!
//! Pure record types, key derivation, attribute codecs, the matching engine
//! and the storage contracts. Nothing in this crate performs I/O.

pub mod employer;
pub mod matching;
pub mod record;
pub mod seeker;
pub mod storage;
