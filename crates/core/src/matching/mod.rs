//! Boolean-answer matching between job seekers and jobs.
//!
//! Both directions (seeker to jobs, job to seekers) use the same scorer:
//! the number of positions where two complete answer vectors agree.

mod answers;
mod scoring;

pub use answers::{AnswerError, AnswerSheet, AnswerVector, ANSWER_COUNT};
pub use scoring::{rank, score, Scored, DEFAULT_MAX_RESULTS};
