use serde::Serialize;

use super::answers::AnswerVector;

/// Number of results returned when the caller does not ask for a limit.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// A candidate paired with its agreement score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scored<T> {
    pub score: u8,
    pub candidate: T,
}

/// Counts the positions where two vectors agree (0..=10).
pub fn score(query: &AnswerVector, candidate: &AnswerVector) -> u8 {
    query
        .as_array()
        .iter()
        .zip(candidate.as_array())
        .filter(|(q, c)| q == c)
        .count() as u8
}

/// Scores every candidate against `query` and keeps the best `max_results`.
///
/// Candidates without a complete vector are dropped. Ties keep input order.
pub fn rank<T, I>(query: &AnswerVector, candidates: I, max_results: usize) -> Vec<Scored<T>>
where
    I: IntoIterator<Item = (Option<AnswerVector>, T)>,
{
    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .filter_map(|(vector, candidate)| {
            vector.map(|vector| Scored {
                score: score(query, &vector),
                candidate,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(max_results);
    scored
}
