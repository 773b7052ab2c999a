//! Imperative shell of jobli.
//!
//! Table backends, the single-table store, the per-entity repositories and
//! the matching and media services, wired together by [`state::AppState`].

pub mod config;
pub mod demo;
pub mod matching;
pub mod media;
pub mod repositories;
pub mod state;
pub mod storage;
pub mod store;
