//! Deterministic rule-based ranking.
//!
//! Used wherever the engine returns an ordered list to a presentation layer:
//! indicator search results and intervention recommendations. Rules are
//! applied in sequence, later rules breaking ties of earlier ones, and a
//! final [`TieBreaker`] makes the order total.

mod engine;
mod types;

pub use engine::{RankEngine, TieBreaker};
pub use types::RankRule;
