//! Indicator search index.
//!
//! Given an indicator, lists the policies (or interventions) that move it,
//! ordered by improvement magnitude ascending with catalog order breaking
//! ties.

mod index;

pub use index::{IndicatorMatch, SearchIndex};
