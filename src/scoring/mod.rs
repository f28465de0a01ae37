//! Score normalization and aggregation.
//!
//! Raw indicator values are min-max scaled onto `[0, 1]`, averaged into
//! pillar scores, and pillar scores are averaged into one overall score.
//! Weighted means are supported at both levels through [`ScoringConfig`].
//!
//! All aggregation is order-independent: terms are sorted before summation,
//! so permuting the inputs yields a bit-identical result.

mod config;
mod normalizer;
mod types;

pub use config::ScoringConfig;
pub use normalizer::{aggregate_overall, aggregate_pillar, normalize, Normalizer};
pub use types::{
    ExcludedPillar, ExclusionReason, IndicatorScore, OverallBreakdown, PillarContribution,
    PillarScore, ScoreCard, WeightedScore,
};
