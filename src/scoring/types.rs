//! Derived score types.
//!
//! Scores are never stored authoritatively; a [`ScoreCard`] is recomputed
//! from raw values every time it is needed.

use crate::catalog::Pillar;

/// A unit score paired with its aggregation weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedScore {
    pub score: f64,
    pub weight: f64,
}

impl WeightedScore {
    pub fn new(score: f64, weight: f64) -> Self {
        Self { score, weight }
    }

    /// Weight 1.
    pub fn unweighted(score: f64) -> Self {
        Self { score, weight: 1.0 }
    }
}

/// Unit score of one indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorScore {
    pub id: String,
    /// 1-based display number from the indicator catalog.
    pub number: usize,
    pub pillar: Pillar,
    pub raw: f64,
    pub score: f64,
}

/// Aggregate score of one pillar, `None` when no indicator contributed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PillarScore {
    pub pillar: Pillar,
    pub score: Option<f64>,
    pub indicator_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PillarContribution {
    pub pillar: Pillar,
    pub score: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExclusionReason {
    ZeroWeight,
    ScoreUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExcludedPillar {
    pub pillar: Pillar,
    pub score: Option<f64>,
    pub weight: f64,
    pub reason: ExclusionReason,
}

/// How the overall score was assembled from pillar scores.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverallBreakdown {
    pub included: Vec<PillarContribution>,
    pub excluded: Vec<ExcludedPillar>,
    pub total_weight: f64,
}

/// Indicator, pillar, and overall scores for one set of raw values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreCard {
    /// Scored indicators in catalog order.
    pub indicators: Vec<IndicatorScore>,
    /// One entry per pillar in [`Pillar::ALL`] order.
    pub pillars: Vec<PillarScore>,
    pub overall: Option<f64>,
    pub breakdown: OverallBreakdown,
}

impl ScoreCard {
    pub fn indicator(&self, id: &str) -> Option<&IndicatorScore> {
        self.indicators.iter().find(|s| s.id == id)
    }

    pub fn pillar(&self, pillar: Pillar) -> Option<f64> {
        self.pillars
            .iter()
            .find(|p| p.pillar == pillar)
            .and_then(|p| p.score)
    }

    /// Overall score, treating "no pillar scored" as 0.
    pub fn overall_or_zero(&self) -> f64 {
        self.overall.unwrap_or(0.0)
    }
}
