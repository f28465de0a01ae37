//! Scoring weights.

use crate::catalog::Pillar;
use crate::error::{WefeError, WefeResult};
use std::collections::BTreeMap;

/// Weights applied when aggregating unit scores.
///
/// Unset weights default to 1. A pillar weight of 0 excludes that pillar from
/// the overall score; an indicator weight of 0 excludes the indicator from its
/// pillar score.
///
/// # Examples
///
/// ```
/// use u_wefe::catalog::Pillar;
/// use u_wefe::scoring::ScoringConfig;
///
/// let config = ScoringConfig::default()
///     .with_pillar_weight(Pillar::Water, 3.0)
///     .with_indicator_weight("co2_emissions_per_capita", 2.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringConfig {
    #[cfg_attr(feature = "serde", serde(default))]
    pub indicator_weights: BTreeMap<String, f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pillar_weights: BTreeMap<Pillar, f64>,
}

impl ScoringConfig {
    pub fn with_indicator_weight(mut self, indicator: impl Into<String>, weight: f64) -> Self {
        self.indicator_weights.insert(indicator.into(), weight);
        self
    }

    pub fn with_pillar_weight(mut self, pillar: Pillar, weight: f64) -> Self {
        self.pillar_weights.insert(pillar, weight);
        self
    }

    pub fn indicator_weight(&self, indicator: &str) -> f64 {
        self.indicator_weights.get(indicator).copied().unwrap_or(1.0)
    }

    pub fn pillar_weight(&self, pillar: Pillar) -> f64 {
        self.pillar_weights.get(&pillar).copied().unwrap_or(1.0)
    }

    /// Validates that every weight is finite and non-negative.
    pub fn validate(&self) -> WefeResult<()> {
        for (id, &w) in &self.indicator_weights {
            if !w.is_finite() || w < 0.0 {
                return Err(WefeError::InvalidConfig(format!(
                    "indicator weight for `{id}` must be finite and non-negative, got {w}"
                )));
            }
        }
        for (pillar, &w) in &self.pillar_weights {
            if !w.is_finite() || w < 0.0 {
                return Err(WefeError::InvalidConfig(format!(
                    "pillar weight for {pillar} must be finite and non-negative, got {w}"
                )));
            }
        }
        Ok(())
    }
}
