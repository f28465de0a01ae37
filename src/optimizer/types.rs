//! Optimizer inputs and outputs.

use super::config::SearchStrategy;
use crate::error::{WefeError, WefeResult};
use crate::math::fits;

/// Budget and time limits for the accepted intervention set.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Constraints {
    pub budget: f64,
    pub time_horizon: f64,
}

impl Constraints {
    pub fn new(budget: f64, time_horizon: f64) -> Self {
        Self {
            budget,
            time_horizon,
        }
    }

    pub fn validate(&self) -> WefeResult<()> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(WefeError::InvalidConfig(format!(
                "budget must be finite and non-negative, got {}",
                self.budget
            )));
        }
        if !self.time_horizon.is_finite() || self.time_horizon < 0.0 {
            return Err(WefeError::InvalidConfig(format!(
                "time horizon must be finite and non-negative, got {}",
                self.time_horizon
            )));
        }
        Ok(())
    }

    /// Whether totals of `cost` and `duration` fit both limits.
    pub fn admits(&self, cost: f64, duration: f64) -> bool {
        fits(cost, self.budget) && fits(duration, self.time_horizon)
    }
}

/// The caller-owned set of accepted interventions.
///
/// `accepted` keeps insertion order; the optimizer never mutates a plan in
/// place, it returns a new one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterventionPlan {
    pub accepted: Vec<String>,
    pub constraints: Constraints,
}

impl InterventionPlan {
    pub fn new(constraints: Constraints) -> Self {
        Self {
            accepted: Vec::new(),
            constraints,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.accepted.iter().any(|s| s == id)
    }
}

/// One accepted intervention with its marginal score contribution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedIntervention {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub duration: f64,
    /// Overall score with the full set minus the score without this one.
    pub contribution: f64,
    pub catalog_position: usize,
}

/// A recommended (or evaluated) intervention set.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Recommendation {
    /// Interventions by descending marginal contribution.
    pub interventions: Vec<RankedIntervention>,
    pub total_cost: f64,
    pub total_duration: f64,
    pub remaining_budget: f64,
    pub remaining_time: f64,
    /// Overall score gain over the policies-only projection.
    pub improvement: f64,
    /// Search used to produce this set; `None` for caller-built plans.
    pub strategy: Option<SearchStrategy>,
}

impl Recommendation {
    pub fn ids(&self) -> Vec<&str> {
        self.interventions.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    /// Whether the set still fits the limits it was evaluated against.
    pub fn is_feasible(&self) -> bool {
        fits(0.0, self.remaining_budget) && fits(0.0, self.remaining_time)
    }
}

/// Result of an incremental plan operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanUpdate {
    pub plan: InterventionPlan,
    pub recommendation: Recommendation,
}
