//! Caller-owned session state and run results.

use super::coverage::IndicatorCoverage;
use crate::catalog::{IndicatorValues, LivingLab};
use crate::impact::PolicySelection;
use crate::optimizer::{Constraints, InterventionPlan, Recommendation};
use crate::scoring::ScoreCard;

/// One interactive session: a lab, its policy selection, and the accepted
/// interventions under the session's limits.
///
/// The engine never keeps a `SimulationState`; every transition on
/// [`Simulator`](super::Simulator) takes one by reference and returns the
/// next.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationState {
    pub lab_id: String,
    pub policies: PolicySelection,
    pub plan: InterventionPlan,
}

impl SimulationState {
    pub fn new(lab_id: impl Into<String>, constraints: Constraints) -> Self {
        Self {
            lab_id: lab_id.into(),
            policies: PolicySelection::new(),
            plan: InterventionPlan::new(constraints),
        }
    }

    pub fn constraints(&self) -> Constraints {
        self.plan.constraints
    }

    /// Same session with new limits. Accepted interventions are kept even if
    /// they no longer fit; the next evaluation reports it.
    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.plan.constraints = constraints;
        self
    }
}

/// State after a transition together with its evaluated plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SimulationState,
    pub recommendation: Recommendation,
}

/// One input to [`Simulator::run_batch`](super::Simulator::run_batch).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationInput {
    pub lab: LivingLab,
    pub selection: PolicySelection,
    pub constraints: Constraints,
}

/// Full projection for one lab.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    pub lab_id: String,
    pub baseline_scores: ScoreCard,
    pub adjusted_values: IndicatorValues,
    pub adjusted_scores: ScoreCard,
    pub recommended_interventions: Recommendation,
    pub final_values: IndicatorValues,
    pub final_scores: ScoreCard,
    pub coverage: Vec<IndicatorCoverage>,
}

impl SimulationResult {
    /// Overall gain from baseline to final projection.
    pub fn total_improvement(&self) -> f64 {
        self.final_scores.overall_or_zero() - self.baseline_scores.overall_or_zero()
    }
}
