//! Simulation orchestrator.

use super::coverage::coverage_report;
use super::state::{SimulationInput, SimulationResult, SimulationState, Transition};
use crate::catalog::{
    IndicatorCatalog, Intervention, InterventionCatalog, LivingLab, PolicyCatalog,
};
use crate::error::{WefeError, WefeResult};
use crate::impact::{ImpactCalculator, PolicySelection};
use crate::optimizer::{
    Constraints, InterventionOptimizer, InterventionPlan, OptimizerConfig, Recommendation,
};
use crate::scoring::{Normalizer, ScoringConfig};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// Runs baseline → policies → interventions → final projections over fixed
/// catalogs.
///
/// `interventions` is the candidate pool for recommendations and manual
/// edits. A `Simulator` holds only read-only catalogs and configuration, so
/// one instance may serve any number of sessions and threads.
///
/// # Examples
///
/// ```
/// use u_wefe::catalog::*;
/// use u_wefe::impact::PolicySelection;
/// use u_wefe::optimizer::Constraints;
/// use u_wefe::simulation::Simulator;
///
/// let indicators = IndicatorCatalog::new(vec![
///     Indicator::new("access", "Water access", Pillar::Water, 0.0, 100.0),
/// ]).unwrap();
/// let policies = PolicyCatalog::new(
///     vec![Policy::new("wash", "WASH").with_effect("access", 10.0)],
///     &indicators,
/// ).unwrap();
/// let interventions = InterventionCatalog::new(
///     vec![Intervention::new("wells", "Wells", 3.0, 1.0)
///         .with_effect("access", 20.0)
///         .with_policy("wash")],
///     &indicators,
///     &policies,
/// ).unwrap();
///
/// let sim = Simulator::new(&indicators, &policies, &interventions);
/// let lab = LivingLab::new("lab", "Lab").with_value("access", 50.0);
/// let selection = PolicySelection::from_ids(&policies, ["wash"]).unwrap();
///
/// let result = sim.run(&lab, &selection, Constraints::new(5.0, 2.0)).unwrap();
/// assert_eq!(result.baseline_scores.overall, Some(0.5));
/// assert_eq!(result.adjusted_scores.overall, Some(0.6));
/// assert_eq!(result.final_scores.overall, Some(0.8));
/// ```
pub struct Simulator<'a> {
    indicators: &'a IndicatorCatalog,
    policies: &'a PolicyCatalog,
    interventions: &'a InterventionCatalog,
    scoring: ScoringConfig,
    optimizer: OptimizerConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(
        indicators: &'a IndicatorCatalog,
        policies: &'a PolicyCatalog,
        interventions: &'a InterventionCatalog,
    ) -> Self {
        Self {
            indicators,
            policies,
            interventions,
            scoring: ScoringConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }

    pub fn with_scoring_config(mut self, config: ScoringConfig) -> Self {
        self.scoring = config;
        self
    }

    pub fn with_optimizer_config(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = config;
        self
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn optimizer_config(&self) -> &OptimizerConfig {
        &self.optimizer
    }

    fn intervention_optimizer(&self) -> InterventionOptimizer<'_> {
        InterventionOptimizer::new(
            self.indicators,
            self.policies,
            self.interventions,
            &self.scoring,
            self.optimizer.clone(),
        )
    }

    /// Full pipeline for one lab with optimizer-chosen interventions.
    ///
    /// Identical inputs produce identical results.
    pub fn run(
        &self,
        lab: &LivingLab,
        selection: &PolicySelection,
        constraints: Constraints,
    ) -> WefeResult<SimulationResult> {
        self.check_values(lab)?;
        let recommendation =
            self.intervention_optimizer()
                .optimize(&lab.values, selection, constraints)?;
        self.project(lab, selection, recommendation)
    }

    /// [`run`](Self::run) with an explicit candidate pool in place of the
    /// simulator's intervention catalog.
    ///
    /// The candidates are checked like a catalog (unique ids, known
    /// indicators and policies) before the run.
    pub fn run_with_candidates(
        &self,
        lab: &LivingLab,
        selection: &PolicySelection,
        constraints: Constraints,
        candidates: &[&Intervention],
    ) -> WefeResult<SimulationResult> {
        let pool = InterventionCatalog::new(
            candidates.iter().map(|&iv| iv.clone()).collect(),
            self.indicators,
            self.policies,
        )?;
        Simulator {
            indicators: self.indicators,
            policies: self.policies,
            interventions: &pool,
            scoring: self.scoring.clone(),
            optimizer: self.optimizer.clone(),
        }
        .run(lab, selection, constraints)
    }

    /// Full pipeline for a session, using its accepted interventions as-is.
    pub fn evaluate(&self, state: &SimulationState, lab: &LivingLab) -> WefeResult<SimulationResult> {
        self.check_inputs(state, lab)?;
        let recommendation =
            self.intervention_optimizer()
                .evaluate(&lab.values, &state.policies, &state.plan)?;
        self.project(lab, &state.policies, recommendation)
    }

    /// Runs every input, in parallel with the `parallel` feature.
    ///
    /// Results keep input order and do not depend on the thread count.
    pub fn run_batch(&self, inputs: &[SimulationInput]) -> Vec<WefeResult<SimulationResult>> {
        debug!(runs = inputs.len(), "simulation batch");
        #[cfg(feature = "parallel")]
        {
            inputs
                .par_iter()
                .map(|input| self.run(&input.lab, &input.selection, input.constraints))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            inputs
                .iter()
                .map(|input| self.run(&input.lab, &input.selection, input.constraints))
                .collect()
        }
    }

    /// Rejects invalid scoring weights and out-of-bounds lab values.
    fn check_values(&self, lab: &LivingLab) -> WefeResult<()> {
        self.scoring.validate()?;
        self.indicators.validate_lab(lab)
    }

    fn check_inputs(&self, state: &SimulationState, lab: &LivingLab) -> WefeResult<()> {
        check_lab(state, lab)?;
        self.check_values(lab)
    }

    fn project(
        &self,
        lab: &LivingLab,
        selection: &PolicySelection,
        recommendation: Recommendation,
    ) -> WefeResult<SimulationResult> {
        let normalizer = Normalizer::new(self.indicators, &self.scoring);
        let calculator = ImpactCalculator::new(self.indicators, self.policies);

        let chosen: Vec<&Intervention> = recommendation
            .interventions
            .iter()
            .map(|r| self.interventions.require(&r.id))
            .collect::<WefeResult<_>>()?;

        let baseline_scores = normalizer.score(&lab.values)?;
        let adjusted_values = calculator.apply_policies(&lab.values, selection)?;
        let adjusted_scores = normalizer.score(&adjusted_values)?;
        let final_values = calculator.apply(&lab.values, selection, &chosen)?;
        let final_scores = normalizer.score(&final_values)?;
        let coverage = coverage_report(
            self.indicators,
            &calculator.policy_deltas(selection)?,
            &chosen,
        );

        debug!(
            lab = %lab.id,
            policies = selection.len(),
            interventions = chosen.len(),
            baseline = ?baseline_scores.overall,
            adjusted = ?adjusted_scores.overall,
            projected = ?final_scores.overall,
            "simulation finished"
        );

        Ok(SimulationResult {
            lab_id: lab.id.clone(),
            baseline_scores,
            adjusted_values,
            adjusted_scores,
            recommended_interventions: recommendation,
            final_values,
            final_scores,
            coverage,
        })
    }

    // Session transitions. Each returns the next state; the input is never
    // modified, so a failed transition leaves the caller's state as it was.

    pub fn select_policy(&self, state: &SimulationState, id: &str) -> WefeResult<SimulationState> {
        let mut next = state.clone();
        next.policies.insert(self.policies, id)?;
        Ok(next)
    }

    pub fn deselect_policy(
        &self,
        state: &SimulationState,
        id: &str,
    ) -> WefeResult<SimulationState> {
        let mut next = state.clone();
        next.policies.remove(self.policies, id)?;
        Ok(next)
    }

    /// Replaces the accepted interventions with the optimizer's choice.
    pub fn recommend(&self, state: &SimulationState, lab: &LivingLab) -> WefeResult<Transition> {
        self.check_inputs(state, lab)?;
        let recommendation = self.intervention_optimizer().optimize(
            &lab.values,
            &state.policies,
            state.constraints(),
        )?;
        let mut next = state.clone();
        next.plan = InterventionPlan {
            accepted: recommendation.ids().into_iter().map(String::from).collect(),
            constraints: state.constraints(),
        };
        Ok(Transition {
            state: next,
            recommendation,
        })
    }

    pub fn add_intervention(
        &self,
        state: &SimulationState,
        lab: &LivingLab,
        id: &str,
    ) -> WefeResult<Transition> {
        self.check_inputs(state, lab)?;
        let update = self
            .intervention_optimizer()
            .add(&lab.values, &state.policies, &state.plan, id)?;
        Ok(transition(state, update.plan, update.recommendation))
    }

    pub fn remove_intervention(
        &self,
        state: &SimulationState,
        lab: &LivingLab,
        id: &str,
    ) -> WefeResult<Transition> {
        self.check_inputs(state, lab)?;
        let update = self
            .intervention_optimizer()
            .remove(&lab.values, &state.policies, &state.plan, id)?;
        Ok(transition(state, update.plan, update.recommendation))
    }

    pub fn replace_intervention(
        &self,
        state: &SimulationState,
        lab: &LivingLab,
        old: &str,
        new: &str,
    ) -> WefeResult<Transition> {
        self.check_inputs(state, lab)?;
        let update = self.intervention_optimizer().replace(
            &lab.values,
            &state.policies,
            &state.plan,
            old,
            new,
        )?;
        Ok(transition(state, update.plan, update.recommendation))
    }
}

fn check_lab(state: &SimulationState, lab: &LivingLab) -> WefeResult<()> {
    if state.lab_id != lab.id {
        return Err(WefeError::InvalidConfig(format!(
            "session belongs to lab `{}`, got `{}`",
            state.lab_id, lab.id
        )));
    }
    Ok(())
}

fn transition(
    state: &SimulationState,
    plan: InterventionPlan,
    recommendation: Recommendation,
) -> Transition {
    Transition {
        state: SimulationState {
            lab_id: state.lab_id.clone(),
            policies: state.policies.clone(),
            plan,
        },
        recommendation,
    }
}
