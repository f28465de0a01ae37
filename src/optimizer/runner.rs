//! Intervention recommendation and incremental plan edits.

use super::config::{OptimizerConfig, SearchStrategy, MAX_EXHAUSTIVE_LIMIT};
use super::solver::{exhaustive, greedy, Evaluated, Objective};
use super::types::{Constraints, InterventionPlan, PlanUpdate, RankedIntervention, Recommendation};
use crate::catalog::{
    IndicatorCatalog, IndicatorValues, Intervention, InterventionCatalog, PolicyCatalog,
};
use crate::error::{WefeError, WefeResult};
use crate::impact::PolicySelection;
use crate::math::fits;
use crate::rank::{RankEngine, RankRule, TieBreaker};
use crate::scoring::ScoringConfig;
use tracing::debug;

struct ContributionDescending;

impl RankRule<RankedIntervention, ()> for ContributionDescending {
    fn name(&self) -> &str {
        "ContributionDescending"
    }

    fn key(&self, item: &RankedIntervention, _ctx: &()) -> f64 {
        -item.contribution
    }
}

/// Selects and edits intervention sets under budget and time limits.
///
/// Every method is a pure function of its arguments: plans come in, new
/// plans and recommendations go out.
///
/// # Examples
///
/// ```
/// use u_wefe::catalog::*;
/// use u_wefe::impact::PolicySelection;
/// use u_wefe::optimizer::{Constraints, InterventionOptimizer, OptimizerConfig};
/// use u_wefe::scoring::ScoringConfig;
///
/// let indicators = IndicatorCatalog::new(vec![
///     Indicator::new("access", "Water access", Pillar::Water, 0.0, 100.0),
/// ]).unwrap();
/// let policies = PolicyCatalog::new(vec![Policy::new("wash", "WASH")], &indicators).unwrap();
/// let interventions = InterventionCatalog::new(
///     vec![Intervention::new("wells", "Wells", 3.0, 1.0)
///         .with_effect("access", 10.0)
///         .with_policy("wash")],
///     &indicators,
///     &policies,
/// ).unwrap();
///
/// let scoring = ScoringConfig::default();
/// let optimizer = InterventionOptimizer::new(
///     &indicators, &policies, &interventions, &scoring, OptimizerConfig::default(),
/// );
/// let selection = PolicySelection::from_ids(&policies, ["wash"]).unwrap();
/// let baseline = IndicatorValues::from([("access".to_string(), 50.0)]);
///
/// let rec = optimizer
///     .optimize(&baseline, &selection, Constraints::new(5.0, 2.0))
///     .unwrap();
/// assert_eq!(rec.ids(), vec!["wells"]);
/// ```
pub struct InterventionOptimizer<'a> {
    indicators: &'a IndicatorCatalog,
    policies: &'a PolicyCatalog,
    interventions: &'a InterventionCatalog,
    scoring: &'a ScoringConfig,
    config: OptimizerConfig,
}

impl<'a> InterventionOptimizer<'a> {
    pub fn new(
        indicators: &'a IndicatorCatalog,
        policies: &'a PolicyCatalog,
        interventions: &'a InterventionCatalog,
        scoring: &'a ScoringConfig,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            indicators,
            policies,
            interventions,
            scoring,
            config,
        }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Interventions eligible for the given selection, in catalog order.
    ///
    /// With `require_policy_link`, only interventions linked to at least one
    /// selected policy qualify.
    pub fn candidates(&self, selection: &PolicySelection) -> Vec<&'a Intervention> {
        self.interventions
            .iter()
            .filter(|iv| !self.config.require_policy_link || iv.is_linked_to(selection.iter()))
            .collect()
    }

    /// Recommends the best feasible subset of eligible interventions.
    ///
    /// The returned set satisfies both limits, is not beaten by any single
    /// add, drop, or swap (and, with exhaustive search, by no feasible subset
    /// at all), and is identical for identical inputs. Greedy search gives the
    /// local guarantee only if it converges within `max_improvement_rounds`.
    pub fn optimize(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        constraints: Constraints,
    ) -> WefeResult<Recommendation> {
        self.config.validate()?;
        self.scoring.validate()?;
        constraints.validate()?;

        let candidates: Vec<&Intervention> = self
            .candidates(selection)
            .into_iter()
            .filter(|iv| constraints.admits(iv.cost, iv.duration))
            .collect();
        let strategy = self.config.resolve_strategy(candidates.len());
        if strategy == SearchStrategy::Exhaustive && candidates.len() > MAX_EXHAUSTIVE_LIMIT {
            return Err(WefeError::InvalidConfig(format!(
                "exhaustive search over {} candidates exceeds the limit of {MAX_EXHAUSTIVE_LIMIT}",
                candidates.len()
            )));
        }

        debug!(
            candidates = candidates.len(),
            ?strategy,
            budget = constraints.budget,
            time_horizon = constraints.time_horizon,
            "optimizing interventions"
        );

        let objective = Objective::new(
            self.indicators,
            self.scoring,
            baseline,
            selection.resolve(self.policies)?,
            candidates,
        );
        let best = match strategy {
            SearchStrategy::Greedy => greedy(
                &objective,
                constraints,
                self.config.epsilon,
                self.config.max_improvement_rounds,
            )?,
            _ => exhaustive(&objective, constraints, self.config.epsilon)?,
        };

        let chosen: Vec<&Intervention> = best.set.iter().map(|&i| objective.candidates[i]).collect();
        debug!(
            selected = ?chosen.iter().map(|iv| iv.id.as_str()).collect::<Vec<_>>(),
            score = best.score,
            "interventions selected"
        );

        let mut rec = self.recommend(baseline, selection, &chosen, constraints)?;
        rec.strategy = Some(strategy);
        Ok(rec)
    }

    /// Scores and ranks an existing plan without searching.
    pub fn evaluate(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        plan: &InterventionPlan,
    ) -> WefeResult<Recommendation> {
        self.scoring.validate()?;
        let accepted = self.resolve_plan(plan)?;
        self.recommend(baseline, selection, &accepted, plan.constraints)
    }

    /// Adds `id` to the plan.
    ///
    /// # Errors
    ///
    /// `UnknownIntervention`, `DuplicateSelection`, then `BudgetExceeded` or
    /// `TimeExceeded` when the addition would break a limit.
    pub fn add(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        plan: &InterventionPlan,
        id: &str,
    ) -> WefeResult<PlanUpdate> {
        let iv = self.interventions.require(id)?;
        if plan.contains(id) {
            return Err(WefeError::DuplicateSelection(id.to_string()));
        }
        let accepted = self.resolve_plan(plan)?;
        check_limits(&accepted, iv, plan.constraints)?;

        let mut next = plan.clone();
        next.accepted.push(id.to_string());
        self.update(baseline, selection, next)
    }

    /// Removes `id` from the plan, freeing its cost and duration.
    pub fn remove(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        plan: &InterventionPlan,
        id: &str,
    ) -> WefeResult<PlanUpdate> {
        self.interventions.require(id)?;
        if !plan.contains(id) {
            return Err(WefeError::NotSelected(id.to_string()));
        }

        let mut next = plan.clone();
        next.accepted.retain(|s| s != id);
        self.update(baseline, selection, next)
    }

    /// Swaps `old` for `new` atomically.
    ///
    /// Fails as a whole if `new` does not fit once `old` is gone; the input
    /// plan is never modified, so the caller's prior state stands.
    pub fn replace(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        plan: &InterventionPlan,
        old: &str,
        new: &str,
    ) -> WefeResult<PlanUpdate> {
        self.interventions.require(old)?;
        let incoming = self.interventions.require(new)?;
        if !plan.contains(old) {
            return Err(WefeError::NotSelected(old.to_string()));
        }
        if plan.contains(new) {
            return Err(WefeError::DuplicateSelection(new.to_string()));
        }

        let mut next = plan.clone();
        next.accepted.retain(|s| s != old);
        let remaining = self.resolve_plan(&next)?;
        check_limits(&remaining, incoming, plan.constraints)?;

        let pos = plan.accepted.iter().position(|s| s == old).unwrap_or(0);
        next.accepted.insert(pos.min(next.accepted.len()), new.to_string());
        self.update(baseline, selection, next)
    }

    fn update(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        plan: InterventionPlan,
    ) -> WefeResult<PlanUpdate> {
        let recommendation = self.evaluate(baseline, selection, &plan)?;
        Ok(PlanUpdate {
            plan,
            recommendation,
        })
    }

    fn resolve_plan(&self, plan: &InterventionPlan) -> WefeResult<Vec<&'a Intervention>> {
        let mut accepted: Vec<&Intervention> = Vec::with_capacity(plan.accepted.len());
        for id in &plan.accepted {
            let iv = self.interventions.require(id)?;
            if accepted.iter().any(|a| a.id == *id) {
                return Err(WefeError::DuplicateSelection(id.clone()));
            }
            accepted.push(iv);
        }
        Ok(accepted)
    }

    /// Builds the ranked recommendation for a fixed set.
    fn recommend(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        accepted: &[&Intervention],
        constraints: Constraints,
    ) -> WefeResult<Recommendation> {
        let objective = Objective::new(
            self.indicators,
            self.scoring,
            baseline,
            selection.resolve(self.policies)?,
            accepted.to_vec(),
        );
        let all: Vec<usize> = (0..accepted.len()).collect();
        let full: Evaluated = objective.evaluate(all.clone())?;
        let base_score = objective.score(&[])?;

        let mut ranked = Vec::with_capacity(accepted.len());
        for (i, iv) in accepted.iter().enumerate() {
            let rest: Vec<usize> = all.iter().copied().filter(|&j| j != i).collect();
            ranked.push(RankedIntervention {
                id: iv.id.clone(),
                name: iv.name.clone(),
                cost: iv.cost,
                duration: iv.duration,
                contribution: full.score - objective.score(&rest)?,
                catalog_position: self.interventions.position(&iv.id).unwrap_or(usize::MAX),
            });
        }

        let tie_index: Vec<usize> = ranked.iter().map(|r| r.catalog_position).collect();
        let interventions = RankEngine::new()
            .with_rule(ContributionDescending)
            .with_tie_breaker(TieBreaker::ByIndex)
            .with_epsilon(self.config.epsilon)
            .rank(ranked, &tie_index, &());

        Ok(Recommendation {
            interventions,
            total_cost: full.cost,
            total_duration: full.duration,
            remaining_budget: constraints.budget - full.cost,
            remaining_time: constraints.time_horizon - full.duration,
            improvement: full.score - base_score,
            strategy: None,
        })
    }
}

fn check_limits(
    accepted: &[&Intervention],
    incoming: &Intervention,
    constraints: Constraints,
) -> WefeResult<()> {
    let mut costs: Vec<f64> = accepted.iter().map(|iv| iv.cost).collect();
    let mut durations: Vec<f64> = accepted.iter().map(|iv| iv.duration).collect();
    costs.push(incoming.cost);
    durations.push(incoming.duration);

    let cost = crate::math::stable_sum(&mut costs);
    if !fits(cost, constraints.budget) {
        return Err(WefeError::BudgetExceeded {
            required: cost,
            available: constraints.budget,
        });
    }
    let duration = crate::math::stable_sum(&mut durations);
    if !fits(duration, constraints.time_horizon) {
        return Err(WefeError::TimeExceeded {
            required: duration,
            available: constraints.time_horizon,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Indicator, Pillar, Policy};
    use crate::impact::{compose, EffectSource};
    use crate::scoring::Normalizer;
    use proptest::prelude::*;

    struct Fixture {
        indicators: IndicatorCatalog,
        policies: PolicyCatalog,
        interventions: InterventionCatalog,
        scoring: ScoringConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let indicators = IndicatorCatalog::new(vec![
                Indicator::new("access", "Water access", Pillar::Water, 0.0, 100.0),
                Indicator::new("renewables", "Renewable share", Pillar::Energy, 0.0, 100.0),
            ])
            .unwrap();
            let policies = PolicyCatalog::new(
                vec![
                    Policy::new("wash", "WASH").with_effect("access", 5.0),
                    Policy::new("green", "Green energy"),
                ],
                &indicators,
            )
            .unwrap();
            let interventions = InterventionCatalog::new(
                vec![
                    Intervention::new("wells", "Wells", 3.0, 1.0)
                        .with_effect("access", 10.0)
                        .with_policy("wash"),
                    Intervention::new("solar", "Solar", 4.0, 2.0)
                        .with_effect("renewables", 30.0)
                        .with_policy("green"),
                    Intervention::new("meters", "Meters", 1.0, 1.0)
                        .with_effect("access", 4.0)
                        .with_policy("wash"),
                    Intervention::new("orphan", "Orphan", 0.5, 0.5).with_effect("access", 50.0),
                ],
                &indicators,
                &policies,
            )
            .unwrap();
            Self {
                indicators,
                policies,
                interventions,
                scoring: ScoringConfig::default(),
            }
        }

        fn optimizer(&self) -> InterventionOptimizer<'_> {
            InterventionOptimizer::new(
                &self.indicators,
                &self.policies,
                &self.interventions,
                &self.scoring,
                OptimizerConfig::default(),
            )
        }

        fn selection(&self, ids: &[&str]) -> PolicySelection {
            PolicySelection::from_ids(&self.policies, ids).unwrap()
        }
    }

    fn baseline() -> IndicatorValues {
        IndicatorValues::from([("access".to_string(), 40.0), ("renewables".to_string(), 40.0)])
    }

    #[test]
    fn test_only_linked_candidates() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let ids: Vec<&str> = opt
            .candidates(&f.selection(&["wash"]))
            .iter()
            .map(|iv| iv.id.as_str())
            .collect();
        assert_eq!(ids, vec!["wells", "meters"]);
        assert!(opt.candidates(&PolicySelection::new()).is_empty());
    }

    #[test]
    fn test_unlinked_candidates_when_link_not_required() {
        let f = Fixture::new();
        let opt = InterventionOptimizer::new(
            &f.indicators,
            &f.policies,
            &f.interventions,
            &f.scoring,
            OptimizerConfig::default().with_require_policy_link(false),
        );
        assert_eq!(opt.candidates(&PolicySelection::new()).len(), 4);
    }

    #[test]
    fn test_budget_allows_single_item_only() {
        // Costs 3 and 4 under budget 5: only singletons are feasible.
        let f = Fixture::new();
        let rec = f
            .optimizer()
            .optimize(&baseline(), &f.selection(&["wash", "green"]), Constraints::new(5.0, 10.0))
            .unwrap();
        assert!(rec.total_cost <= 5.0);
        assert!(rec.ids().contains(&"solar"));
        assert!(!rec.ids().contains(&"wells"));
        assert_eq!(rec.strategy, Some(SearchStrategy::Exhaustive));
    }

    #[test]
    fn test_recommendation_ordered_by_contribution() {
        let f = Fixture::new();
        let rec = f
            .optimizer()
            .optimize(&baseline(), &f.selection(&["wash"]), Constraints::new(10.0, 10.0))
            .unwrap();
        assert_eq!(rec.ids(), vec!["wells", "meters"]);
        assert!(rec.interventions[0].contribution >= rec.interventions[1].contribution);
        assert!((rec.remaining_budget - 6.0).abs() < 1e-12);
        assert!((rec.remaining_time - 8.0).abs() < 1e-12);
        assert!(rec.improvement > 0.0);
    }

    #[test]
    fn test_optimize_deterministic() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let sel = f.selection(&["wash", "green"]);
        let a = opt.optimize(&baseline(), &sel, Constraints::new(6.0, 3.0)).unwrap();
        let b = opt.optimize(&baseline(), &sel, Constraints::new(6.0, 3.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_optimize_rejects_bad_constraints() {
        let f = Fixture::new();
        let err = f
            .optimizer()
            .optimize(&baseline(), &f.selection(&["wash"]), Constraints::new(-1.0, 1.0))
            .unwrap_err();
        assert!(matches!(err, WefeError::InvalidConfig(_)));
    }

    #[test]
    fn test_add_and_limits() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let sel = f.selection(&["wash", "green"]);
        let plan = InterventionPlan::new(Constraints::new(5.0, 2.0));

        let step = opt.add(&baseline(), &sel, &plan, "wells").unwrap();
        assert_eq!(step.plan.accepted, vec!["wells"]);
        assert!((step.recommendation.remaining_budget - 2.0).abs() < 1e-12);

        assert_eq!(
            opt.add(&baseline(), &sel, &step.plan, "solar"),
            Err(WefeError::BudgetExceeded {
                required: 7.0,
                available: 5.0
            })
        );
        assert_eq!(
            opt.add(&baseline(), &sel, &step.plan, "wells"),
            Err(WefeError::DuplicateSelection("wells".into()))
        );
        assert_eq!(
            opt.add(&baseline(), &sel, &step.plan, "ghost"),
            Err(WefeError::UnknownIntervention("ghost".into()))
        );

        let step = opt.add(&baseline(), &sel, &step.plan, "meters").unwrap();
        assert_eq!(
            opt.add(&baseline(), &sel, &step.plan, "orphan"),
            Err(WefeError::TimeExceeded {
                required: 2.5,
                available: 2.0
            })
        );
    }

    #[test]
    fn test_remove_frees_budget() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let sel = f.selection(&["wash"]);
        let plan = InterventionPlan {
            accepted: vec!["wells".into(), "meters".into()],
            constraints: Constraints::new(5.0, 5.0),
        };

        let step = opt.remove(&baseline(), &sel, &plan, "wells").unwrap();
        assert_eq!(step.plan.accepted, vec!["meters"]);
        assert!((step.recommendation.remaining_budget - 4.0).abs() < 1e-12);

        assert_eq!(
            opt.remove(&baseline(), &sel, &step.plan, "wells"),
            Err(WefeError::NotSelected("wells".into()))
        );
    }

    #[test]
    fn test_replace_is_atomic() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let sel = f.selection(&["wash", "green"]);
        let plan = InterventionPlan {
            accepted: vec!["meters".into(), "wells".into()],
            constraints: Constraints::new(4.5, 5.0),
        };
        let before = plan.clone();

        // meters (1) + solar (4) = 5 > 4.5
        let err = opt
            .replace(&baseline(), &sel, &plan, "wells", "solar")
            .unwrap_err();
        assert!(matches!(err, WefeError::BudgetExceeded { .. }));
        assert_eq!(plan, before);

        let step = opt
            .replace(&baseline(), &sel, &plan, "wells", "orphan")
            .unwrap();
        assert_eq!(step.plan.accepted, vec!["meters", "orphan"]);
    }

    #[test]
    fn test_replace_validation() {
        let f = Fixture::new();
        let opt = f.optimizer();
        let sel = f.selection(&["wash"]);
        let plan = InterventionPlan {
            accepted: vec!["wells".into(), "meters".into()],
            constraints: Constraints::new(10.0, 10.0),
        };
        assert_eq!(
            opt.replace(&baseline(), &sel, &plan, "solar", "orphan"),
            Err(WefeError::NotSelected("solar".into()))
        );
        assert_eq!(
            opt.replace(&baseline(), &sel, &plan, "wells", "meters"),
            Err(WefeError::DuplicateSelection("meters".into()))
        );
    }

    #[test]
    fn test_invalid_scoring_weights_rejected() {
        let f = Fixture::new();
        let scoring = ScoringConfig::default().with_pillar_weight(Pillar::Water, -3.0);
        let opt = InterventionOptimizer::new(
            &f.indicators,
            &f.policies,
            &f.interventions,
            &scoring,
            OptimizerConfig::default(),
        );
        let sel = f.selection(&["wash"]);
        let plan = InterventionPlan::new(Constraints::new(10.0, 10.0));

        assert!(matches!(
            opt.optimize(&baseline(), &sel, plan.constraints),
            Err(WefeError::InvalidConfig(_))
        ));
        assert!(matches!(
            opt.evaluate(&baseline(), &sel, &plan),
            Err(WefeError::InvalidConfig(_))
        ));
        assert!(matches!(
            opt.add(&baseline(), &sel, &plan, "wells"),
            Err(WefeError::InvalidConfig(_))
        ));
    }

    fn overall_with(
        indicators: &IndicatorCatalog,
        scoring: &ScoringConfig,
        base: &IndicatorValues,
        chosen: &[&Intervention],
    ) -> f64 {
        let sources: Vec<&dyn EffectSource> =
            chosen.iter().map(|&iv| iv as &dyn EffectSource).collect();
        let values = compose(indicators, base, &sources).unwrap();
        Normalizer::new(indicators, scoring)
            .score(&values)
            .unwrap()
            .overall_or_zero()
    }

    fn totals(chosen: &[&Intervention]) -> (f64, f64) {
        (
            chosen.iter().map(|iv| iv.cost).sum(),
            chosen.iter().map(|iv| iv.duration).sum(),
        )
    }

    proptest! {
        #[test]
        fn prop_optimize_feasible_and_not_dominated(
            items in proptest::collection::vec(
                (0.0f64..6.0, 0.0f64..4.0, -20.0f64..30.0, -20.0f64..30.0),
                1..9,
            ),
            budget in 0.0f64..12.0,
            horizon in 0.0f64..8.0,
            greedy_only in proptest::bool::ANY,
        ) {
            let indicators = IndicatorCatalog::new(vec![
                Indicator::new("access", "Water access", Pillar::Water, 0.0, 100.0),
                Indicator::new("renewables", "Renewable share", Pillar::Energy, 0.0, 100.0),
            ])
            .unwrap();
            let policies = PolicyCatalog::new(vec![Policy::new("wash", "WASH")], &indicators).unwrap();
            let list: Vec<Intervention> = items
                .iter()
                .enumerate()
                .map(|(i, &(c, d, water, energy))| {
                    Intervention::new(format!("iv{i}"), "Iv", c, d)
                        .with_effect("access", water)
                        .with_effect("renewables", energy)
                        .with_policy("wash")
                })
                .collect();
            let interventions = InterventionCatalog::new(list, &indicators, &policies).unwrap();
            let scoring = ScoringConfig::default();
            let strategy = if greedy_only { SearchStrategy::Greedy } else { SearchStrategy::Auto };
            let config = OptimizerConfig::default().with_strategy(strategy);
            let eps = config.epsilon;
            let opt = InterventionOptimizer::new(
                &indicators,
                &policies,
                &interventions,
                &scoring,
                config,
            );
            let sel = PolicySelection::from_ids(&policies, ["wash"]).unwrap();
            let base = IndicatorValues::from([
                ("access".to_string(), 50.0),
                ("renewables".to_string(), 50.0),
            ]);
            let limits = Constraints::new(budget, horizon);

            let rec = opt.optimize(&base, &sel, limits).unwrap();
            prop_assert!(limits.admits(rec.total_cost, rec.total_duration));
            prop_assert!(rec.improvement >= -1e-9);

            let all: Vec<&Intervention> = interventions.iter().collect();
            let chosen: Vec<usize> = rec
                .ids()
                .iter()
                .map(|id| interventions.position(id).unwrap())
                .collect();
            let pick = |set: &[usize]| set.iter().map(|&i| all[i]).collect::<Vec<&Intervention>>();
            let score = |set: &[usize]| overall_with(&indicators, &scoring, &base, &pick(set));
            let feasible = |set: &[usize]| {
                let (cost, duration) = totals(&pick(set));
                limits.admits(cost, duration)
            };
            let found = score(chosen.as_slice());

            // No single add, drop, or swap improves a returned set.
            let outside: Vec<usize> = (0..all.len()).filter(|i| !chosen.contains(i)).collect();
            let mut moves: Vec<Vec<usize>> = Vec::new();
            for &i in &chosen {
                let dropped: Vec<usize> = chosen.iter().copied().filter(|&x| x != i).collect();
                for &j in &outside {
                    let mut swapped = dropped.clone();
                    swapped.push(j);
                    moves.push(swapped);
                }
                moves.push(dropped);
            }
            for &j in &outside {
                let mut added = chosen.clone();
                added.push(j);
                moves.push(added);
            }
            for set in &moves {
                if feasible(set.as_slice()) {
                    prop_assert!(
                        score(set.as_slice()) <= found + eps,
                        "move {:?} beats {:?}",
                        set,
                        chosen
                    );
                }
            }

            // Exhaustive search: no feasible subset at all beats the result.
            if !greedy_only {
                for mask in 0u32..(1 << all.len()) {
                    let set: Vec<usize> = (0..all.len()).filter(|&i| mask & (1 << i) != 0).collect();
                    if feasible(set.as_slice()) {
                        prop_assert!(
                            score(set.as_slice()) <= found + eps,
                            "subset {:?} beats {:?}",
                            set,
                            chosen
                        );
                    }
                }
            }
        }
    }
}
