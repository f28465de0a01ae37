//! Subset search over candidate interventions.
//!
//! # Objective
//!
//! The score of a subset is the overall score of
//! `clamp(baseline + Σ policy effects + Σ subset effects)`: the same
//! sum-then-clamp composition and normalization used everywhere else, so the
//! optimizer and the final projection can never disagree.
//!
//! # Ordering of equal-scoring subsets
//!
//! Subsets within `epsilon` of each other are ordered by lower total cost,
//! then lower total duration, then the lexicographically smaller sorted index
//! list (earlier catalog entries first). This makes every search
//! deterministic.

use super::types::Constraints;
use crate::catalog::{IndicatorCatalog, IndicatorValues, Intervention, Policy};
use crate::error::WefeResult;
use crate::impact::{compose, EffectSource};
use crate::math::{stable_sum, FEASIBILITY_TOLERANCE};
use crate::scoring::{Normalizer, ScoringConfig};
use tracing::trace;

/// Scores candidate subsets for one baseline and policy selection.
pub(crate) struct Objective<'a> {
    indicators: &'a IndicatorCatalog,
    scoring: &'a ScoringConfig,
    baseline: &'a IndicatorValues,
    policies: Vec<&'a Policy>,
    pub(crate) candidates: Vec<&'a Intervention>,
}

impl<'a> Objective<'a> {
    pub(crate) fn new(
        indicators: &'a IndicatorCatalog,
        scoring: &'a ScoringConfig,
        baseline: &'a IndicatorValues,
        policies: Vec<&'a Policy>,
        candidates: Vec<&'a Intervention>,
    ) -> Self {
        Self {
            indicators,
            scoring,
            baseline,
            policies,
            candidates,
        }
    }

    /// Overall score with the candidates at `set` applied.
    pub(crate) fn score(&self, set: &[usize]) -> WefeResult<f64> {
        let mut sources: Vec<&dyn EffectSource> =
            Vec::with_capacity(self.policies.len() + set.len());
        sources.extend(self.policies.iter().map(|&p| p as &dyn EffectSource));
        sources.extend(set.iter().map(|&i| self.candidates[i] as &dyn EffectSource));

        let values = compose(self.indicators, self.baseline, &sources)?;
        let card = Normalizer::new(self.indicators, self.scoring).score(&values)?;
        Ok(card.overall_or_zero())
    }

    pub(crate) fn cost(&self, set: &[usize]) -> f64 {
        let mut terms: Vec<f64> = set.iter().map(|&i| self.candidates[i].cost).collect();
        stable_sum(&mut terms)
    }

    pub(crate) fn duration(&self, set: &[usize]) -> f64 {
        let mut terms: Vec<f64> = set.iter().map(|&i| self.candidates[i].duration).collect();
        stable_sum(&mut terms)
    }

    pub(crate) fn evaluate(&self, set: Vec<usize>) -> WefeResult<Evaluated> {
        Ok(Evaluated {
            score: self.score(&set)?,
            cost: self.cost(&set),
            duration: self.duration(&set),
            set,
        })
    }
}

/// A scored subset. `set` holds sorted candidate indices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Evaluated {
    pub set: Vec<usize>,
    pub score: f64,
    pub cost: f64,
    pub duration: f64,
}

impl Evaluated {
    pub(crate) fn is_better_than(&self, other: &Evaluated, eps: f64) -> bool {
        if self.score > other.score + eps {
            return true;
        }
        if self.score < other.score - eps {
            return false;
        }
        if (self.cost - other.cost).abs() > FEASIBILITY_TOLERANCE {
            return self.cost < other.cost;
        }
        if (self.duration - other.duration).abs() > FEASIBILITY_TOLERANCE {
            return self.duration < other.duration;
        }
        self.set < other.set
    }
}

fn with(set: &[usize], i: usize) -> Vec<usize> {
    let mut next = set.to_vec();
    let pos = next.partition_point(|&x| x < i);
    next.insert(pos, i);
    next
}

fn without(set: &[usize], i: usize) -> Vec<usize> {
    set.iter().copied().filter(|&x| x != i).collect()
}

struct Enumeration<'o, 'a> {
    objective: &'o Objective<'a>,
    constraints: Constraints,
    eps: f64,
    current: Vec<usize>,
    best: Evaluated,
    visited: usize,
}

impl Enumeration<'_, '_> {
    fn visit(&mut self, next: usize, cost: f64, duration: f64) -> WefeResult<()> {
        if next == self.objective.candidates.len() {
            self.visited += 1;
            let candidate = self.objective.evaluate(self.current.clone())?;
            if candidate.is_better_than(&self.best, self.eps) {
                self.best = candidate;
            }
            return Ok(());
        }

        let iv = self.objective.candidates[next];
        let (with_cost, with_duration) = (cost + iv.cost, duration + iv.duration);
        if self.constraints.admits(with_cost, with_duration) {
            self.current.push(next);
            self.visit(next + 1, with_cost, with_duration)?;
            self.current.pop();
        }
        self.visit(next + 1, cost, duration)
    }
}

/// Exact search over every feasible subset, pruning infeasible branches.
pub(crate) fn exhaustive(
    objective: &Objective<'_>,
    constraints: Constraints,
    eps: f64,
) -> WefeResult<Evaluated> {
    let mut search = Enumeration {
        objective,
        constraints,
        eps,
        current: Vec::new(),
        best: objective.evaluate(Vec::new())?,
        visited: 0,
    };
    search.visit(0, 0.0, 0.0)?;
    trace!(subsets = search.visited, "exhaustive search finished");
    Ok(search.best)
}

/// Fraction of both limits an intervention consumes.
fn resource_share(iv: &Intervention, constraints: Constraints) -> f64 {
    let share = |used: f64, limit: f64| if limit > 0.0 { used / limit } else { 0.0 };
    let total = share(iv.cost, constraints.budget) + share(iv.duration, constraints.time_horizon);
    total.max(f64::MIN_POSITIVE)
}

/// Greedy construction by gain per resource share, then local search.
///
/// Each construction step adds the feasible candidate with the highest
/// `gain / (cost / budget + duration / horizon)`; ties go to the larger gain,
/// then the earlier candidate.
pub(crate) fn greedy(
    objective: &Objective<'_>,
    constraints: Constraints,
    eps: f64,
    max_rounds: usize,
) -> WefeResult<Evaluated> {
    let n = objective.candidates.len();
    let mut current = objective.evaluate(Vec::new())?;

    loop {
        let mut best: Option<(f64, Evaluated)> = None;
        for i in (0..n).filter(|i| !current.set.contains(i)) {
            let iv = objective.candidates[i];
            if !constraints.admits(current.cost + iv.cost, current.duration + iv.duration) {
                continue;
            }
            let next = objective.evaluate(with(&current.set, i))?;
            let gain = next.score - current.score;
            if gain <= eps {
                continue;
            }
            let ratio = gain / resource_share(iv, constraints);
            let replace = match &best {
                None => true,
                Some((r, b)) => ratio > *r || (ratio == *r && next.score > b.score + eps),
            };
            if replace {
                best = Some((ratio, next));
            }
        }
        match best {
            Some((ratio, next)) => {
                trace!(set = ?next.set, ratio, "greedy insertion");
                current = next;
            }
            None => break,
        }
    }

    improve(objective, constraints, current, eps, max_rounds)
}

/// Add/drop/swap local search.
///
/// Stops when no single move yields a feasible subset scoring more than
/// `eps` above the current one, so the result is never beaten by a one-item
/// swap.
pub(crate) fn improve(
    objective: &Objective<'_>,
    constraints: Constraints,
    mut current: Evaluated,
    eps: f64,
    max_rounds: usize,
) -> WefeResult<Evaluated> {
    let n = objective.candidates.len();

    for round in 0..max_rounds {
        let inside = current.set.clone();
        let outside: Vec<usize> = (0..n).filter(|i| !inside.contains(i)).collect();

        let mut moves: Vec<Vec<usize>> = Vec::new();
        moves.extend(inside.iter().map(|&i| without(&inside, i)));
        moves.extend(outside.iter().map(|&j| with(&inside, j)));
        for &i in &inside {
            let dropped = without(&inside, i);
            moves.extend(outside.iter().map(|&j| with(&dropped, j)));
        }

        let mut best: Option<Evaluated> = None;
        for set in moves {
            if !constraints.admits(objective.cost(&set), objective.duration(&set)) {
                continue;
            }
            let candidate = objective.evaluate(set)?;
            if candidate.score <= current.score + eps {
                continue;
            }
            if best.as_ref().map_or(true, |b| candidate.is_better_than(b, eps)) {
                best = Some(candidate);
            }
        }

        match best {
            Some(next) => {
                trace!(round, set = ?next.set, score = next.score, "local search move");
                current = next;
            }
            None => break,
        }
    }

    Ok(current)
}
