//! Sum-then-clamp composition of policy and intervention effects.

use super::selection::PolicySelection;
use super::types::EffectSource;
use crate::catalog::{Effects, IndicatorCatalog, IndicatorValues, Intervention, PolicyCatalog};
use crate::error::WefeResult;
use crate::math::stable_sum;
use std::collections::BTreeMap;
use tracing::trace;

/// Net signed delta per indicator across `sources`.
///
/// Overlapping effects are summed, never overridden. The sum is independent
/// of source order.
pub fn net_deltas(sources: &[&dyn EffectSource]) -> Effects {
    let mut terms: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for source in sources {
        for (id, &magnitude) in source.effects() {
            terms.entry(id.as_str()).or_default().push(magnitude);
        }
    }
    terms
        .into_iter()
        .map(|(id, mut t)| (id.to_string(), stable_sum(&mut t)))
        .collect()
}

/// Applies `sources` to `baseline`.
///
/// Each touched indicator becomes `clamp(baseline + Σ effects, min, max)`.
/// The clamp happens once, after summation: a large synergy followed by a
/// trade-off is not saturated at the ceiling before the trade-off applies.
/// Indicators no source touches are returned unchanged, and effects on
/// indicators absent from `baseline` are ignored.
pub fn compose(
    catalog: &IndicatorCatalog,
    baseline: &IndicatorValues,
    sources: &[&dyn EffectSource],
) -> WefeResult<IndicatorValues> {
    let deltas = net_deltas(sources);
    let mut adjusted = IndicatorValues::new();

    for (id, &base) in baseline {
        let indicator = catalog.require(id)?;
        let value = match deltas.get(id) {
            Some(delta) => indicator.clamp(base + delta),
            None => base,
        };
        adjusted.insert(id.clone(), value);
    }

    for id in deltas.keys().filter(|id| !baseline.contains_key(*id)) {
        trace!(indicator = %id, "effect on indicator without baseline value ignored");
    }

    Ok(adjusted)
}

/// Projects baseline values through selected policies and interventions.
pub struct ImpactCalculator<'a> {
    indicators: &'a IndicatorCatalog,
    policies: &'a PolicyCatalog,
}

impl<'a> ImpactCalculator<'a> {
    pub fn new(indicators: &'a IndicatorCatalog, policies: &'a PolicyCatalog) -> Self {
        Self {
            indicators,
            policies,
        }
    }

    /// Adjusted raw values after the selected policies.
    ///
    /// An empty selection returns `baseline` unchanged.
    pub fn apply_policies(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
    ) -> WefeResult<IndicatorValues> {
        self.apply(baseline, selection, &[])
    }

    /// Adjusted raw values after policies and interventions together.
    ///
    /// Intervention effects are summed alongside policy effects before the
    /// single clamp.
    pub fn apply(
        &self,
        baseline: &IndicatorValues,
        selection: &PolicySelection,
        interventions: &[&Intervention],
    ) -> WefeResult<IndicatorValues> {
        let policies = selection.resolve(self.policies)?;
        let mut sources: Vec<&dyn EffectSource> =
            Vec::with_capacity(policies.len() + interventions.len());
        sources.extend(policies.iter().map(|&p| p as &dyn EffectSource));
        sources.extend(interventions.iter().map(|&iv| iv as &dyn EffectSource));
        compose(self.indicators, baseline, &sources)
    }

    /// Signed sum of the selected policies' effects on one indicator.
    pub fn per_indicator_delta(
        &self,
        indicator: &str,
        selection: &PolicySelection,
    ) -> WefeResult<f64> {
        self.indicators.require(indicator)?;
        let mut terms: Vec<f64> = selection
            .resolve(self.policies)?
            .iter()
            .map(|p| p.effect_on(indicator))
            .filter(|&m| m != 0.0)
            .collect();
        Ok(stable_sum(&mut terms))
    }

    /// Net per-indicator deltas of the selected policies.
    pub fn policy_deltas(&self, selection: &PolicySelection) -> WefeResult<Effects> {
        let policies = selection.resolve(self.policies)?;
        let sources: Vec<&dyn EffectSource> =
            policies.iter().map(|&p| p as &dyn EffectSource).collect();
        Ok(net_deltas(&sources))
    }
}
