//! How far recommended interventions reach the policies' targets.

use crate::catalog::{Effects, IndicatorCatalog, Intervention};
use crate::math::stable_sum;

/// Coverage of one policy-targeted indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorCoverage {
    pub indicator: String,
    /// 1-based display number.
    pub number: usize,
    /// Net positive delta the selected policies aim for.
    pub target: f64,
    /// Portion of `target` supplied by the interventions' positive effects.
    pub covered: f64,
    pub unmet: f64,
}

impl IndicatorCoverage {
    pub fn is_met(&self) -> bool {
        self.unmet <= 0.0
    }

    /// `covered / target`, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        self.covered / self.target
    }
}

/// Coverage for every indicator with a positive net policy delta, in display
/// order.
///
/// Negative intervention effects do not reduce coverage; only improvements
/// count toward a target.
pub fn coverage_report(
    indicators: &IndicatorCatalog,
    policy_deltas: &Effects,
    interventions: &[&Intervention],
) -> Vec<IndicatorCoverage> {
    indicators
        .numbered()
        .filter_map(|(number, ind)| {
            let target = policy_deltas.get(&ind.id).copied().filter(|&t| t > 0.0)?;
            let mut supplied: Vec<f64> = interventions
                .iter()
                .map(|iv| iv.effect_on(&ind.id))
                .filter(|&e| e > 0.0)
                .collect();
            let covered = stable_sum(&mut supplied).min(target);
            Some(IndicatorCoverage {
                indicator: ind.id.clone(),
                number,
                target,
                covered,
                unmet: target - covered,
            })
        })
        .collect()
}
