//! Policy and intervention lookup by affected indicator.

use crate::catalog::{IndicatorCatalog, InterventionCatalog, PolicyCatalog};
use crate::error::WefeResult;
use crate::rank::{RankEngine, RankRule, TieBreaker};

/// A catalog entry that moves the searched indicator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndicatorMatch {
    pub id: String,
    pub name: String,
    /// Signed effect of this entry alone on the searched indicator.
    pub magnitude: f64,
    /// 0-based position in the searched catalog.
    pub catalog_position: usize,
}

struct MagnitudeAscending;

impl RankRule<IndicatorMatch, ()> for MagnitudeAscending {
    fn name(&self) -> &str {
        "MagnitudeAscending"
    }

    fn key(&self, item: &IndicatorMatch, _ctx: &()) -> f64 {
        item.magnitude
    }
}

fn rank_matches(matches: Vec<IndicatorMatch>) -> Vec<IndicatorMatch> {
    let tie_index: Vec<usize> = matches.iter().map(|m| m.catalog_position).collect();
    RankEngine::new()
        .with_rule(MagnitudeAscending)
        .with_tie_breaker(TieBreaker::ByIndex)
        .with_epsilon(0.0)
        .rank(matches, &tie_index, &())
}

/// Side query path answering "what moves this indicator?".
///
/// Independent of any running simulation: magnitudes are each entry's own
/// effect, never combined with a current selection.
pub struct SearchIndex<'a> {
    indicators: &'a IndicatorCatalog,
    policies: &'a PolicyCatalog,
}

impl<'a> SearchIndex<'a> {
    pub fn new(indicators: &'a IndicatorCatalog, policies: &'a PolicyCatalog) -> Self {
        Self {
            indicators,
            policies,
        }
    }

    /// Policies with a nonzero effect on `indicator`, by magnitude ascending.
    ///
    /// Equal magnitudes keep policy catalog order. Policies with no effect
    /// are left out.
    pub fn find_policies_for_indicator(&self, indicator: &str) -> WefeResult<Vec<IndicatorMatch>> {
        self.indicators.require(indicator)?;
        let matches = self
            .policies
            .iter()
            .enumerate()
            .filter_map(|(pos, p)| {
                let magnitude = p.effect_on(indicator);
                (magnitude != 0.0).then(|| IndicatorMatch {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    magnitude,
                    catalog_position: pos,
                })
            })
            .collect();
        Ok(rank_matches(matches))
    }

    /// Interventions with a nonzero effect on `indicator`, same ordering.
    pub fn find_interventions_for_indicator(
        &self,
        interventions: &InterventionCatalog,
        indicator: &str,
    ) -> WefeResult<Vec<IndicatorMatch>> {
        self.indicators.require(indicator)?;
        let matches = interventions
            .iter()
            .enumerate()
            .filter_map(|(pos, iv)| {
                let magnitude = iv.effect_on(indicator);
                (magnitude != 0.0).then(|| IndicatorMatch {
                    id: iv.id.clone(),
                    name: iv.name.clone(),
                    magnitude,
                    catalog_position: pos,
                })
            })
            .collect();
        Ok(rank_matches(matches))
    }
}
