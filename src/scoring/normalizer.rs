//! Min-max normalization and order-independent aggregation.

use super::config::ScoringConfig;
use super::types::{
    ExcludedPillar, ExclusionReason, IndicatorScore, OverallBreakdown, PillarContribution,
    PillarScore, ScoreCard, WeightedScore,
};
use crate::catalog::{Direction, Indicator, IndicatorCatalog, IndicatorValues, Pillar};
use crate::error::{WefeError, WefeResult};
use crate::math::stable_weighted_mean;

/// Maps `raw` onto `[0, 1]` via `(raw - min) / (max - min)`, clamped.
///
/// Lower-is-better indicators are flipped to `1 - x` after clamping.
///
/// # Errors
///
/// `OutOfDomain` when the bounds are degenerate (`max <= min`) or either the
/// bounds or `raw` are not finite.
pub fn normalize(indicator: &Indicator, raw: f64) -> WefeResult<f64> {
    let span = indicator.max - indicator.min;
    if !span.is_finite() || span <= 0.0 {
        return Err(WefeError::out_of_domain(
            &indicator.id,
            format!("degenerate bounds [{}, {}]", indicator.min, indicator.max),
        ));
    }
    if !raw.is_finite() {
        return Err(WefeError::out_of_domain(&indicator.id, "value is not finite"));
    }

    let unit = ((raw - indicator.min) / span).clamp(0.0, 1.0);
    Ok(match indicator.direction {
        Direction::HigherIsBetter => unit,
        Direction::LowerIsBetter => 1.0 - unit,
    })
}

fn check_weights(scores: &[WeightedScore]) -> WefeResult<()> {
    match scores.iter().find(|s| !s.weight.is_finite() || s.weight < 0.0) {
        Some(bad) => Err(WefeError::InvalidConfig(format!(
            "aggregation weight must be finite and non-negative, got {}",
            bad.weight
        ))),
        None => Ok(()),
    }
}

/// Weighted mean of member unit scores.
///
/// The result depends only on the multiset of `(score, weight)` pairs, not on
/// their order. Returns `None` when nothing carries positive weight.
pub fn aggregate_pillar(scores: &[WeightedScore]) -> WefeResult<Option<f64>> {
    check_weights(scores)?;
    let mut pairs: Vec<(f64, f64)> = scores.iter().map(|s| (s.score, s.weight)).collect();
    Ok(stable_weighted_mean(&mut pairs))
}

/// Weighted mean of pillar scores. Same contract as [`aggregate_pillar`].
pub fn aggregate_overall(pillar_scores: &[WeightedScore]) -> WefeResult<Option<f64>> {
    aggregate_pillar(pillar_scores)
}

/// Produces [`ScoreCard`]s for raw values against an indicator catalog.
pub struct Normalizer<'a> {
    catalog: &'a IndicatorCatalog,
    config: &'a ScoringConfig,
}

impl<'a> Normalizer<'a> {
    pub fn new(catalog: &'a IndicatorCatalog, config: &'a ScoringConfig) -> Self {
        Self { catalog, config }
    }

    /// Scores every catalogued indicator that has a value in `values`.
    ///
    /// Values for ids outside the catalog fail with `UnknownIndicator`.
    pub fn score(&self, values: &IndicatorValues) -> WefeResult<ScoreCard> {
        if let Some(unknown) = values.keys().find(|id| self.catalog.get(id).is_none()) {
            return Err(WefeError::UnknownIndicator(unknown.clone()));
        }

        let mut indicators = Vec::with_capacity(values.len());
        for (number, ind) in self.catalog.numbered() {
            if let Some(&raw) = values.get(&ind.id) {
                indicators.push(IndicatorScore {
                    id: ind.id.clone(),
                    number,
                    pillar: ind.pillar,
                    raw,
                    score: normalize(ind, raw)?,
                });
            }
        }

        let mut pillars = Vec::with_capacity(Pillar::ALL.len());
        for pillar in Pillar::ALL {
            let members: Vec<WeightedScore> = indicators
                .iter()
                .filter(|s| s.pillar == pillar)
                .map(|s| WeightedScore::new(s.score, self.config.indicator_weight(&s.id)))
                .collect();
            pillars.push(PillarScore {
                pillar,
                score: aggregate_pillar(&members)?,
                indicator_count: members.len(),
            });
        }

        let (overall, breakdown) = self.overall(&pillars)?;
        Ok(ScoreCard {
            indicators,
            pillars,
            overall,
            breakdown,
        })
    }

    fn overall(&self, pillars: &[PillarScore]) -> WefeResult<(Option<f64>, OverallBreakdown)> {
        let mut breakdown = OverallBreakdown::default();
        let mut weighted = Vec::with_capacity(pillars.len());

        for p in pillars {
            let weight = self.config.pillar_weight(p.pillar);
            match p.score {
                Some(score) if weight > 0.0 => {
                    weighted.push(WeightedScore::new(score, weight));
                    breakdown.included.push(PillarContribution {
                        pillar: p.pillar,
                        score,
                        weight,
                        weighted_contribution: score * weight,
                    });
                }
                score => breakdown.excluded.push(ExcludedPillar {
                    pillar: p.pillar,
                    score,
                    weight,
                    reason: if weight <= 0.0 {
                        ExclusionReason::ZeroWeight
                    } else {
                        ExclusionReason::ScoreUnavailable
                    },
                }),
            }
        }

        breakdown.total_weight = weighted.iter().map(|w| w.weight).sum();
        Ok((aggregate_overall(&weighted)?, breakdown))
    }
}
