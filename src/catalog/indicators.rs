//! Ordered indicator catalog and its display numbering.

use super::types::{Indicator, IndicatorValues, LivingLab, Pillar};
use crate::error::{WefeError, WefeResult};
use std::collections::HashMap;

/// Immutable, ordered set of indicator definitions.
///
/// Catalog order is the single source of truth for display numbering:
/// the indicator at position `i` is always number `i + 1`. The number is
/// computed once at construction and every consumer reads it from here.
///
/// # Examples
///
/// ```
/// use u_wefe::catalog::{Indicator, IndicatorCatalog, Pillar};
///
/// let catalog = IndicatorCatalog::new(vec![
///     Indicator::new("access", "Water access", Pillar::Water, 0.0, 100.0),
///     Indicator::new("yield", "Cereal yield", Pillar::Food, 0.0, 8000.0),
/// ])
/// .unwrap();
/// assert_eq!(catalog.number("yield"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Indicator>", into = "Vec<Indicator>")
)]
pub struct IndicatorCatalog {
    indicators: Vec<Indicator>,
    positions: HashMap<String, usize>,
}

impl IndicatorCatalog {
    /// Builds the catalog, rejecting duplicate ids and degenerate bounds.
    pub fn new(indicators: Vec<Indicator>) -> WefeResult<Self> {
        let mut positions = HashMap::with_capacity(indicators.len());

        for (pos, ind) in indicators.iter().enumerate() {
            if !ind.min.is_finite() || !ind.max.is_finite() {
                return Err(WefeError::out_of_domain(&ind.id, "bounds must be finite"));
            }
            if ind.min >= ind.max {
                return Err(WefeError::out_of_domain(
                    &ind.id,
                    format!("min ({}) must be below max ({})", ind.min, ind.max),
                ));
            }
            if positions.insert(ind.id.clone(), pos).is_some() {
                return Err(WefeError::InvalidCatalog(format!(
                    "duplicate indicator id `{}`",
                    ind.id
                )));
            }
        }

        Ok(Self {
            indicators,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Indicator> {
        self.positions.get(id).map(|&pos| &self.indicators[pos])
    }

    /// Like [`get`](Self::get) but fails with `UnknownIndicator`.
    pub fn require(&self, id: &str) -> WefeResult<&Indicator> {
        self.get(id)
            .ok_or_else(|| WefeError::UnknownIndicator(id.to_string()))
    }

    /// 1-based display number of `id`.
    pub fn number(&self, id: &str) -> Option<usize> {
        self.positions.get(id).map(|pos| pos + 1)
    }

    /// 0-based catalog position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Indicators in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Indicator> {
        self.indicators.iter()
    }

    /// `(display number, indicator)` pairs in catalog order.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Indicator)> {
        self.indicators.iter().enumerate().map(|(i, ind)| (i + 1, ind))
    }

    pub fn in_pillar(&self, pillar: Pillar) -> impl Iterator<Item = &Indicator> {
        self.indicators.iter().filter(move |ind| ind.pillar == pillar)
    }

    /// Checks that every lab value refers to a catalogued indicator and lies
    /// within its bounds.
    pub fn validate_lab(&self, lab: &LivingLab) -> WefeResult<()> {
        for (id, &value) in &lab.values {
            let ind = self.require(id)?;
            if !value.is_finite() {
                return Err(WefeError::out_of_domain(id, "value is not finite"));
            }
            if !ind.contains(value) {
                return Err(WefeError::out_of_domain(
                    id,
                    format!(
                        "value {} outside [{}, {}] in lab `{}`",
                        value, ind.min, ind.max, lab.id
                    ),
                ));
            }
        }
        Ok(())
    }

    /// Returns a copy of `lab` with every value clamped into its bounds.
    ///
    /// Unknown ids and non-finite values are still rejected.
    pub fn clamp_lab(&self, lab: &LivingLab) -> WefeResult<LivingLab> {
        let mut values = IndicatorValues::new();
        for (id, &value) in &lab.values {
            let ind = self.require(id)?;
            if !value.is_finite() {
                return Err(WefeError::out_of_domain(id, "value is not finite"));
            }
            values.insert(id.clone(), ind.clamp(value));
        }
        Ok(LivingLab {
            id: lab.id.clone(),
            name: lab.name.clone(),
            values,
        })
    }
}

impl TryFrom<Vec<Indicator>> for IndicatorCatalog {
    type Error = WefeError;

    fn try_from(indicators: Vec<Indicator>) -> WefeResult<Self> {
        Self::new(indicators)
    }
}

impl From<IndicatorCatalog> for Vec<Indicator> {
    fn from(catalog: IndicatorCatalog) -> Self {
        catalog.indicators
    }
}

impl<'a> IntoIterator for &'a IndicatorCatalog {
    type Item = &'a Indicator;
    type IntoIter = std::slice::Iter<'a, Indicator>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
