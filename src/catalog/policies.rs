//! Policy and intervention catalogs.

use super::indicators::IndicatorCatalog;
use super::types::{Effects, Intervention, Pillar, Policy};
use crate::error::{WefeError, WefeResult};
use crate::math::stable_sum;
use std::collections::{BTreeSet, HashMap};

fn check_effects(owner: &str, effects: &Effects, indicators: &IndicatorCatalog) -> WefeResult<()> {
    for (id, magnitude) in effects {
        indicators.require(id)?;
        if !magnitude.is_finite() {
            return Err(WefeError::InvalidCatalog(format!(
                "`{owner}` has a non-finite effect on `{id}`"
            )));
        }
    }
    Ok(())
}

fn check_amount(owner: &str, field: &str, value: f64) -> WefeResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(WefeError::InvalidCatalog(format!(
            "`{owner}` {field} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

/// Read-only, ordered policy catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyCatalog {
    policies: Vec<Policy>,
    positions: HashMap<String, usize>,
}

impl PolicyCatalog {
    /// Builds the catalog.
    ///
    /// Every effect must target a catalogued indicator, and every
    /// prerequisite must name another policy in the same catalog.
    pub fn new(policies: Vec<Policy>, indicators: &IndicatorCatalog) -> WefeResult<Self> {
        let mut positions = HashMap::with_capacity(policies.len());
        for (pos, policy) in policies.iter().enumerate() {
            if positions.insert(policy.id.clone(), pos).is_some() {
                return Err(WefeError::InvalidCatalog(format!(
                    "duplicate policy id `{}`",
                    policy.id
                )));
            }
            check_effects(&policy.id, &policy.effects, indicators)?;
            if let Some(cost) = policy.cost {
                check_amount(&policy.id, "cost", cost)?;
            }
        }

        for policy in &policies {
            for pre in &policy.prerequisites {
                if pre == &policy.id {
                    return Err(WefeError::InvalidCatalog(format!(
                        "policy `{}` lists itself as a prerequisite",
                        policy.id
                    )));
                }
                if !positions.contains_key(pre) {
                    return Err(WefeError::UnknownPolicy(pre.clone()));
                }
            }
        }

        Ok(Self {
            policies,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Policy> {
        self.positions.get(id).map(|&pos| &self.policies[pos])
    }

    pub fn require(&self, id: &str) -> WefeResult<&Policy> {
        self.get(id)
            .ok_or_else(|| WefeError::UnknownPolicy(id.to_string()))
    }

    /// 0-based catalog position, used as the deterministic tie-breaker.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Policy> {
        self.policies.iter()
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        self.policies
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Policy> + 'a {
        self.policies.iter().filter(move |p| p.category == category)
    }
}

impl Policy {
    /// The pillar this policy moves the most.
    ///
    /// Sums absolute effects per pillar; ties go to the earlier pillar in
    /// [`Pillar::ALL`]. A policy without catalogued effects falls back to
    /// [`Pillar::Ecosystems`].
    pub fn primary_pillar(&self, indicators: &IndicatorCatalog) -> Pillar {
        let mut best: Option<(Pillar, f64)> = None;
        for pillar in Pillar::ALL {
            let mut terms: Vec<f64> = self
                .effects
                .iter()
                .filter(|(id, _)| indicators.get(id).is_some_and(|ind| ind.pillar == pillar))
                .map(|(_, m)| m.abs())
                .collect();
            let weight = stable_sum(&mut terms);
            if weight > 0.0 && best.map_or(true, |(_, w)| weight > w) {
                best = Some((pillar, weight));
            }
        }
        best.map(|(p, _)| p).unwrap_or(Pillar::Ecosystems)
    }
}

/// Read-only, ordered intervention catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct InterventionCatalog {
    interventions: Vec<Intervention>,
    positions: HashMap<String, usize>,
}

impl InterventionCatalog {
    /// Builds the catalog, checking costs, durations, effects, and policy links.
    pub fn new(
        interventions: Vec<Intervention>,
        indicators: &IndicatorCatalog,
        policies: &PolicyCatalog,
    ) -> WefeResult<Self> {
        let mut positions = HashMap::with_capacity(interventions.len());
        for (pos, iv) in interventions.iter().enumerate() {
            if positions.insert(iv.id.clone(), pos).is_some() {
                return Err(WefeError::InvalidCatalog(format!(
                    "duplicate intervention id `{}`",
                    iv.id
                )));
            }
            check_amount(&iv.id, "cost", iv.cost)?;
            check_amount(&iv.id, "duration", iv.duration)?;
            check_effects(&iv.id, &iv.effects, indicators)?;
            for policy in &iv.policy_ids {
                policies.require(policy)?;
            }
        }

        Ok(Self {
            interventions,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Intervention> {
        self.positions.get(id).map(|&pos| &self.interventions[pos])
    }

    pub fn require(&self, id: &str) -> WefeResult<&Intervention> {
        self.get(id)
            .ok_or_else(|| WefeError::UnknownIntervention(id.to_string()))
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intervention> {
        self.interventions.iter()
    }
}
