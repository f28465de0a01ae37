//! Catalog entry types: indicators, Living Labs, policies, interventions.

use std::collections::BTreeMap;
use std::fmt;

/// Raw indicator values keyed by indicator id.
///
/// A `BTreeMap` keeps iteration order stable across runs.
pub type IndicatorValues = BTreeMap<String, f64>;

/// Per-indicator signed effect magnitudes keyed by indicator id.
pub type Effects = BTreeMap<String, f64>;

/// Top-level WEFE domain grouping indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Pillar {
    Water,
    Energy,
    Food,
    Ecosystems,
}

impl Pillar {
    /// All pillars in presentation order.
    pub const ALL: [Pillar; 4] = [
        Pillar::Water,
        Pillar::Energy,
        Pillar::Food,
        Pillar::Ecosystems,
    ];

    /// Lowercase key, as used in catalog files.
    pub fn key(self) -> &'static str {
        match self {
            Pillar::Water => "water",
            Pillar::Energy => "energy",
            Pillar::Food => "food",
            Pillar::Ecosystems => "ecosystems",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Pillar::Water => "Water",
            Pillar::Energy => "Energy",
            Pillar::Food => "Food",
            Pillar::Ecosystems => "Ecosystems",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which end of an indicator's range is desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// `max` maps to a unit score of 1.
    #[default]
    HigherIsBetter,
    /// `min` maps to a unit score of 1 (emissions, erosion, undernourishment).
    LowerIsBetter,
}

/// A bounded numeric measure belonging to one pillar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indicator {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unit: String,
    pub pillar: Pillar,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    pub min: f64,
    pub max: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub direction: Direction,
}

impl Indicator {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        pillar: Pillar,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: String::new(),
            pillar,
            category: String::new(),
            min,
            max,
            direction: Direction::HigherIsBetter,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Clamps `value` into `[min, max]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A geographic site with baseline raw indicator values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LivingLab {
    pub id: String,
    pub name: String,
    pub values: IndicatorValues,
}

impl LivingLab {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            values: IndicatorValues::new(),
        }
    }

    pub fn with_value(mut self, indicator: impl Into<String>, value: f64) -> Self {
        self.values.insert(indicator.into(), value);
        self
    }
}

/// A strategic choice with signed per-indicator effects.
///
/// Positive magnitudes are synergies, negative ones trade-offs. Magnitudes are
/// expressed in the affected indicator's raw unit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Effects,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: Option<f64>,
    /// Policies that must already be selected before this one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub prerequisites: Vec<String>,
}

impl Policy {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            effects: Effects::new(),
            cost: None,
            prerequisites: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_effect(mut self, indicator: impl Into<String>, magnitude: f64) -> Self {
        self.effects.insert(indicator.into(), magnitude);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_prerequisite(mut self, policy: impl Into<String>) -> Self {
        self.prerequisites.push(policy.into());
        self
    }

    /// Signed effect on `indicator`, 0 when the policy does not touch it.
    pub fn effect_on(&self, indicator: &str) -> f64 {
        self.effects.get(indicator).copied().unwrap_or(0.0)
    }
}

/// A concrete, costed and timed action with per-indicator effects.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intervention {
    pub id: String,
    pub name: String,
    pub cost: f64,
    pub duration: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Effects,
    /// Policies this intervention advances or is unlocked by.
    #[cfg_attr(feature = "serde", serde(default))]
    pub policy_ids: Vec<String>,
}

impl Intervention {
    pub fn new(id: impl Into<String>, name: impl Into<String>, cost: f64, duration: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            duration,
            effects: Effects::new(),
            policy_ids: Vec::new(),
        }
    }

    pub fn with_effect(mut self, indicator: impl Into<String>, magnitude: f64) -> Self {
        self.effects.insert(indicator.into(), magnitude);
        self
    }

    pub fn with_policy(mut self, policy: impl Into<String>) -> Self {
        self.policy_ids.push(policy.into());
        self
    }

    pub fn effect_on(&self, indicator: &str) -> f64 {
        self.effects.get(indicator).copied().unwrap_or(0.0)
    }

    /// Whether any of `policies` unlocks this intervention.
    pub fn is_linked_to<'a>(&self, mut policies: impl Iterator<Item = &'a str>) -> bool {
        policies.any(|p| self.policy_ids.iter().any(|own| own == p))
    }
}
