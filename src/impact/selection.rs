//! Ordered, duplicate-free policy selection.

use crate::catalog::{Policy, PolicyCatalog};
use crate::error::{WefeError, WefeResult};
use crate::math::stable_sum;

/// An ordered set of selected policy ids.
///
/// The selection itself is plain data owned by the caller. Mutations check
/// ids against the catalog because they originate from interactive input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PolicySelection {
    ids: Vec<String>,
}

impl PolicySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection by inserting `ids` in order.
    pub fn from_ids<I, S>(catalog: &PolicyCatalog, ids: I) -> WefeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.insert(catalog, id.as_ref())?;
        }
        Ok(selection)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Appends `id`.
    ///
    /// # Errors
    ///
    /// `UnknownPolicy`, `DuplicateSelection`, or `MissingPrerequisite` when a
    /// prerequisite of the policy is not selected yet. The selection is left
    /// untouched on error.
    pub fn insert(&mut self, catalog: &PolicyCatalog, id: &str) -> WefeResult<()> {
        let policy = catalog.require(id)?;
        if self.contains(id) {
            return Err(WefeError::DuplicateSelection(id.to_string()));
        }
        if let Some(missing) = policy.prerequisites.iter().find(|p| !self.contains(p)) {
            return Err(WefeError::MissingPrerequisite {
                policy: id.to_string(),
                prerequisite: missing.clone(),
            });
        }
        self.ids.push(id.to_string());
        Ok(())
    }

    /// Removes `id`, refusing when another selected policy depends on it.
    pub fn remove(&mut self, catalog: &PolicyCatalog, id: &str) -> WefeResult<()> {
        catalog.require(id)?;
        let pos = self
            .ids
            .iter()
            .position(|s| s == id)
            .ok_or_else(|| WefeError::NotSelected(id.to_string()))?;

        for other in self.ids.iter().filter(|s| *s != id) {
            let dependent = catalog.require(other)?;
            if dependent.prerequisites.iter().any(|p| p == id) {
                return Err(WefeError::PrerequisiteInUse {
                    policy: id.to_string(),
                    dependent: other.clone(),
                });
            }
        }

        self.ids.remove(pos);
        Ok(())
    }

    /// Looks every selected id up in the catalog, in selection order.
    ///
    /// A deserialized selection may carry duplicates or stale ids; both are
    /// reported here.
    pub fn resolve<'a>(&self, catalog: &'a PolicyCatalog) -> WefeResult<Vec<&'a Policy>> {
        let mut policies: Vec<&Policy> = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            let policy = catalog.require(id)?;
            if policies.iter().any(|p| p.id == *id) {
                return Err(WefeError::DuplicateSelection(id.clone()));
            }
            policies.push(policy);
        }
        Ok(policies)
    }

    /// Sum of the informational costs of selected policies.
    pub fn total_cost(&self, catalog: &PolicyCatalog) -> WefeResult<f64> {
        let mut costs: Vec<f64> = self
            .resolve(catalog)?
            .iter()
            .filter_map(|p| p.cost)
            .collect();
        Ok(stable_sum(&mut costs))
    }
}
