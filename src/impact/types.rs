//! The effect-source abstraction shared by policies and interventions.

use crate::catalog::{Effects, Intervention, Policy};

/// Anything that shifts raw indicator values by signed magnitudes.
///
/// Policies and interventions compose through the same rule, so the
/// calculator only needs to see them through this trait.
pub trait EffectSource {
    fn source_id(&self) -> &str;

    fn effects(&self) -> &Effects;
}

impl EffectSource for Policy {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn effects(&self) -> &Effects {
        &self.effects
    }
}

impl EffectSource for Intervention {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn effects(&self) -> &Effects {
        &self.effects
    }
}
