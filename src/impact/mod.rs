//! Policy impact composition.
//!
//! Every selected policy (and, at simulation time, every accepted
//! intervention) contributes signed per-indicator effects. Effects on the
//! same indicator are summed, and the sum is clamped to the indicator's
//! bounds exactly once. Composition is therefore commutative: selection order
//! never changes the adjusted values.

mod calculator;
mod selection;
mod types;

pub use calculator::{compose, net_deltas, ImpactCalculator};
pub use selection::PolicySelection;
pub use types::EffectSource;
