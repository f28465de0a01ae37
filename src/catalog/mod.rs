//! Read-only catalog data supplied by an external loader.
//!
//! - [`IndicatorCatalog`]: ordered indicator definitions; the order defines
//!   display numbering for every consumer.
//! - [`PolicyCatalog`] / [`InterventionCatalog`]: ordered, id-indexed entries
//!   whose effects reference catalogued indicators.
//! - [`LivingLab`]: a site's baseline raw values.
//!
//! Catalog constructors perform all structural validation, so the engine
//! downstream can trust identifiers it receives from a catalog.

mod indicators;
mod policies;
mod types;

pub use indicators::IndicatorCatalog;
pub use policies::{InterventionCatalog, PolicyCatalog};
pub use types::{
    Direction, Effects, Indicator, IndicatorValues, Intervention, LivingLab, Pillar, Policy,
};
