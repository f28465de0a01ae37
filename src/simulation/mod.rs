//! Simulation orchestrator.
//!
//! Composes normalization, policy impact, and intervention optimization into
//! a single run per Living Lab:
//!
//! ```text
//! lab values ──normalize──▶ baseline scores
//!      │
//!      └─policies─▶ adjusted values ──normalize──▶ adjusted scores
//!                        │
//!                        └─optimizer─▶ interventions ─▶ final values ─▶ final scores
//! ```
//!
//! Session state ([`SimulationState`]) belongs to the caller. The
//! [`Simulator`] exposes pure transitions over it and keeps nothing between
//! calls.

mod coverage;
mod runner;
mod state;

pub use coverage::{coverage_report, IndicatorCoverage};
pub use runner::Simulator;
pub use state::{SimulationInput, SimulationResult, SimulationState, Transition};
