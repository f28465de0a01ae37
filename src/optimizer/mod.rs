//! Intervention optimizer.
//!
//! Chooses a subset of interventions that maximizes the projected overall
//! WEFE score subject to a budget and a time horizon, and supports manual
//! add, remove, and replace edits on a caller-owned plan.
//!
//! # Search
//!
//! - **Exhaustive**: depth-first enumeration with infeasible branches pruned.
//!   Exact. Used by default up to [`OptimizerConfig::exhaustive_limit`]
//!   candidates.
//! - **Greedy**: gain-per-resource construction followed by add/drop/swap
//!   local search. The result is feasible and locally optimal.
//!
//! Both are deterministic: equal inputs give equal recommendations.

mod config;
mod runner;
mod solver;
mod types;

pub use config::{OptimizerConfig, SearchStrategy, MAX_EXHAUSTIVE_LIMIT};
pub use runner::InterventionOptimizer;
pub use types::{Constraints, InterventionPlan, PlanUpdate, RankedIntervention, Recommendation};
