//! Optimizer configuration.

use crate::error::{WefeError, WefeResult};

/// Hard upper bound for exhaustive search (2^24 subsets).
pub const MAX_EXHAUSTIVE_LIMIT: usize = 24;

/// How the optimizer searches the candidate subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchStrategy {
    /// Exhaustive up to `exhaustive_limit` candidates, greedy beyond.
    #[default]
    Auto,

    /// Enumerates every feasible subset. Exact, exponential in candidates.
    Exhaustive,

    /// Best gain-per-resource insertion followed by add/drop/swap local
    /// search until no single move improves the score.
    Greedy,
}

/// Configuration for [`InterventionOptimizer`](super::InterventionOptimizer).
///
/// # Examples
///
/// ```
/// use u_wefe::optimizer::{OptimizerConfig, SearchStrategy};
///
/// let config = OptimizerConfig::default()
///     .with_strategy(SearchStrategy::Greedy)
///     .with_max_improvement_rounds(64);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerConfig {
    pub strategy: SearchStrategy,

    /// Candidate count up to which `Auto` searches exhaustively.
    pub exhaustive_limit: usize,

    /// Score differences at or below this count as ties.
    pub epsilon: f64,

    /// Upper bound on local-search rounds after greedy construction. At
    /// least 1; a search cut off by this bound may still have improving moves.
    pub max_improvement_rounds: usize,

    /// Only interventions linked to a selected policy are candidates.
    pub require_policy_link: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            strategy: SearchStrategy::Auto,
            exhaustive_limit: 16,
            epsilon: 1e-9,
            max_improvement_rounds: 256,
            require_policy_link: true,
        }
    }
}

impl OptimizerConfig {
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_exhaustive_limit(mut self, n: usize) -> Self {
        self.exhaustive_limit = n;
        self
    }

    pub fn with_epsilon(mut self, eps: f64) -> Self {
        self.epsilon = eps;
        self
    }

    pub fn with_max_improvement_rounds(mut self, n: usize) -> Self {
        self.max_improvement_rounds = n;
        self
    }

    pub fn with_require_policy_link(mut self, require: bool) -> Self {
        self.require_policy_link = require;
        self
    }

    /// Strategy actually used for `candidates` candidates.
    pub fn resolve_strategy(&self, candidates: usize) -> SearchStrategy {
        match self.strategy {
            SearchStrategy::Auto if candidates <= self.exhaustive_limit => {
                SearchStrategy::Exhaustive
            }
            SearchStrategy::Auto => SearchStrategy::Greedy,
            other => other,
        }
    }

    pub fn validate(&self) -> WefeResult<()> {
        if self.exhaustive_limit > MAX_EXHAUSTIVE_LIMIT {
            return Err(WefeError::InvalidConfig(format!(
                "exhaustive_limit must be at most {MAX_EXHAUSTIVE_LIMIT}, got {}",
                self.exhaustive_limit
            )));
        }
        if self.max_improvement_rounds == 0 {
            return Err(WefeError::InvalidConfig(
                "max_improvement_rounds must be at least 1".to_string(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(WefeError::InvalidConfig(format!(
                "epsilon must be finite and non-negative, got {}",
                self.epsilon
            )));
        }
        Ok(())
    }
}
