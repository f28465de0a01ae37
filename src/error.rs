//! Error types for the WEFE scoring and selection engine.

use thiserror::Error;

/// Errors reported by every fallible operation in the crate.
///
/// None of these are transient: the engine performs no I/O, so a failed call
/// fails the same way on every retry with the same inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WefeError {
    /// Degenerate bounds, a non-finite value, or a raw value outside
    /// `[min, max]` where one is not allowed.
    #[error("indicator `{indicator}` out of domain: {reason}")]
    OutOfDomain { indicator: String, reason: String },

    #[error("unknown indicator `{0}`")]
    UnknownIndicator(String),

    #[error("unknown policy `{0}`")]
    UnknownPolicy(String),

    #[error("unknown intervention `{0}`")]
    UnknownIntervention(String),

    /// The policy or intervention is already part of the selection.
    #[error("`{0}` is already selected")]
    DuplicateSelection(String),

    /// The id exists in the catalog but is not part of the current selection.
    #[error("`{0}` is not selected")]
    NotSelected(String),

    #[error("policy `{policy}` requires `{prerequisite}` to be selected first")]
    MissingPrerequisite {
        policy: String,
        prerequisite: String,
    },

    #[error("policy `{policy}` is required by selected policy `{dependent}`")]
    PrerequisiteInUse { policy: String, dependent: String },

    #[error("budget exceeded: requires {required}, available {available}")]
    BudgetExceeded { required: f64, available: f64 },

    #[error("time horizon exceeded: requires {required}, available {available}")]
    TimeExceeded { required: f64, available: f64 },

    /// Structural problem found while assembling a catalog.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WefeError {
    pub(crate) fn out_of_domain(indicator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::OutOfDomain {
            indicator: indicator.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type WefeResult<T> = Result<T, WefeError>;
