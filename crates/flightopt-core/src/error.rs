//! Error types for corridor routing and wind providers.

use thiserror::Error;

/// Failures surfaced to callers of the optimizer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    /// Rejected before any corridor or graph work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The search could not reach the goal in a graph that should always connect it.
    #[error("graph invariant violated: {0}")]
    GraphInvariantViolated(String),
}

impl RouteError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, RouteError>;

/// Why a wind provider could not produce an observation.
///
/// The wind model never lets these escape; they are logged and replaced by calm wind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindProviderError {
    #[error("wind provider timed out")]
    Timeout,
    #[error("wind provider transport error: {0}")]
    Transport(String),
    #[error("wind provider returned HTTP {0}")]
    Status(u16),
    #[error("malformed wind payload: {0}")]
    Malformed(String),
    #[error("wind payload missing field `{0}`")]
    MissingField(&'static str),
}
