/// Dependency Probe Contract
///
/// A probe performs one minimal round trip against an external dependency.
/// Implementations only report what happened; timing, timeouts, panic
/// isolation and metrics are handled by the probe runner in the
/// application layer.
///
/// ## Usage
/// ```rust,ignore
/// struct AlwaysUp;
///
/// #[async_trait]
/// impl DependencyCheck for AlwaysUp {
///     fn name(&self) -> &str { "always-up" }
///     async fn check(&self) -> Result<String, ProbeError> {
///         Ok("reachable".to_string())
///     }
/// }
/// ```

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single dependency check
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The round trip failed; the message already names the dependency
    #[error("{0}")]
    Failed(String),

    /// The check did not finish within the configured timeout
    #[error("timeout")]
    Timeout,

    /// The check panicked
    #[error("probe panicked: {0}")]
    Panicked(String),
}

impl ProbeError {
    pub fn failed(message: impl Into<String>) -> Self {
        ProbeError::Failed(message.into())
    }
}

/// A named check against one external dependency
#[async_trait]
pub trait DependencyCheck: Send + Sync {
    /// Unique key used in the readiness body and as the metric label
    fn name(&self) -> &str;

    /// Performs the round trip.
    ///
    /// Returns a human-readable success message, or the failure cause.
    async fn check(&self) -> Result<String, ProbeError>;
}
