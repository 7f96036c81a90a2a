/// Domain Layer - Health Model
///
/// Pure types describing dependency checks and the reports built from them.
/// No I/O and no framework types live here; the HTTP status decision is
/// expressed as a plain number so the layer stays framework independent.
///
/// ## Modules
/// - `health`: ProbeStatus, ProbeResult and the liveness/readiness reports
/// - `probe`: the `DependencyCheck` contract and its error type

pub mod health;
pub mod probe;

// Re-export key types
pub use health::{
    CheckResults, LivenessReport, ProbeResult, ProbeStatus, ReadinessReport, ReadinessStatus,
};
pub use probe::{DependencyCheck, ProbeError};
