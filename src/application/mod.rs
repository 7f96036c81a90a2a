/// Application Layer - Health Services
///
/// This layer orchestrates the domain contracts into the liveness and
/// readiness workflows. It depends on the domain layer and receives its
/// collaborators (checks, metrics) through constructors.
///
/// ## Modules
/// - `services`: probe registry, probe runner and the health aggregator

pub mod services;

// Re-export key services
pub use services::{HealthService, ProbeRegistry, ProbeRunner};
