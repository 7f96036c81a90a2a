/// Application Services
///
/// - `registry`: the fixed set of probes built at startup
/// - `probe_runner`: runs one probe with timing, timeout and metrics
/// - `health_service`: aggregates all probes into a readiness verdict

pub mod health_service;
pub mod probe_runner;
pub mod registry;

pub use health_service::HealthService;
pub use probe_runner::ProbeRunner;
pub use registry::ProbeRegistry;
