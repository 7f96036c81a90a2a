/// Infrastructure Layer - Technical Implementations
///
/// This layer contains all technical implementations that interact with
/// external systems: the database and cache probes, the HTTP surface,
/// metrics and logging.
///
/// The infrastructure layer depends on the domain layer but the domain
/// layer does not depend on infrastructure (dependency inversion).
///
/// ## Modules
/// - `probes`: MySQL and Redis dependency checks
/// - `observability`: HTTP server, middleware, metrics, logging

pub mod observability;
pub mod probes;

// Re-export key types
pub use observability::{AppState, HealthServer, Metrics};
pub use probes::{CacheCheck, DatabaseCheck};
