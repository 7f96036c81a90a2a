/// Shared utilities and types used across all layers
///
/// This module contains:
/// - Request correlation context
/// - Error types
/// - Utilities (timestamp)

pub mod context;
pub mod error;
pub mod timestamp;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use context::RequestContext;
pub use error::{ApiError, RegistryError, ServerError};
pub use timestamp::iso8601_now;
