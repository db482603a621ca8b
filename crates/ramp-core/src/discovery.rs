//! The `Discovery` trait, the seam to the remote, fallible point source.

use std::future::Future;

use thiserror::Error;

use crate::point::{AccessibilityPoint, LocationKey};

/// Why a discovery call produced no usable points.
///
/// An empty result is not an error: it is `Ok(vec![])`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryError {
  /// The request never produced a response (network, timeout, 5xx).
  #[error("transport failure: {0}")]
  Transport(String),

  /// The remote source rejected our credentials.
  #[error("authentication failure: {0}")]
  Auth(String),

  /// The response did not conform to the point schema.
  #[error("schema violation: {0}")]
  Schema(String),
}

impl DiscoveryError {
  pub fn is_schema_violation(&self) -> bool { matches!(self, Self::Schema(_)) }
}

/// Abstraction over a remote source of candidate points for a location.
///
/// Implementations must return points with no `creator_id`, and must report
/// malformed payloads as [`DiscoveryError::Schema`] rather than surfacing them.
pub trait Discovery: Send + Sync {
  fn discover(
    &self,
    location: LocationKey,
  ) -> impl Future<Output = Result<Vec<AccessibilityPoint>, DiscoveryError>> + Send + '_;
}
