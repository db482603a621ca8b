//! Error types for `ramp-core`.

use thiserror::Error;

use crate::{
  discovery::DiscoveryError,
  point::{ActorId, LocationKey, PointId},
};

#[derive(Debug, Error)]
pub enum Error {
  /// Remote discovery failed; callers may retry or fall back to overlay data.
  #[error("discovery failed: {0}")]
  Discovery(#[from] DiscoveryError),

  /// Discovery failed and the overlay holds nothing for the location either.
  #[error("no points available for {location:?}: {source}")]
  DiscoveryUnavailable {
    location: LocationKey,
    #[source]
    source:   DiscoveryError,
  },

  #[error("point not found: {0}")]
  NotFound(PointId),

  #[error("actor {actor} may not modify point {point}")]
  Forbidden { point: PointId, actor: ActorId },

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("an authenticated actor is required")]
  Unauthorized,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
