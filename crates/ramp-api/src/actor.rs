//! Acting-user extraction from request headers.
//!
//! Credential issuance happens upstream; this layer only reads the identity
//! it was handed.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use ramp_core::point::Actor;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_NAME_HEADER: &str = "x-actor-name";

/// The caller's identity, if one was supplied. Anonymous requests are
/// rejected by the repository, not here, so reads still work without it.
pub struct MaybeActor(pub Option<Actor>);

impl MaybeActor {
  pub fn actor(&self) -> Option<&Actor> { self.0.as_ref() }
}

impl<S: Send + Sync> FromRequestParts<S> for MaybeActor {
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    let header = |name: &str| {
      parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    };

    let actor = header(ACTOR_ID_HEADER).map(|id| {
      let name = header(ACTOR_NAME_HEADER).unwrap_or(id);
      Actor::new(id, name)
    });
    Ok(MaybeActor(actor))
  }
}
