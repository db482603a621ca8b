//! JSON REST API for Ramp.
//!
//! Exposes an axum [`Router`] backed by a [`PointRepository`] over any
//! [`OverlayStore`] and [`Discovery`] source. TLS and credential issuance are
//! the caller's responsibility; the acting user arrives in the
//! `x-actor-id` / `x-actor-name` headers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ramp_api::api_router(repo.clone()))
//! ```

pub mod actor;
pub mod error;
pub mod locations;
pub mod points;
pub mod view;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, put},
};
use ramp_core::{discovery::Discovery, overlay::OverlayStore, repository::PointRepository};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build a fully-materialised API router for `repo`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, D>(repo: Arc<PointRepository<S, D>>) -> Router<()>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  Router::new()
    // Points
    .route("/points", get(points::list::<S, D>))
    .route("/points/{id}", get(points::get_one::<S, D>))
    .route("/points/{id}/name", put(points::rename::<S, D>))
    .route("/points/{id}/icon", put(points::set_icon::<S, D>))
    .route("/points/{id}/rating", put(points::rate::<S, D>))
    // Locations
    .route(
      "/locations/{location}/points",
      get(locations::list::<S, D>).post(locations::create::<S, D>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(repo)
}
