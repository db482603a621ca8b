//! Handlers for `/locations/{location}/points`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/locations/{location}/points` | Seed + discovery + overlay; 503 if discovery fails with no overlay data |
//! | `POST` | `/locations/{location}/points` | Body: [`CreateBody`]; returns 201 + stored point |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use ramp_core::{
  discovery::Discovery,
  overlay::OverlayStore,
  point::{LocationKey, PointDraft, Position},
  repository::PointRepository,
};
use serde::Deserialize;

use crate::{
  actor::MaybeActor,
  error::ApiError,
  view::{ListingView, PointView},
};

type Repo<S, D> = Arc<PointRepository<S, D>>;

/// `GET /locations/{location}/points`
pub async fn list<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(location): Path<LocationKey>,
  actor: MaybeActor,
) -> Result<Json<ListingView>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let listing = repo.list_for_location(&location).await?;
  Ok(Json(ListingView::new(listing, actor.actor().map(|a| &a.id))))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub draft:    PointDraft,
  pub position: Position,
}

/// `POST /locations/{location}/points`
pub async fn create<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(location): Path<LocationKey>,
  actor: MaybeActor,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let point = repo
    .create(&location, body.draft, body.position, actor.actor())
    .await?;
  let view = PointView::new(point, actor.actor().map(|a| &a.id));
  Ok((StatusCode::CREATED, Json(view)))
}
