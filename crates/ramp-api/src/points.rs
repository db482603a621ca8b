//! Handlers for `/points` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/points` | Seed merged with every overlay partition; no discovery |
//! | `GET`  | `/points/{id}` | 404 if unknown |
//! | `PUT`  | `/points/{id}/name` | Body: `{"name":"…","location":"…"}` |
//! | `PUT`  | `/points/{id}/icon` | Body: `{"icon":"data:…","location":"…"}` |
//! | `PUT`  | `/points/{id}/rating` | Body: `{"value":4,"location":"…"}` |
//!
//! `location` is the caller's current search and only matters for points not
//! yet stored in the overlay.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use ramp_core::{
  discovery::Discovery,
  overlay::OverlayStore,
  point::{IconRef, LocationKey, PointId},
  repository::PointRepository,
};
use serde::Deserialize;

use crate::{actor::MaybeActor, error::ApiError, view::PointView};

type Repo<S, D> = Arc<PointRepository<S, D>>;

// ─── Reads ───────────────────────────────────────────────────────────────────

/// `GET /points`
pub async fn list<S, D>(
  State(repo): State<Repo<S, D>>,
  actor: MaybeActor,
) -> Result<Json<Vec<PointView>>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let points = repo.list_initial().await?;
  let actor_id = actor.actor().map(|a| &a.id);
  Ok(Json(PointView::many(points, actor_id)))
}

/// `GET /points/{id}`
pub async fn get_one<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(id): Path<PointId>,
  actor: MaybeActor,
) -> Result<Json<PointView>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let point = repo
    .get(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("point {id} not found")))?;
  Ok(Json(PointView::new(point, actor.actor().map(|a| &a.id))))
}

// ─── Rename ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub name:     String,
  pub location: LocationKey,
}

/// `PUT /points/{id}/name`
pub async fn rename<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(id): Path<PointId>,
  actor: MaybeActor,
  Json(body): Json<RenameBody>,
) -> Result<Json<PointView>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let point = repo
    .rename(&id, &body.name, actor.actor(), &body.location)
    .await?;
  Ok(Json(PointView::new(point, actor.actor().map(|a| &a.id))))
}

// ─── Icon ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IconBody {
  pub icon:     IconRef,
  pub location: LocationKey,
}

/// `PUT /points/{id}/icon`
pub async fn set_icon<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(id): Path<PointId>,
  actor: MaybeActor,
  Json(body): Json<IconBody>,
) -> Result<Json<PointView>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let point = repo
    .set_icon(&id, body.icon, actor.actor(), &body.location)
    .await?;
  Ok(Json(PointView::new(point, actor.actor().map(|a| &a.id))))
}

// ─── Rate ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RateBody {
  /// Checked by the repository so out-of-range values map to 400 with a
  /// useful message.
  pub value:    i64,
  pub location: LocationKey,
}

/// `PUT /points/{id}/rating`
pub async fn rate<S, D>(
  State(repo): State<Repo<S, D>>,
  Path(id): Path<PointId>,
  actor: MaybeActor,
  Json(body): Json<RateBody>,
) -> Result<Json<PointView>, ApiError>
where
  S: OverlayStore + 'static,
  D: Discovery + 'static,
{
  let point = repo
    .rate(&id, actor.actor(), body.value, &body.location)
    .await?;
  Ok(Json(PointView::new(point, actor.actor().map(|a| &a.id))))
}
