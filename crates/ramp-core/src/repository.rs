//! [`PointRepository`]: the merge and mutation engine.
//!
//! Reads compose the seed set, the latest discovery response and the overlay
//! into one canonical list per location. Writes always land in the overlay
//! store; seed and discovery-only points are materialised there on first
//! mutation and shadow their source from then on.

use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  discovery::{Discovery, DiscoveryError},
  merge::{CanonicalList, apply_update, ensure_can_modify, merge_tiers, with_rating},
  overlay::{Filed, OverlayStore},
  point::{
    AccessibilityPoint, Actor, IconRef, LocationKey, PointDraft, PointId, Position,
    RatingValue,
  },
  seed::SeedSet,
};

/// Address stored on user-created points; there is no geocoding.
pub const USER_ADDED_ADDRESS: &str = "Added by user";

/// How many locations' discovery responses are remembered by default.
pub const DISCOVERY_CACHE_LOCATIONS: NonZeroUsize = NonZeroUsize::new(32).unwrap();

// ─── Listing ─────────────────────────────────────────────────────────────────

/// Where the points of a [`Listing`] came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingSource {
  /// Seed, discovery and overlay merged normally.
  Merged,
  /// Discovery failed; only the location's overlay points are returned.
  OverlayFallback { cause: DiscoveryError },
}

/// The canonical point list for one location query.
#[derive(Debug, Clone)]
pub struct Listing {
  pub location: LocationKey,
  pub points:   Vec<AccessibilityPoint>,
  pub source:   ListingSource,
}

impl Listing {
  pub fn is_fallback(&self) -> bool {
    matches!(self.source, ListingSource::OverlayFallback { .. })
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// A point together with the overlay partition holding it, if any.
struct Resolved {
  location: Option<LocationKey>,
  point:    AccessibilityPoint,
}

/// Composes seed, discovery and overlay, and applies mutations.
pub struct PointRepository<S, D> {
  store:      S,
  discovery:  D,
  seed:       SeedSet,
  /// Most recent successful discovery response for the most recently
  /// searched locations.
  discovered: RwLock<LruCache<LocationKey, Vec<AccessibilityPoint>>>,
  /// Serialises read-modify-write cycles against the overlay.
  write_gate: Mutex<()>,
}

impl<S, D> PointRepository<S, D>
where
  S: OverlayStore,
  D: Discovery,
{
  pub fn new(store: S, discovery: D) -> Self {
    Self::with_seed(store, discovery, SeedSet::builtin())
  }

  pub fn with_seed(store: S, discovery: D, seed: SeedSet) -> Self {
    Self {
      store,
      discovery,
      seed,
      discovered: RwLock::new(LruCache::new(DISCOVERY_CACHE_LOCATIONS)),
      write_gate: Mutex::new(()),
    }
  }

  /// Remember discovery responses for at most `locations` locations.
  pub fn with_discovery_cache(mut self, locations: NonZeroUsize) -> Self {
    self.discovered = RwLock::new(LruCache::new(locations));
    self
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn seed(&self) -> &SeedSet { &self.seed }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// The canonical list for `location`.
  ///
  /// If discovery fails, the location's overlay points are returned on their
  /// own; if there are none, the call fails with
  /// [`Error::DiscoveryUnavailable`].
  pub async fn list_for_location(&self, location: &LocationKey) -> Result<Listing> {
    match self.discovery.discover(location.clone()).await {
      Ok(discovered) => {
        debug!(%location, count = discovered.len(), "discovery succeeded");
        self
          .discovered
          .write()
          .await
          .put(location.clone(), discovered.clone());

        let overlay = self.overlay_for(location).await?;
        Ok(Listing {
          location: location.clone(),
          points:   merge_tiers(self.seed.points(), discovered, overlay),
          source:   ListingSource::Merged,
        })
      }
      Err(cause) => {
        let mut list = CanonicalList::new();
        list.layer(self.overlay_for(location).await?);
        if list.is_empty() {
          warn!(%location, error = %cause, "discovery failed with no overlay fallback");
          return Err(Error::DiscoveryUnavailable {
            location: location.clone(),
            source:   cause,
          });
        }

        warn!(
          %location,
          error = %cause,
          fallback = list.len(),
          "discovery failed, serving overlay points"
        );
        Ok(Listing {
          location: location.clone(),
          points:   list.into_points(),
          source:   ListingSource::OverlayFallback { cause },
        })
      }
    }
  }

  /// The startup view: seed points overlaid by every overlay partition.
  /// Discovery is not consulted.
  pub async fn list_initial(&self) -> Result<Vec<AccessibilityPoint>> {
    let filed = self.store.list_all().await.map_err(Error::store)?;
    let mut list = CanonicalList::new();
    list.layer(self.seed.points().iter().cloned());
    list.layer(filed.into_iter().map(|f| f.point));
    Ok(list.into_points())
  }

  /// Look a point up in the overlay, then the seed set, then the cached
  /// discovery responses, most recently searched first.
  pub async fn get(&self, id: &PointId) -> Result<Option<AccessibilityPoint>> {
    Ok(self.resolve(id, None).await?.map(|r| r.point))
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Create a point under `location`, owned by `actor`.
  pub async fn create(
    &self,
    location: &LocationKey,
    draft: PointDraft,
    position: Position,
    actor: Option<&Actor>,
  ) -> Result<AccessibilityPoint> {
    let actor = require_actor(actor)?;
    draft.validate()?;
    position.validate()?;

    let point = AccessibilityPoint {
      id: PointId::generate(),
      name: draft.name.trim().to_owned(),
      address: USER_ADDED_ADDRESS.to_owned(),
      kind: draft.kind,
      description: draft.description,
      position,
      creator_id: Some(actor.id.clone()),
      custom_icon: draft.custom_icon,
      ratings: Vec::new(),
    };

    let _gate = self.write_gate.lock().await;
    let stored_in = self.persist(location.clone(), &point).await?;
    info!(id = %point.id, location = %stored_in, actor = %actor.id, "point created");
    Ok(point)
  }

  /// Rename a point. Renaming to the current name returns it unchanged.
  ///
  /// `location_context` is only used when the point is not yet in the
  /// overlay (seed or discovery-only).
  pub async fn rename(
    &self,
    id: &PointId,
    new_name: &str,
    actor: Option<&Actor>,
    location_context: &LocationKey,
  ) -> Result<AccessibilityPoint> {
    let actor = require_actor(actor)?;
    let new_name = new_name.trim();
    if new_name.is_empty() {
      return Err(Error::InvalidArgument("name must not be empty".into()));
    }

    let _gate = self.write_gate.lock().await;
    let target = self.resolve_existing(id, location_context).await?;
    ensure_can_modify(&target.point, &actor.id)?;
    if target.point.name == new_name {
      debug!(%id, "rename is a no-op");
      return Ok(target.point);
    }

    let mut proposed = target.point.clone();
    proposed.name = new_name.to_owned();
    let updated = apply_update(Some(&target.point), proposed, &actor.id);

    let location = target.location.unwrap_or_else(|| location_context.clone());
    let stored_in = self.persist(location, &updated).await?;
    info!(%id, location = %stored_in, actor = %actor.id, "point renamed");
    Ok(updated)
  }

  /// Replace a point's custom icon. Same ownership rule as [`Self::rename`].
  pub async fn set_icon(
    &self,
    id: &PointId,
    icon: IconRef,
    actor: Option<&Actor>,
    location_context: &LocationKey,
  ) -> Result<AccessibilityPoint> {
    let actor = require_actor(actor)?;

    let _gate = self.write_gate.lock().await;
    let target = self.resolve_existing(id, location_context).await?;
    ensure_can_modify(&target.point, &actor.id)?;

    let mut proposed = target.point.clone();
    proposed.custom_icon = Some(icon);
    let updated = apply_update(Some(&target.point), proposed, &actor.id);

    let location = target.location.unwrap_or_else(|| location_context.clone());
    let stored_in = self.persist(location, &updated).await?;
    info!(%id, location = %stored_in, actor = %actor.id, "point icon updated");
    Ok(updated)
  }

  /// Record `actor`'s rating of a point, replacing any earlier rating by the
  /// same actor. Ownership is neither checked nor changed.
  ///
  /// A point not yet in the overlay is copied into the `location_context`
  /// partition.
  pub async fn rate(
    &self,
    id: &PointId,
    actor: Option<&Actor>,
    value: i64,
    location_context: &LocationKey,
  ) -> Result<AccessibilityPoint> {
    let actor = require_actor(actor)?;
    let value = RatingValue::try_from(value)?;

    let _gate = self.write_gate.lock().await;
    let target = self.resolve_existing(id, location_context).await?;
    let updated = with_rating(target.point, &actor.id, value);

    let location = target.location.unwrap_or_else(|| location_context.clone());
    let stored_in = self.persist(location, &updated).await?;
    info!(
      %id,
      location = %stored_in,
      actor = %actor.id,
      value = value.get(),
      "point rated"
    );
    Ok(updated)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn overlay_for(&self, location: &LocationKey) -> Result<Vec<AccessibilityPoint>> {
    self
      .store
      .get_by_location(location.clone())
      .await
      .map_err(Error::store)
  }

  async fn persist(
    &self,
    location: LocationKey,
    point: &AccessibilityPoint,
  ) -> Result<LocationKey> {
    self
      .store
      .upsert(location, point.clone())
      .await
      .map_err(Error::store)
  }

  /// Overlay first. Otherwise the record the caller saw: the discovery
  /// response for `context`, then the seed set, then the other cached
  /// responses from most to least recently searched.
  async fn resolve(
    &self,
    id: &PointId,
    context: Option<&LocationKey>,
  ) -> Result<Option<Resolved>> {
    if let Some(Filed { location, point }) =
      self.store.find_by_id(id.clone()).await.map_err(Error::store)?
    {
      return Ok(Some(Resolved { location: Some(location), point }));
    }

    let discovered = self.discovered.read().await;
    let find_in =
      |points: &Vec<AccessibilityPoint>| points.iter().find(|p| &p.id == id).cloned();

    let point = context
      .and_then(|loc| discovered.peek(loc))
      .and_then(find_in)
      .or_else(|| self.seed.get(id).cloned())
      .or_else(|| discovered.iter().find_map(|(_, points)| find_in(points)));
    Ok(point.map(|point| Resolved { location: None, point }))
  }

  async fn resolve_existing(
    &self,
    id: &PointId,
    context: &LocationKey,
  ) -> Result<Resolved> {
    self
      .resolve(id, Some(context))
      .await?
      .ok_or_else(|| Error::NotFound(id.clone()))
  }
}

fn require_actor(actor: Option<&Actor>) -> Result<&Actor> {
  actor.ok_or(Error::Unauthorized)
}
