//! Pure merge functions: tier precedence, ownership preservation and rating
//! updates. Nothing here touches storage, so every rule is testable alone.

use std::collections::HashMap;

use crate::{
  Error, Result,
  point::{AccessibilityPoint, ActorId, PointId, Rating, RatingValue},
};

// ─── Canonical list ──────────────────────────────────────────────────────────

/// An insertion-ordered collection of points keyed by id.
///
/// Layering a point whose id is already present replaces it in its original
/// slot, so the output order depends only on the input set.
#[derive(Debug, Default)]
pub struct CanonicalList {
  points: Vec<AccessibilityPoint>,
  index:  HashMap<PointId, usize>,
}

impl CanonicalList {
  pub fn new() -> Self { Self::default() }

  /// Add `points` with higher precedence than everything already present.
  pub fn layer(&mut self, points: impl IntoIterator<Item = AccessibilityPoint>) {
    for point in points {
      match self.index.get(&point.id) {
        Some(&slot) => self.points[slot] = point,
        None => {
          self.index.insert(point.id.clone(), self.points.len());
          self.points.push(point);
        }
      }
    }
  }

  pub fn len(&self) -> usize { self.points.len() }

  pub fn is_empty(&self) -> bool { self.points.is_empty() }

  pub fn into_points(self) -> Vec<AccessibilityPoint> { self.points }
}

/// Merge the three tiers with precedence seed < discovered < overlay.
pub fn merge_tiers(
  seed: &[AccessibilityPoint],
  discovered: Vec<AccessibilityPoint>,
  overlay: Vec<AccessibilityPoint>,
) -> Vec<AccessibilityPoint> {
  let mut list = CanonicalList::new();
  list.layer(seed.iter().cloned());
  list.layer(discovered);
  list.layer(overlay);
  list.into_points()
}

// ─── Ownership ───────────────────────────────────────────────────────────────

/// Fails with [`Error::Forbidden`] if the point is owned by someone else.
pub fn ensure_can_modify(point: &AccessibilityPoint, actor: &ActorId) -> Result<()> {
  match &point.creator_id {
    Some(owner) if owner != actor => Err(Error::Forbidden {
      point: point.id.clone(),
      actor: actor.clone(),
    }),
    _ => Ok(()),
  }
}

/// Resolve the record to store when `actor` proposes `proposed` as the new
/// state of `existing`.
///
/// The id and position of an existing record are kept. `creator_id` is taken
/// from the existing record if set, else from the proposal, else `actor`
/// acquires ownership.
pub fn apply_update(
  existing: Option<&AccessibilityPoint>,
  proposed: AccessibilityPoint,
  actor: &ActorId,
) -> AccessibilityPoint {
  let mut merged = proposed;
  if let Some(existing) = existing {
    merged.id = existing.id.clone();
    merged.position = existing.position;
    merged.creator_id = existing.creator_id.clone().or(merged.creator_id);
  }
  if merged.creator_id.is_none() {
    merged.creator_id = Some(actor.clone());
  }
  merged
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

/// Record `actor`'s rating, replacing their previous one in place or
/// appending. `creator_id` is untouched.
pub fn with_rating(
  mut point: AccessibilityPoint,
  actor: &ActorId,
  value: RatingValue,
) -> AccessibilityPoint {
  match point.ratings.iter_mut().find(|r| &r.user_id == actor) {
    Some(existing) => existing.value = value,
    None => point.ratings.push(Rating { user_id: actor.clone(), value }),
  }
  point
}
