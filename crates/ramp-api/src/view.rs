//! Response bodies.

use ramp_core::{
  point::{AccessibilityPoint, ActorId, LocationKey, Permissions, RatingSummary},
  repository::{Listing, ListingSource},
};
use serde::Serialize;

/// A point as seen by one caller: the stored record plus what that caller
/// may do with it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointView {
  #[serde(flatten)]
  pub point:          AccessibilityPoint,
  pub permissions:    Permissions,
  pub rating_summary: RatingSummary,
}

impl PointView {
  pub fn new(point: AccessibilityPoint, actor: Option<&ActorId>) -> Self {
    Self {
      permissions: Permissions::for_actor(&point, actor),
      rating_summary: point.rating_summary(actor),
      point,
    }
  }

  pub fn many(points: Vec<AccessibilityPoint>, actor: Option<&ActorId>) -> Vec<Self> {
    points.into_iter().map(|p| Self::new(p, actor)).collect()
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceView {
  Merged,
  OverlayFallback,
}

/// `GET /locations/{location}/points` body.
#[derive(Debug, Serialize)]
pub struct ListingView {
  pub location: LocationKey,
  pub source:   SourceView,
  /// Why discovery was skipped, when serving overlay points only.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub warning:  Option<String>,
  pub points:   Vec<PointView>,
}

impl ListingView {
  pub fn new(listing: Listing, actor: Option<&ActorId>) -> Self {
    let (source, warning) = match listing.source {
      ListingSource::Merged => (SourceView::Merged, None),
      ListingSource::OverlayFallback { cause } => {
        (SourceView::OverlayFallback, Some(cause.to_string()))
      }
    };
    Self {
      location: listing.location,
      source,
      warning,
      points: PointView::many(listing.points, actor),
    }
  }
}
