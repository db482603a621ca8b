//! The `OverlayStore` trait: persistent, per-location user contributions.
//!
//! The overlay is partitioned by [`LocationKey`]. A point id lives in at most
//! one partition at a time; [`OverlayStore::upsert`] never duplicates a point
//! across partitions.

use std::future::Future;

use crate::point::{AccessibilityPoint, LocationKey, PointId};

/// A point together with the partition that currently holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Filed {
  pub location: LocationKey,
  pub point:    AccessibilityPoint,
}

/// Abstraction over a durable overlay backend.
///
/// Every call is atomic with respect to every other call: no caller observes
/// a half-written partition map.
pub trait OverlayStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All points filed under exactly `location`, in insertion order.
  fn get_by_location(
    &self,
    location: LocationKey,
  ) -> impl Future<Output = Result<Vec<AccessibilityPoint>, Self::Error>> + Send + '_;

  /// Locate a point by id across every partition.
  fn find_by_id(
    &self,
    id: PointId,
  ) -> impl Future<Output = Result<Option<Filed>, Self::Error>> + Send + '_;

  /// Replace the point in whichever partition already holds its id, or insert
  /// it under `location` if no partition does. Returns the partition written.
  fn upsert(
    &self,
    location: LocationKey,
    point: AccessibilityPoint,
  ) -> impl Future<Output = Result<LocationKey, Self::Error>> + Send + '_;

  /// Every overlay point across all partitions, in insertion order.
  fn list_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Filed>, Self::Error>> + Send + '_;
}
