//! Accessibility points: the single record type every source produces.
//!
//! Points arrive from three places (the seed set, the location overlay and
//! remote discovery) but share one shape. The wire form uses camelCase keys
//! and calls the kind `type`, matching what map clients already exchange.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Opaque, stable identifier of a point; the primary key across all sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PointId(String);

impl PointId {
  pub fn new(id: impl Into<String>) -> Result<Self> {
    let id = id.into();
    if id.trim().is_empty() {
      return Err(Error::InvalidArgument("point id must not be empty".into()));
    }
    Ok(Self(id))
  }

  /// Allocate a fresh identifier for a user-created point.
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub(crate) fn from_static(id: &'static str) -> Self { Self(id.to_owned()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for PointId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl From<PointId> for String {
  fn from(id: PointId) -> Self { id.0 }
}

impl fmt::Display for PointId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ActorId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// The user on whose behalf a mutation is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
  pub id:           ActorId,
  pub display_name: String,
}

impl Actor {
  pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self { id: ActorId::new(id), display_name: display_name.into() }
  }
}

/// Free-text search string that names an overlay partition.
///
/// Matching is exact: `"Campinas"` and `"campinas"` are different partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationKey(String);

impl LocationKey {
  pub fn new(key: impl Into<String>) -> Result<Self> {
    let key = key.into();
    if key.trim().is_empty() {
      return Err(Error::InvalidArgument("location must not be empty".into()));
    }
    Ok(Self(key))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl TryFrom<String> for LocationKey {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl From<LocationKey> for String {
  fn from(key: LocationKey) -> Self { key.0 }
}

impl fmt::Display for LocationKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The physical feature a point describes.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PointKind {
  Ramp,
  Elevator,
  Restroom,
  Parking,
  Entrance,
  #[default]
  Unknown,
}

impl PointKind {
  /// Human-readable label for lists and screen readers.
  pub fn label(self) -> &'static str {
    match self {
      Self::Ramp => "Access ramp",
      Self::Elevator => "Elevator",
      Self::Restroom => "Accessible restroom",
      Self::Parking => "Accessible parking",
      Self::Entrance => "Accessible entrance",
      Self::Unknown => "Other",
    }
  }
}

// ─── Position ────────────────────────────────────────────────────────────────

/// A WGS84 coordinate. Immutable once a point exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub lat: f64,
  pub lng: f64,
}

impl Position {
  pub fn new(lat: f64, lng: f64) -> Result<Self> {
    let position = Self { lat, lng };
    position.validate()?;
    Ok(position)
  }

  pub fn validate(&self) -> Result<()> {
    if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
      return Err(Error::InvalidArgument(format!(
        "latitude {} is outside [-90, 90]",
        self.lat
      )));
    }
    if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
      return Err(Error::InvalidArgument(format!(
        "longitude {} is outside [-180, 180]",
        self.lng
      )));
    }
    Ok(())
  }
}

// ─── Icon ────────────────────────────────────────────────────────────────────

/// Opaque reference to a custom marker image (typically a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconRef(String);

impl IconRef {
  pub fn new(payload: impl Into<String>) -> Result<Self> {
    let payload = payload.into();
    if payload.trim().is_empty() {
      return Err(Error::InvalidArgument("icon payload must not be empty".into()));
    }
    Ok(Self(payload))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

/// A star rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RatingValue(u8);

impl RatingValue {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn get(self) -> u8 { self.0 }
}

impl TryFrom<i64> for RatingValue {
  type Error = Error;

  fn try_from(value: i64) -> Result<Self> {
    if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
      // Range-checked above.
      Ok(Self(value as u8))
    } else {
      Err(Error::InvalidArgument(format!(
        "rating {value} is outside [{}, {}]",
        Self::MIN,
        Self::MAX
      )))
    }
  }
}

impl From<RatingValue> for i64 {
  fn from(value: RatingValue) -> Self { i64::from(value.0) }
}

/// One user's rating of a point. A point holds at most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
  pub user_id: ActorId,
  pub value:   RatingValue,
}

/// Aggregate rating figures as shown next to a point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
  pub average: Option<f64>,
  pub count:   usize,
  /// The requesting actor's own rating, if any.
  pub own:     Option<RatingValue>,
}

// ─── AccessibilityPoint ──────────────────────────────────────────────────────

/// A single physical accessibility feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityPoint {
  pub id:          PointId,
  pub name:        String,
  pub address:     String,
  #[serde(rename = "type")]
  pub kind:        PointKind,
  pub description: String,
  pub position:    Position,
  /// The user who created the point or first edited it. Never overwritten.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub creator_id:  Option<ActorId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_icon: Option<IconRef>,
  #[serde(default)]
  pub ratings:     Vec<Rating>,
}

impl AccessibilityPoint {
  pub fn rating_by(&self, actor: &ActorId) -> Option<RatingValue> {
    self
      .ratings
      .iter()
      .find(|r| &r.user_id == actor)
      .map(|r| r.value)
  }

  pub fn rating_summary(&self, actor: Option<&ActorId>) -> RatingSummary {
    let count = self.ratings.len();
    let average = (count > 0).then(|| {
      let total: u32 = self.ratings.iter().map(|r| u32::from(r.value.get())).sum();
      f64::from(total) / count as f64
    });
    RatingSummary {
      average,
      count,
      own: actor.and_then(|a| self.rating_by(a)),
    }
  }
}

// ─── Permissions ─────────────────────────────────────────────────────────────

/// What an actor may do with a point.
///
/// `can_modify` is enforced by the repository. `can_rate` is advisory: the
/// repository accepts self-ratings and leaves the choice to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
  pub can_modify: bool,
  pub can_rate:   bool,
}

impl Permissions {
  pub fn for_actor(point: &AccessibilityPoint, actor: Option<&ActorId>) -> Self {
    let Some(actor) = actor else {
      return Self { can_modify: false, can_rate: false };
    };
    let owned_by_other = point.creator_id.as_ref().is_some_and(|c| c != actor);
    let owned_by_self = point.creator_id.as_ref() == Some(actor);
    Self { can_modify: !owned_by_other, can_rate: !owned_by_self }
  }
}

// ─── PointDraft ──────────────────────────────────────────────────────────────

/// Input to [`crate::repository::PointRepository::create`].
///
/// `id`, `address`, `position` and `creator_id` are assigned by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointDraft {
  pub name:        String,
  #[serde(rename = "type", default)]
  pub kind:        PointKind,
  pub description: String,
  #[serde(default)]
  pub custom_icon: Option<IconRef>,
}

impl PointDraft {
  pub fn new(
    name: impl Into<String>,
    kind: PointKind,
    description: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      kind,
      description: description.into(),
      custom_icon: None,
    }
  }

  /// Reject drafts whose required text fields are blank.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::InvalidArgument("name must not be empty".into()));
    }
    if self.description.trim().is_empty() {
      return Err(Error::InvalidArgument("description must not be empty".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  fn point() -> AccessibilityPoint {
    AccessibilityPoint {
      id:          PointId::new("p-1").unwrap(),
      name:        "Ramp".into(),
      address:     "Somewhere".into(),
      kind:        PointKind::Ramp,
      description: "A ramp".into(),
      position:    Position::new(-22.9, -47.06).unwrap(),
      creator_id:  None,
      custom_icon: None,
      ratings:     vec![],
    }
  }

  #[test]
  fn rating_value_bounds() {
    assert!(RatingValue::try_from(0).is_err());
    assert!(RatingValue::try_from(6).is_err());
    assert_eq!(RatingValue::try_from(1).unwrap().get(), 1);
    assert_eq!(RatingValue::try_from(5).unwrap().get(), 5);
  }

  #[test]
  fn kind_parses_case_insensitively() {
    assert_eq!(PointKind::from_str("elevator").unwrap(), PointKind::Elevator);
    assert_eq!(PointKind::from_str("RESTROOM").unwrap(), PointKind::Restroom);
    assert!(PointKind::from_str("staircase").is_err());
    assert_eq!(PointKind::Parking.to_string(), "PARKING");
  }

  #[test]
  fn wire_format_uses_type_and_camel_case() {
    let mut p = point();
    p.creator_id = Some(ActorId::new("u-1"));
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(json["type"], "RAMP");
    assert_eq!(json["creatorId"], "u-1");
    assert!(json.get("customIcon").is_none());

    let back: AccessibilityPoint = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
  }

  #[test]
  fn out_of_range_rating_rejected_on_deserialise() {
    let mut json = serde_json::to_value(point()).unwrap();
    json["ratings"] = serde_json::json!([{ "userId": "u", "value": 9 }]);
    assert!(serde_json::from_value::<AccessibilityPoint>(json).is_err());
  }

  #[test]
  fn position_rejects_out_of_range() {
    assert!(Position::new(91.0, 0.0).is_err());
    assert!(Position::new(0.0, -181.0).is_err());
    assert!(Position::new(f64::NAN, 0.0).is_err());
  }

  #[test]
  fn rating_summary_averages() {
    let mut p = point();
    p.ratings = vec![
      Rating { user_id: ActorId::new("a"), value: RatingValue::try_from(4).unwrap() },
      Rating { user_id: ActorId::new("b"), value: RatingValue::try_from(5).unwrap() },
    ];
    let summary = p.rating_summary(Some(&ActorId::new("b")));
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average, Some(4.5));
    assert_eq!(summary.own.map(RatingValue::get), Some(5));

    let empty = point().rating_summary(None);
    assert_eq!(empty.average, None);
    assert_eq!(empty.own, None);
  }

  #[test]
  fn permissions_follow_ownership() {
    let alice = ActorId::new("alice");
    let bob = ActorId::new("bob");

    let unowned = point();
    assert_eq!(
      Permissions::for_actor(&unowned, Some(&alice)),
      Permissions { can_modify: true, can_rate: true }
    );

    let mut owned = point();
    owned.creator_id = Some(alice.clone());
    assert_eq!(
      Permissions::for_actor(&owned, Some(&alice)),
      Permissions { can_modify: true, can_rate: false }
    );
    assert_eq!(
      Permissions::for_actor(&owned, Some(&bob)),
      Permissions { can_modify: false, can_rate: true }
    );
    assert_eq!(
      Permissions::for_actor(&owned, None),
      Permissions { can_modify: false, can_rate: false }
    );
  }

  #[test]
  fn draft_requires_text() {
    assert!(PointDraft::new("", PointKind::Ramp, "desc").validate().is_err());
    assert!(PointDraft::new("Name", PointKind::Ramp, "  ").validate().is_err());
    assert!(PointDraft::new("Name", PointKind::Ramp, "desc").validate().is_ok());
  }
}
