//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Points are stored as their JSON wire form; timestamps as RFC 3339 strings.

use chrono::{DateTime, Utc};
use ramp_core::{
  overlay::Filed,
  point::{AccessibilityPoint, LocationKey},
};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_point(point: &AccessibilityPoint) -> Result<String> {
  Ok(serde_json::to_string(point)?)
}

pub fn decode_point(point_id: &str, json: &str) -> Result<AccessibilityPoint> {
  let point: AccessibilityPoint = serde_json::from_str(json)?;
  if point.id.as_str() != point_id {
    return Err(Error::CorruptRow(point_id.to_owned()));
  }
  Ok(point)
}

pub fn decode_location(s: String) -> Result<LocationKey> { Ok(LocationKey::new(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `overlay_points` row.
pub struct RawFiled {
  pub point_id:     String,
  pub location_key: String,
  pub point_json:   String,
}

impl RawFiled {
  pub fn into_filed(self) -> Result<Filed> {
    Ok(Filed {
      point:    decode_point(&self.point_id, &self.point_json)?,
      location: decode_location(self.location_key)?,
    })
  }

  pub fn into_point(self) -> Result<AccessibilityPoint> {
    decode_point(&self.point_id, &self.point_json)
  }
}
