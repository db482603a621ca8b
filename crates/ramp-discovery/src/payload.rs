//! Request and response bodies for the generative endpoint, and validation of
//! the points it returns.

use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::IntoEnumIterator as _;

use ramp_core::{
  discovery::DiscoveryError,
  point::{AccessibilityPoint, LocationKey, PointId, PointKind, Position},
};

// ─── Request ─────────────────────────────────────────────────────────────────

/// The instruction sent for `location`.
pub fn prompt(location: &LocationKey) -> String {
  format!(
    "List accessibility points in the city of {location}. Include ramps, \
     elevators, accessible restrooms, accessible parking spaces and \
     entrances. Give the name, address, type, description and geographic \
     coordinates (latitude and longitude) of each point."
  )
}

/// The JSON schema the model's output is constrained to.
pub fn response_schema() -> Value {
  let kinds: Vec<String> = PointKind::iter().map(|k| k.to_string()).collect();
  json!({
    "type": "ARRAY",
    "items": {
      "type": "OBJECT",
      "properties": {
        "id":          { "type": "STRING", "description": "Unique identifier for the point (may be a hash of name and address)." },
        "name":        { "type": "STRING", "description": "Name of the place or accessibility point." },
        "address":     { "type": "STRING", "description": "Full street address." },
        "type":        { "type": "STRING", "enum": kinds, "description": "Kind of accessibility point." },
        "description": { "type": "STRING", "description": "Short description of the point." },
        "position": {
          "type": "OBJECT",
          "properties": {
            "lat": { "type": "NUMBER", "description": "Latitude." },
            "lng": { "type": "NUMBER", "description": "Longitude." }
          },
          "required": ["lat", "lng"]
        }
      },
      "required": ["id", "name", "address", "type", "description", "position"]
    }
  })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  contents:          Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
  response_mime_type: &'static str,
  response_schema:    Value,
}

impl GenerateRequest {
  pub fn for_location(location: &LocationKey) -> Self {
    Self {
      contents:          vec![Content {
        parts: vec![Part { text: Some(prompt(location)) }],
      }],
      generation_config: GenerationConfig {
        response_mime_type: "application/json",
        response_schema:    response_schema(),
      },
    }
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
  #[serde(default)]
  pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
  #[serde(default)]
  pub content: Option<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
  #[serde(default)]
  pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub text: Option<String>,
}

impl GenerateResponse {
  /// The text of the first candidate, with its parts concatenated.
  pub fn text(&self) -> Result<String, DiscoveryError> {
    let candidate = self
      .candidates
      .first()
      .ok_or_else(|| DiscoveryError::Schema("response contained no candidates".into()))?;
    Ok(
      candidate
        .content
        .iter()
        .flat_map(|c| &c.parts)
        .filter_map(|p| p.text.as_deref())
        .collect(),
    )
  }
}

// ─── Points ──────────────────────────────────────────────────────────────────

/// One item as the model emits it. Every field is required.
#[derive(Debug, Deserialize)]
struct WirePoint {
  id:          String,
  name:        String,
  address:     String,
  #[serde(rename = "type")]
  kind:        String,
  description: String,
  position:    WirePosition,
}

#[derive(Debug, Deserialize)]
struct WirePosition {
  lat: f64,
  lng: f64,
}

/// Parse and validate the model's JSON text.
///
/// Blank text is an empty result. Anything that is not an array of complete,
/// well-formed points is a [`DiscoveryError::Schema`].
pub fn parse_points(text: &str) -> Result<Vec<AccessibilityPoint>, DiscoveryError> {
  let text = text.trim();
  if text.is_empty() {
    return Ok(Vec::new());
  }

  let items: Vec<WirePoint> = serde_json::from_str(text)
    .map_err(|e| DiscoveryError::Schema(format!("malformed point list: {e}")))?;

  items
    .into_iter()
    .enumerate()
    .map(|(i, item)| validate(item).map_err(|msg| DiscoveryError::Schema(format!("item {i}: {msg}"))))
    .collect()
}

fn validate(item: WirePoint) -> Result<AccessibilityPoint, String> {
  let id = PointId::new(item.id.trim()).map_err(|e| e.to_string())?;
  if item.name.trim().is_empty() {
    return Err("name is empty".into());
  }
  let kind = PointKind::from_str(item.kind.trim())
    .map_err(|_| format!("unknown point type {:?}", item.kind))?;
  let position =
    Position::new(item.position.lat, item.position.lng).map_err(|e| e.to_string())?;

  Ok(AccessibilityPoint {
    id,
    name: item.name,
    address: item.address,
    kind,
    description: item.description,
    position,
    creator_id: None,
    custom_icon: None,
    ratings: Vec::new(),
  })
}
