//! HTTP discovery clients.

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use ramp_core::{
  discovery::{Discovery, DiscoveryError},
  point::{AccessibilityPoint, LocationKey},
};

use crate::{
  config::DiscoveryConfig,
  payload::{GenerateRequest, GenerateResponse, parse_points},
};

// ─── Generative client ───────────────────────────────────────────────────────

/// Asks a generative-content endpoint for points near a location.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GenerativeDiscovery {
  client:   Client,
  api_key:  String,
  model:    String,
  endpoint: String,
}

impl GenerativeDiscovery {
  pub fn new(api_key: impl Into<String>, config: &DiscoveryConfig) -> reqwest::Result<Self> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    Ok(Self {
      client,
      api_key: api_key.into(),
      model: config.model.clone(),
      endpoint: config.endpoint.clone(),
    })
  }

  fn url(&self) -> String {
    format!(
      "{}/v1beta/models/{}:generateContent",
      self.endpoint.trim_end_matches('/'),
      self.model
    )
  }
}

impl Discovery for GenerativeDiscovery {
  async fn discover(
    &self,
    location: LocationKey,
  ) -> Result<Vec<AccessibilityPoint>, DiscoveryError> {
    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.api_key)
      .json(&GenerateRequest::for_location(&location))
      .send()
      .await
      .map_err(|e| DiscoveryError::Transport(e.to_string()))?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      warn!(%location, %status, "discovery request rejected");
      return Err(classify_failure(status, &body));
    }

    let body: GenerateResponse = resp
      .json()
      .await
      .map_err(|e| DiscoveryError::Schema(format!("unreadable response envelope: {e}")))?;
    let points = parse_points(&body.text()?)?;
    debug!(%location, count = points.len(), model = %self.model, "discovery response parsed");
    Ok(points)
  }
}

/// Map a non-success status onto the failure taxonomy.
fn classify_failure(status: StatusCode, body: &str) -> DiscoveryError {
  let detail = format!("{status}: {}", body.chars().take(200).collect::<String>());
  match status {
    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DiscoveryError::Auth(detail),
    StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => DiscoveryError::Auth(detail),
    _ => DiscoveryError::Transport(detail),
  }
}

// ─── Disabled client ─────────────────────────────────────────────────────────

/// Stands in when no API key is configured. Every call fails with
/// [`DiscoveryError::Auth`], so listings fall back to overlay data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDiscovery;

impl Discovery for DisabledDiscovery {
  async fn discover(
    &self,
    _location: LocationKey,
  ) -> Result<Vec<AccessibilityPoint>, DiscoveryError> {
    Err(DiscoveryError::Auth("no discovery API key configured".into()))
  }
}

// ─── Selection ───────────────────────────────────────────────────────────────

/// The discovery source chosen from configuration.
#[derive(Clone)]
pub enum ConfiguredDiscovery {
  Generative(GenerativeDiscovery),
  Disabled(DisabledDiscovery),
}

impl ConfiguredDiscovery {
  pub fn from_config(config: &DiscoveryConfig) -> reqwest::Result<Self> {
    match config.api_key() {
      Some(key) => Ok(Self::Generative(GenerativeDiscovery::new(key, config)?)),
      None => Ok(Self::Disabled(DisabledDiscovery)),
    }
  }

  pub fn is_enabled(&self) -> bool { matches!(self, Self::Generative(_)) }
}

impl Discovery for ConfiguredDiscovery {
  async fn discover(
    &self,
    location: LocationKey,
  ) -> Result<Vec<AccessibilityPoint>, DiscoveryError> {
    match self {
      Self::Generative(client) => client.discover(location).await,
      Self::Disabled(client) => client.discover(location).await,
    }
  }
}
