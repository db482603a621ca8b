//! Connection settings for the generative discovery endpoint.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Discovery settings as they appear under `[discovery]` in the server
/// configuration. Without an `api_key` discovery is disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
  #[serde(default)]
  pub api_key:      Option<String>,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_endpoint")]
  pub endpoint:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl DiscoveryConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }

  /// The configured key, ignoring blank values from the environment.
  pub fn api_key(&self) -> Option<&str> {
    self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
  }
}

impl Default for DiscoveryConfig {
  fn default() -> Self {
    Self {
      api_key:      None,
      model:        default_model(),
      endpoint:     default_endpoint(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_model() -> String { DEFAULT_MODEL.to_owned() }

fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_owned() }

fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }
