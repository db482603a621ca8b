//! Client tests against a throwaway local endpoint.

use axum::{
  Json, Router,
  extract::Path,
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
  routing::post,
};
use serde_json::{Value, json};

use ramp_core::{
  discovery::{Discovery, DiscoveryError},
  point::{LocationKey, PointKind},
};

use crate::{ConfiguredDiscovery, DiscoveryConfig, GenerativeDiscovery};

const KEY: &str = "test-key";
const MODEL: &str = "test-model";

async fn serve(app: Router) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  format!("http://{addr}")
}

/// An endpoint that checks key and model, then answers with `status` and
/// `body`.
fn endpoint(status: StatusCode, body: Value) -> Router {
  Router::new().route(
    "/v1beta/models/{call}",
    post(move |Path(call): Path<String>, headers: HeaderMap| {
      let body = body.clone();
      async move {
        if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(KEY) {
          return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })))
            .into_response();
        }
        if call != format!("{MODEL}:generateContent") {
          return StatusCode::NOT_FOUND.into_response();
        }
        (status, Json(body)).into_response()
      }
    }),
  )
}

fn answer(text: &str) -> Value {
  json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })
}

fn config(base: &str) -> DiscoveryConfig {
  DiscoveryConfig {
    api_key:      Some(KEY.into()),
    model:        MODEL.into(),
    endpoint:     base.into(),
    timeout_secs: 5,
  }
}

async fn discover_from(app: Router, key: &str) -> Result<Vec<ramp_core::point::AccessibilityPoint>, DiscoveryError> {
  let base = serve(app).await;
  let client = GenerativeDiscovery::new(key, &config(&base)).unwrap();
  client.discover(LocationKey::new("Campinas").unwrap()).await
}

#[tokio::test]
async fn parses_points_from_model_text() {
  let text = r#"[{"id":"c-1","name":"Bus terminal ramp","address":"Rua Dr. Pereira Lima",
                  "type":"RAMP","description":"Ramp to platform 3",
                  "position":{"lat":-22.91,"lng":-47.07}}]"#;
  let points = discover_from(endpoint(StatusCode::OK, answer(text)), KEY).await.unwrap();
  assert_eq!(points.len(), 1);
  assert_eq!(points[0].kind, PointKind::Ramp);
  assert!(points[0].creator_id.is_none());
}

#[tokio::test]
async fn empty_text_is_success() {
  let points = discover_from(endpoint(StatusCode::OK, answer("")), KEY).await.unwrap();
  assert!(points.is_empty());
}

#[tokio::test]
async fn malformed_text_is_schema_violation() {
  let err = discover_from(endpoint(StatusCode::OK, answer("not json")), KEY)
    .await
    .unwrap_err();
  assert!(err.is_schema_violation());
}

#[tokio::test]
async fn rejected_key_is_auth_failure() {
  let err = discover_from(endpoint(StatusCode::OK, answer("[]")), "wrong")
    .await
    .unwrap_err();
  assert!(matches!(err, DiscoveryError::Auth(_)));
}

#[tokio::test]
async fn server_error_is_transport_failure() {
  let err = discover_from(
    endpoint(StatusCode::SERVICE_UNAVAILABLE, json!({ "error": "overloaded" })),
    KEY,
  )
  .await
  .unwrap_err();
  assert!(matches!(err, DiscoveryError::Transport(_)));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_failure() {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let base = format!("http://{}", listener.local_addr().unwrap());
  drop(listener);

  let client = GenerativeDiscovery::new(KEY, &config(&base)).unwrap();
  let err = client
    .discover(LocationKey::new("Campinas").unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, DiscoveryError::Transport(_)));
}

#[tokio::test]
async fn missing_key_disables_discovery() {
  let discovery = ConfiguredDiscovery::from_config(&DiscoveryConfig {
    api_key: Some("   ".into()),
    ..DiscoveryConfig::default()
  })
  .unwrap();
  assert!(!discovery.is_enabled());

  let err = discovery
    .discover(LocationKey::new("Campinas").unwrap())
    .await
    .unwrap_err();
  assert!(matches!(err, DiscoveryError::Auth(_)));
}
