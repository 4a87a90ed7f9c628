//! JSON API for croft — session-gated record keeping over a [`HerdStore`].
//!
//! Exposes an axum [`Router`] backed by any [`croft_core::store::HerdStore`].
//! Every route requires a bearer token; every failure body is
//! `{"error": "<message>"}`.

pub mod animals;
pub mod auth;
pub mod error;
pub mod feeds;
pub mod weights;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use croft_core::store::HerdStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `CROFT_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// argon2 PHC hash of the API token; see `croft-server --hash-token`.
  pub auth_token_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: HerdStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/animals", get(animals::list::<S>).post(animals::register::<S>))
    .route("/weights", get(weights::list::<S>).post(weights::record::<S>))
    .route("/feeds", get(feeds::list::<S>).post(feeds::record::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Shared input handling ────────────────────────────────────────────────────

/// `None` and blank strings both count as absent — request fields arrive
/// from form inputs where an untouched field is an empty string.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
  field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use croft_core::{
    record::NewWeightRecord,
    store::{HerdStore, RECENT_CAP},
  };
  use croft_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  const TOKEN: &str = "pasture-gate";

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(TOKEN.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig { token_hash: hash }),
    }
  }

  /// Fire one request at a fresh router over `state`; returns status and
  /// decoded JSON body (`Null` when the body is empty).
  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
      builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let request = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn register_body(tag: &str, species: &str, weight: &str) -> Value {
    json!({ "tagNumber": tag, "type": species, "initialWeight": weight })
  }

  // ── Auth gate ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn every_endpoint_rejects_missing_token() {
    let state = make_state().await;

    for (method, uri) in [
      ("GET", "/animals"),
      ("POST", "/animals"),
      ("GET", "/weights"),
      ("POST", "/weights"),
      ("GET", "/feeds"),
      ("POST", "/feeds"),
    ] {
      let body = (method == "POST").then(|| register_body("T-1", "SHEEP", "40"));
      let (status, json) = send(&state, method, uri, None, body).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
      assert_eq!(json["error"], "Unauthorized", "{method} {uri}");
    }

    // The rejected POSTs must not have touched the store.
    let (_, json) = send(&state, "GET", "/animals", Some(TOKEN), None).await;
    assert_eq!(json["animals"].as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn wrong_token_is_rejected() {
    let state = make_state().await;
    let (status, _) = send(&state, "GET", "/animals", Some("not-the-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  // ── Registration ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_then_list_shows_initial_weight() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("EWE-7", "SHEEP", "42.5")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Animal registered successfully");
    assert_eq!(json["animal"]["tagNumber"], "EWE-7");
    assert_eq!(json["animal"]["type"], "SHEEP");
    assert_eq!(json["animal"]["weights"][0]["weight"], 42.5);
    assert_eq!(
      json["animal"]["weights"][0]["notes"],
      "Initial weight for EWE-7"
    );

    let (status, json) = send(&state, "GET", "/animals?tagNumber=EWE-7", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let animals = json["animals"].as_array().unwrap();
    assert_eq!(animals.len(), 1);
    assert_eq!(animals[0]["weights"].as_array().unwrap().len(), 1);
    assert_eq!(animals[0]["weights"][0]["weight"], 42.5);
  }

  #[tokio::test]
  async fn register_keeps_caller_notes_and_birth_date() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(json!({
        "tagNumber": "CALF-1",
        "type": "CATTLE",
        "initialWeight": "61",
        "birthDate": "2025-11-30",
        "notes": "twin"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["animal"]["birthDate"], "2025-11-30");
    assert_eq!(json["animal"]["weights"][0]["notes"], "twin");
  }

  #[tokio::test]
  async fn duplicate_tag_conflicts() {
    let state = make_state().await;

    send(&state, "POST", "/animals", Some(TOKEN), Some(register_body("R-1", "GOAT", "30"))).await;
    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("R-1", "GOAT", "31")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "Animal with this tag number already exists");
  }

  #[tokio::test]
  async fn invalid_species_is_rejected_without_rows() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("X-1", "ALPACA", "40")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid animal type");

    let (_, json) = send(&state, "GET", "/animals", Some(TOKEN), None).await;
    assert_eq!(json["animals"].as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn missing_fields_are_named() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(json!({ "type": "PIG" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("tagNumber"), "{message}");
    assert!(message.contains("initialWeight"), "{message}");
    assert!(!message.contains("type,") && !message.ends_with("type"), "{message}");

    // Blank strings count as missing, like untouched form fields.
    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(json!({ "tagNumber": " ", "type": "PIG", "initialWeight": "12" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("tagNumber"));
  }

  #[tokio::test]
  async fn malformed_numbers_and_dates_are_rejected() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("W-1", "LAMB", "heavy")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid initial weight");

    let (status, _) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("W-2", "LAMB", "-4")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(json!({
        "tagNumber": "W-3",
        "type": "LAMB",
        "initialWeight": "9",
        "birthDate": "soon"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid birth date");
  }

  // ── Weight recording ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn weight_for_unknown_tag_is_not_found() {
    let state = make_state().await;

    let (status, json) = send(
      &state,
      "POST",
      "/weights",
      Some(TOKEN),
      Some(json!({ "tagNumber": "GHOST", "weight": "50" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Animal not found with this tag number");

    let (_, json) = send(&state, "GET", "/weights", Some(TOKEN), None).await;
    assert_eq!(json["weights"].as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn recorded_weight_lists_first_for_its_tag() {
    let state = make_state().await;

    send(&state, "POST", "/animals", Some(TOKEN), Some(register_body("EWE-9", "SHEEP", "40"))).await;
    let (status, json) = send(
      &state,
      "POST",
      "/weights",
      Some(TOKEN),
      Some(json!({ "tagNumber": "EWE-9", "weight": "52.3" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Weight recorded successfully");
    assert_eq!(json["weightRecord"]["weight"], 52.3);
    assert_eq!(json["weightRecord"]["animal"]["tagNumber"], "EWE-9");
    assert_eq!(json["weightRecord"]["animal"]["type"], "SHEEP");

    let (_, json) = send(&state, "GET", "/weights?tagNumber=EWE-9", Some(TOKEN), None).await;
    let weights = json["weights"].as_array().unwrap();
    assert_eq!(weights.len(), 2);
    assert_eq!(weights[0]["weight"], 52.3);
  }

  #[tokio::test]
  async fn weights_missing_fields_are_named() {
    let state = make_state().await;

    let (status, json) =
      send(&state, "POST", "/weights", Some(TOKEN), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("tagNumber") && message.contains("weight"), "{message}");
  }

  #[tokio::test]
  async fn weights_by_animal_id_and_bad_id() {
    let state = make_state().await;

    let (_, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("PIG-4", "PIG", "80")),
    )
    .await;
    let id = json["animal"]["id"].as_i64().unwrap();

    let (status, json) = send(
      &state,
      "GET",
      &format!("/weights?animalId={id}"),
      Some(TOKEN),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["weights"].as_array().unwrap().len(), 1);

    let (status, json) = send(&state, "GET", "/weights?animalId=forty", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid animal id");
  }

  #[tokio::test]
  async fn unfiltered_weights_return_the_latest_fifty() {
    let state = make_state().await;

    let (_, json) = send(
      &state,
      "POST",
      "/animals",
      Some(TOKEN),
      Some(register_body("HOG-1", "PIG", "10")),
    )
    .await;
    let id = json["animal"]["id"].as_i64().unwrap();

    // Seed past the cap directly through the store.
    for i in 0..(RECENT_CAP + 10) {
      state
        .store
        .record_weight(NewWeightRecord {
          animal_id: id,
          weight:    10.0 + i as f64,
          notes:     None,
        })
        .await
        .unwrap();
    }

    let (status, json) = send(&state, "GET", "/weights", Some(TOKEN), None).await;
    assert_eq!(status, StatusCode::OK);
    let weights = json["weights"].as_array().unwrap();
    assert_eq!(weights.len(), RECENT_CAP);
    assert_eq!(
      weights[0]["weight"].as_f64().unwrap(),
      10.0 + (RECENT_CAP + 9) as f64
    );
  }

  // ── Animal listing ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn substring_filter_matches_many_with_latest_weight_only() {
    let state = make_state().await;

    for tag in ["EWE-1", "EWE-2", "RAM-1"] {
      send(&state, "POST", "/animals", Some(TOKEN), Some(register_body(tag, "SHEEP", "30"))).await;
    }
    send(
      &state,
      "POST",
      "/weights",
      Some(TOKEN),
      Some(json!({ "tagNumber": "EWE-1", "weight": "33" })),
    )
    .await;

    let (_, json) = send(&state, "GET", "/animals?tagNumber=EWE", Some(TOKEN), None).await;
    let animals = json["animals"].as_array().unwrap();
    assert_eq!(animals.len(), 2);
    for animal in animals {
      assert_eq!(animal["weights"].as_array().unwrap().len(), 1);
    }
    let ewe1 = animals
      .iter()
      .find(|a| a["tagNumber"] == "EWE-1")
      .unwrap();
    assert_eq!(ewe1["weights"][0]["weight"], 33.0);
  }

  // ── Feeds ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn feed_for_unknown_tag_is_not_found() {
    let state = make_state().await;

    let (status, _) = send(
      &state,
      "POST",
      "/feeds",
      Some(TOKEN),
      Some(json!({ "tagNumber": "GHOST", "feedType": "hay", "amount": "2" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn feed_round_trip() {
    let state = make_state().await;

    send(&state, "POST", "/animals", Some(TOKEN), Some(register_body("GOAT-2", "GOAT", "25"))).await;
    let (status, json) = send(
      &state,
      "POST",
      "/feeds",
      Some(TOKEN),
      Some(json!({
        "tagNumber": "GOAT-2",
        "feedType": "barley",
        "amount": "1.25",
        "feedDate": "2026-08-01"
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Feed recorded successfully");
    assert_eq!(json["feedRecord"]["feedType"], "barley");
    assert_eq!(json["feedRecord"]["feedDate"], "2026-08-01");
    assert_eq!(json["feedRecord"]["animal"]["tagNumber"], "GOAT-2");

    let (_, json) = send(&state, "GET", "/feeds?tagNumber=GOAT-2", Some(TOKEN), None).await;
    assert_eq!(json["feeds"].as_array().unwrap().len(), 1);
  }
}
