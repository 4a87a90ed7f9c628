//! Async HTTP client wrapping the croft JSON API.

use anyhow::{Context, Result, anyhow};
use croft_core::view::{AnimalWithWeights, WeightWithAnimal};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the croft API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    String,
}

/// Async HTTP client for the croft JSON API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

// ─── Request bodies ───────────────────────────────────────────────────────────

/// Body for `POST /animals`; field values are sent as the user typed them
/// and validated server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
  pub tag_number:     String,
  #[serde(rename = "type")]
  pub species:        String,
  pub initial_weight: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub birth_date:     Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:          Option<String>,
}

/// Body for `POST /weights`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighRequest {
  pub tag_number: String,
  pub weight:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:      Option<String>,
}

// ─── Response envelopes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AnimalsEnvelope {
  animals: Vec<AnimalWithWeights>,
}

#[derive(Debug, Deserialize)]
struct WeightsEnvelope {
  weights: Vec<WeightWithAnimal>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  error:   Option<String>,
}

// ─── Client ───────────────────────────────────────────────────────────────────

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  /// Read `{message}` out of a success body or `{error}` out of a failure.
  async fn into_message(resp: reqwest::Response) -> Result<String> {
    let status = resp.status();
    let body: MessageEnvelope = resp.json().await.context("decoding response body")?;
    if status.is_success() {
      Ok(body.message.unwrap_or_else(|| "OK".to_owned()))
    } else {
      Err(anyhow!(body.error.unwrap_or_else(|| format!("request failed: {status}"))))
    }
  }

  // ── Animals ───────────────────────────────────────────────────────────────

  /// `GET /animals[?tagNumber=<substr>]`
  pub async fn list_animals(&self, tag_filter: Option<&str>) -> Result<Vec<AnimalWithWeights>> {
    let mut req = self.auth(self.client.get(self.url("/animals")));
    if let Some(tag) = tag_filter {
      req = req.query(&[("tagNumber", tag)]);
    }
    let resp = req.send().await.context("GET /animals failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /animals → {}", resp.status()));
    }
    let envelope: AnimalsEnvelope = resp.json().await.context("deserialising animals")?;
    Ok(envelope.animals)
  }

  /// `POST /animals` — returns the server's success message.
  pub async fn register_animal(&self, req: &RegisterRequest) -> Result<String> {
    let resp = self
      .auth(self.client.post(self.url("/animals")))
      .json(req)
      .send()
      .await
      .context("POST /animals failed")?;
    Self::into_message(resp).await
  }

  // ── Weights ───────────────────────────────────────────────────────────────

  /// `GET /weights?tagNumber=<tag>`
  pub async fn list_weights(&self, tag: &str) -> Result<Vec<WeightWithAnimal>> {
    let resp = self
      .auth(self.client.get(self.url("/weights")))
      .query(&[("tagNumber", tag)])
      .send()
      .await
      .context("GET /weights failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /weights → {}", resp.status()));
    }
    let envelope: WeightsEnvelope = resp.json().await.context("deserialising weights")?;
    Ok(envelope.weights)
  }

  /// `POST /weights` — returns the server's success message.
  pub async fn record_weight(&self, req: &WeighRequest) -> Result<String> {
    let resp = self
      .auth(self.client.post(self.url("/weights")))
      .json(req)
      .send()
      .await
      .context("POST /weights failed")?;
    Self::into_message(resp).await
  }
}
