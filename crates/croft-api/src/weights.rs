//! Handlers for `/weights` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/weights` | Body: [`RecordBody`]; 201 + stored record |
//! | `GET`  | `/weights` | `?tagNumber=` or `?animalId=`, else the 50 most recent |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use croft_core::{
  record::{NewWeightRecord, parse_kilograms},
  store::{HerdStore, WeightQuery},
  view::{AnimalRef, WeightWithAnimal},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError, present};

// ─── Record ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /weights`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
  pub tag_number: Option<String>,
  pub weight:     Option<String>,
  pub notes:      Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
  pub message:       &'static str,
  pub weight_record: WeightWithAnimal,
}

/// `POST /weights` — append a weight observation to an existing animal,
/// located by tag number. The animal row itself is never touched.
pub async fn record<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<RecordBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tag        = present(&body.tag_number);
  let weight_raw = present(&body.weight);

  let (Some(tag), Some(weight_raw)) = (tag, weight_raw) else {
    let mut missing = Vec::new();
    if tag.is_none() {
      missing.push("tagNumber");
    }
    if weight_raw.is_none() {
      missing.push("weight");
    }
    return Err(ApiError::BadRequest(format!(
      "Missing required fields: {}",
      missing.join(", ")
    )));
  };

  let weight = parse_kilograms(weight_raw)
    .map_err(|_| ApiError::BadRequest("Invalid weight".to_owned()))?;

  let animal = state
    .store
    .find_animal(tag)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Animal not found with this tag number".to_owned()))?;

  let record = state
    .store
    .record_weight(NewWeightRecord {
      animal_id: animal.id,
      weight,
      notes: present(&body.notes).map(str::to_owned),
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((
    StatusCode::CREATED,
    Json(RecordResponse {
      message:       "Weight recorded successfully",
      weight_record: WeightWithAnimal {
        record,
        animal: AnimalRef::from(&animal),
      },
    }),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub tag_number: Option<String>,
  pub animal_id:  Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WeightsResponse {
  pub weights: Vec<WeightWithAnimal>,
}

/// `GET /weights[?tagNumber=<tag> | ?animalId=<id>]` — most recent first.
/// `tagNumber` wins when both are given; with neither, the listing is the
/// 50 most recently recorded rows across all animals.
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<WeightsResponse>, ApiError>
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = if let Some(tag) = present(&params.tag_number) {
    WeightQuery {
      tag_number: Some(tag.to_owned()),
      ..Default::default()
    }
  } else if let Some(raw) = present(&params.animal_id) {
    let animal_id: i64 = raw
      .parse()
      .map_err(|_| ApiError::BadRequest("Invalid animal id".to_owned()))?;
    WeightQuery {
      animal_id: Some(animal_id),
      ..Default::default()
    }
  } else {
    WeightQuery::default()
  };

  let weights = state
    .store
    .list_weights(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(WeightsResponse { weights }))
}
