//! Handlers for `/feeds` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/feeds` | Body: [`RecordBody`]; 201 + stored record |
//! | `GET`  | `/feeds` | Optional `?tagNumber=`, else the 50 most recent |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use croft_core::{
  record::{NewFeedRecord, parse_date, parse_kilograms},
  store::{FeedQuery, HerdStore},
  view::{AnimalRef, FeedWithAnimal},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError, present};

// ─── Record ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /feeds`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordBody {
  pub tag_number: Option<String>,
  pub feed_type:  Option<String>,
  pub amount:     Option<String>,
  /// `YYYY-MM-DD`; defaults to today when absent.
  pub feed_date:  Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
  pub message:     &'static str,
  pub feed_record: FeedWithAnimal,
}

/// `POST /feeds` — log a feeding event against an existing animal.
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
  let feed_type  = present(&body.feed_type);
  let amount_raw = present(&body.amount);

  let (Some(tag), Some(feed_type), Some(amount_raw)) = (tag, feed_type, amount_raw) else {
    let mut missing = Vec::new();
    if tag.is_none() {
      missing.push("tagNumber");
    }
    if feed_type.is_none() {
      missing.push("feedType");
    }
    if amount_raw.is_none() {
      missing.push("amount");
    }
    return Err(ApiError::BadRequest(format!(
      "Missing required fields: {}",
      missing.join(", ")
    )));
  };

  let amount = parse_kilograms(amount_raw)
    .map_err(|_| ApiError::BadRequest("Invalid feed amount".to_owned()))?;
  let feed_date = present(&body.feed_date)
    .map(parse_date)
    .transpose()
    .map_err(|_| ApiError::BadRequest("Invalid feed date".to_owned()))?;

  let animal = state
    .store
    .find_animal(tag)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Animal not found with this tag number".to_owned()))?;

  let record = state
    .store
    .record_feed(NewFeedRecord {
      animal_id: animal.id,
      feed_type: feed_type.to_owned(),
      amount,
      feed_date,
    })
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok((
    StatusCode::CREATED,
    Json(RecordResponse {
      message:     "Feed recorded successfully",
      feed_record: FeedWithAnimal {
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
}

#[derive(Debug, Serialize)]
pub struct FeedsResponse {
  pub feeds: Vec<FeedWithAnimal>,
}

/// `GET /feeds[?tagNumber=<tag>]` — newest feed day first; capped to the
/// 50 most recent rows when unfiltered.
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<FeedsResponse>, ApiError>
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = FeedQuery {
    tag_number: present(&params.tag_number).map(str::to_owned),
  };

  let feeds = state
    .store
    .list_feeds(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(FeedsResponse { feeds }))
}
