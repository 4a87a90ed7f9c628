//! Handlers for `/animals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/animals` | Body: [`RegisterBody`]; 201 + created animal |
//! | `GET`  | `/animals` | Optional `?tagNumber=` substring filter |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use croft_core::{
  animal::{NewAnimal, Species},
  record::{parse_date, parse_kilograms},
  store::{HerdStore, RegisterOutcome},
  view::AnimalWithWeights,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::Authenticated, error::ApiError, present};

const DUPLICATE_TAG: &str = "Animal with this tag number already exists";

// ─── Register ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /animals`.
///
/// Fields arrive as form strings; presence and format are checked in the
/// handler so rejections can name the offending fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
  pub tag_number:     Option<String>,
  #[serde(rename = "type")]
  pub species:        Option<String>,
  pub initial_weight: Option<String>,
  pub birth_date:     Option<String>,
  pub notes:          Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
  pub message: &'static str,
  pub animal:  AnimalWithWeights,
}

/// `POST /animals` — register an animal together with its initial weight.
pub async fn register<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tag        = present(&body.tag_number);
  let species    = present(&body.species);
  let weight_raw = present(&body.initial_weight);

  let (Some(tag), Some(species_raw), Some(weight_raw)) = (tag, species, weight_raw) else {
    let mut missing = Vec::new();
    if tag.is_none() {
      missing.push("tagNumber");
    }
    if species.is_none() {
      missing.push("type");
    }
    if weight_raw.is_none() {
      missing.push("initialWeight");
    }
    return Err(ApiError::BadRequest(format!(
      "Missing required fields: {}",
      missing.join(", ")
    )));
  };

  let species: Species = species_raw
    .parse()
    .map_err(|_| ApiError::BadRequest("Invalid animal type".to_owned()))?;
  let initial_weight = parse_kilograms(weight_raw)
    .map_err(|_| ApiError::BadRequest("Invalid initial weight".to_owned()))?;
  let birth_date = present(&body.birth_date)
    .map(parse_date)
    .transpose()
    .map_err(|_| ApiError::BadRequest("Invalid birth date".to_owned()))?;

  // Existence pre-check. This is an optimization only: the store's UNIQUE
  // constraint stays authoritative under concurrent registration.
  let existing = state
    .store
    .find_animal(tag)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(ApiError::Conflict(DUPLICATE_TAG.to_owned()));
  }

  let notes = present(&body.notes)
    .map(str::to_owned)
    .unwrap_or_else(|| format!("Initial weight for {tag}"));

  let input = NewAnimal {
    tag_number: tag.to_owned(),
    species,
    birth_date,
    initial_weight,
    notes: Some(notes),
  };

  match state
    .store
    .register_animal(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
  {
    RegisterOutcome::Created(animal) => Ok((
      StatusCode::CREATED,
      Json(RegisterResponse {
        message: "Animal registered successfully",
        animal,
      }),
    )),
    // A concurrent registration slipped past the pre-check; the constraint
    // rejection is reported exactly as the pre-check would have.
    RegisterOutcome::TagTaken => Err(ApiError::Conflict(DUPLICATE_TAG.to_owned())),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub tag_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnimalsResponse {
  pub animals: Vec<AnimalWithWeights>,
}

/// `GET /animals[?tagNumber=<substring>]` — newest first, each animal with
/// at most its latest weight record.
pub async fn list<S>(
  _auth: Authenticated,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<AnimalsResponse>, ApiError>
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let animals = state
    .store
    .list_animals(present(&params.tag_number))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(AnimalsResponse { animals }))
}
