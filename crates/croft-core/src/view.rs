//! Read models assembled by the query workflows.
//!
//! These are the exact shapes the API serialises: an animal with its
//! attached weight records, and records annotated with a minimal
//! projection of their owner.

use serde::{Deserialize, Serialize};

use crate::{
  animal::{Animal, Species},
  record::{FeedRecord, WeightRecord},
};

/// An animal with whichever weight records the query attached — for the
/// listing workflow, at most its single most-recent record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalWithWeights {
  #[serde(flatten)]
  pub animal:  Animal,
  pub weights: Vec<WeightRecord>,
}

/// Minimal projection of an owning animal, attached to its records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimalRef {
  pub tag_number: String,
  #[serde(rename = "type")]
  pub species:    Species,
}

impl From<&Animal> for AnimalRef {
  fn from(animal: &Animal) -> Self {
    Self {
      tag_number: animal.tag_number.clone(),
      species:    animal.species,
    }
  }
}

/// A weight record paired with its owner's tag and species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightWithAnimal {
  #[serde(flatten)]
  pub record: WeightRecord,
  pub animal: AnimalRef,
}

/// A feed record paired with its owner's tag and species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedWithAnimal {
  #[serde(flatten)]
  pub record: FeedRecord,
  pub animal: AnimalRef,
}
