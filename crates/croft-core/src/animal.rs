//! Animal — the registered herd member that owns weight and feed records.
//!
//! The animal row holds only identity and lineage metadata; everything
//! observed about the animal over time lives in its records.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─── Species ─────────────────────────────────────────────────────────────────

/// The species of a registered animal.
///
/// Wire and storage form is the upper-case variant name (`"SHEEP"`, …);
/// nothing outside this enumeration is ever persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Species {
  Sheep,
  Lamb,
  Goat,
  Cattle,
  Pig,
}

impl Species {
  /// The string stored in the `species` column.
  /// Must match the `rename_all = "UPPERCASE"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Sheep => "SHEEP",
      Self::Lamb => "LAMB",
      Self::Goat => "GOAT",
      Self::Cattle => "CATTLE",
      Self::Pig => "PIG",
    }
  }
}

impl FromStr for Species {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    match s {
      "SHEEP" => Ok(Self::Sheep),
      "LAMB" => Ok(Self::Lamb),
      "GOAT" => Ok(Self::Goat),
      "CATTLE" => Ok(Self::Cattle),
      "PIG" => Ok(Self::Pig),
      other => Err(Error::UnknownSpecies(other.to_owned())),
    }
  }
}

// ─── Animal ──────────────────────────────────────────────────────────────────

/// A registered animal. The row is immutable once created; no workflow
/// updates or deletes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
  /// Store-assigned numeric identity.
  pub id:         i64,
  /// External-facing identifier; unique across the herd and used by all
  /// client-side lookups.
  pub tag_number: String,
  #[serde(rename = "type")]
  pub species:    Species,
  /// Lineage back-reference to another animal; populated by no workflow
  /// in scope.
  pub mother_id:  Option<i64>,
  pub birth_date: Option<NaiveDate>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── NewAnimal ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::HerdStore::register_animal`].
/// The identity and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAnimal {
  pub tag_number:     String,
  pub species:        Species,
  pub birth_date:     Option<NaiveDate>,
  /// Weight at registration time; becomes the animal's first record.
  pub initial_weight: f64,
  /// Notes attached to that first record.
  pub notes:          Option<String>,
}

#[cfg(test)]
mod tests {
  use super::Species;

  #[test]
  fn species_parses_its_own_discriminants() {
    for species in [
      Species::Sheep,
      Species::Lamb,
      Species::Goat,
      Species::Cattle,
      Species::Pig,
    ] {
      assert_eq!(species.as_str().parse::<Species>().unwrap(), species);
    }
  }

  #[test]
  fn species_rejects_unknown_and_lowercase() {
    assert!("ALPACA".parse::<Species>().is_err());
    assert!("sheep".parse::<Species>().is_err());
  }
}
