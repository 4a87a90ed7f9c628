//! Weight and feed records — the append-only observations of an animal.
//!
//! Records are never updated or deleted; history is the point.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Weights ─────────────────────────────────────────────────────────────────

/// A single weight observation, in kilograms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightRecord {
  pub id:          i64,
  pub animal_id:   i64,
  pub weight:      f64,
  /// Store-assigned at insert time; defines the observation order.
  pub recorded_at: DateTime<Utc>,
  pub notes:       Option<String>,
}

/// Input to [`crate::store::HerdStore::record_weight`].
/// `recorded_at` is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone)]
pub struct NewWeightRecord {
  pub animal_id: i64,
  pub weight:    f64,
  pub notes:     Option<String>,
}

// ─── Feeds ───────────────────────────────────────────────────────────────────

/// A feeding event: what was fed, how much of it, on which day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
  pub id:        i64,
  pub animal_id: i64,
  pub feed_type: String,
  /// Kilograms.
  pub amount:    f64,
  pub feed_date: NaiveDate,
}

/// Input to [`crate::store::HerdStore::record_feed`].
#[derive(Debug, Clone)]
pub struct NewFeedRecord {
  pub animal_id: i64,
  pub feed_type: String,
  pub amount:    f64,
  /// Defaults to the current UTC date when `None`.
  pub feed_date: Option<NaiveDate>,
}

// ─── Input parsing ───────────────────────────────────────────────────────────

/// Parse a kilogram quantity from its request string form.
///
/// Rejects anything that is not a finite number greater than zero.
pub fn parse_kilograms(raw: &str) -> Result<f64> {
  let value: f64 = raw
    .trim()
    .parse()
    .map_err(|_| Error::InvalidQuantity(raw.to_owned()))?;
  if !value.is_finite() || value <= 0.0 {
    return Err(Error::InvalidQuantity(raw.to_owned()));
  }
  Ok(value)
}

/// Parse a `YYYY-MM-DD` calendar date from its request string form.
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(raw.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::{parse_date, parse_kilograms};

  #[test]
  fn kilograms_accepts_positive_decimals() {
    assert_eq!(parse_kilograms("52.3").unwrap(), 52.3);
    assert_eq!(parse_kilograms(" 4 ").unwrap(), 4.0);
  }

  #[test]
  fn kilograms_rejects_garbage_and_non_positive() {
    assert!(parse_kilograms("heavy").is_err());
    assert!(parse_kilograms("").is_err());
    assert!(parse_kilograms("0").is_err());
    assert!(parse_kilograms("-3.5").is_err());
    assert!(parse_kilograms("NaN").is_err());
    assert!(parse_kilograms("inf").is_err());
  }

  #[test]
  fn date_round_trips_iso_form() {
    let d = parse_date("2024-03-01").unwrap();
    assert_eq!(d.to_string(), "2024-03-01");
    assert!(parse_date("01/03/2024").is_err());
    assert!(parse_date("yesterday").is_err());
  }
}
