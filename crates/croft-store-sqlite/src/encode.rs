//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as
//! `YYYY-MM-DD`, species as the upper-case discriminant.

use chrono::{DateTime, NaiveDate, Utc};
use croft_core::{
  animal::{Animal, Species},
  record::{FeedRecord, WeightRecord},
  view::AnimalRef,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::Decode(e.to_string()))
}

// ─── Species ─────────────────────────────────────────────────────────────────

pub fn encode_species(s: Species) -> &'static str { s.as_str() }

pub fn decode_species(s: &str) -> Result<Species> {
  Ok(s.parse::<Species>()?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `animals` row.
pub struct RawAnimal {
  pub id:         i64,
  pub tag_number: String,
  pub species:    String,
  pub mother_id:  Option<i64>,
  pub birth_date: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawAnimal {
  /// Column order must match the `SELECT a.*`-style lists in `store.rs`.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      tag_number: row.get(1)?,
      species:    row.get(2)?,
      mother_id:  row.get(3)?,
      birth_date: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_animal(self) -> Result<Animal> {
    Ok(Animal {
      id:         self.id,
      tag_number: self.tag_number,
      species:    decode_species(&self.species)?,
      mother_id:  self.mother_id,
      birth_date: self.birth_date.as_deref().map(decode_date).transpose()?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from a `weights` row.
pub struct RawWeight {
  pub id:          i64,
  pub animal_id:   i64,
  pub weight:      f64,
  pub recorded_at: String,
  pub notes:       Option<String>,
}

impl RawWeight {
  pub fn into_record(self) -> Result<WeightRecord> {
    Ok(WeightRecord {
      id:          self.id,
      animal_id:   self.animal_id,
      weight:      self.weight,
      recorded_at: decode_dt(&self.recorded_at)?,
      notes:       self.notes,
    })
  }
}

/// Raw values read directly from a `feeds` row.
pub struct RawFeed {
  pub id:        i64,
  pub animal_id: i64,
  pub feed_type: String,
  pub amount:    f64,
  pub feed_date: String,
}

impl RawFeed {
  pub fn into_record(self) -> Result<FeedRecord> {
    Ok(FeedRecord {
      id:        self.id,
      animal_id: self.animal_id,
      feed_type: self.feed_type,
      amount:    self.amount,
      feed_date: decode_date(&self.feed_date)?,
    })
  }
}

/// The owning animal's tag and species as joined onto a record row.
pub struct RawOwner {
  pub tag_number: String,
  pub species:    String,
}

impl RawOwner {
  pub fn into_ref(self) -> Result<AnimalRef> {
    Ok(AnimalRef {
      tag_number: self.tag_number,
      species:    decode_species(&self.species)?,
    })
  }
}
