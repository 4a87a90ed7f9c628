//! [`SqliteStore`] — the SQLite implementation of [`HerdStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use croft_core::{
  animal::{Animal, NewAnimal},
  record::{FeedRecord, NewFeedRecord, NewWeightRecord, WeightRecord},
  store::{FeedQuery, HerdStore, RECENT_CAP, RegisterOutcome, WeightQuery},
  view::{AnimalWithWeights, FeedWithAnimal, WeightWithAnimal},
};

use crate::{
  Result,
  encode::{RawAnimal, RawFeed, RawOwner, RawWeight, encode_date, encode_dt, encode_species},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A croft herd store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Whether `err` is SQLite rejecting an insert over a constraint — for the
/// `animals` insert that can only be the `tag_number` UNIQUE guard.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
  matches!(
    err,
    rusqlite::Error::SqliteFailure(e, _)
      if e.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

// ─── HerdStore impl ──────────────────────────────────────────────────────────

impl HerdStore for SqliteStore {
  type Error = crate::Error;

  // ── Animals ───────────────────────────────────────────────────────────────

  async fn register_animal(&self, input: NewAnimal) -> Result<RegisterOutcome> {
    let now = Utc::now();

    let tag_str     = input.tag_number.clone();
    let species_str = encode_species(input.species).to_owned();
    let birth_str   = input.birth_date.map(encode_date);
    let now_str     = encode_dt(now);
    let weight      = input.initial_weight;
    let notes       = input.notes.clone();

    // Both inserts run inside one transaction so no reader ever sees the
    // animal without its first weight record. A UNIQUE rejection on the
    // tag means a concurrent registration won the race; that is an
    // outcome, not a failure.
    let ids: Option<(i64, i64)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let inserted = tx.execute(
          "INSERT INTO animals (tag_number, species, birth_date, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)",
          rusqlite::params![tag_str, species_str, birth_str, now_str],
        );
        match inserted {
          Ok(_) => {}
          Err(e) if is_constraint_violation(&e) => return Ok(None),
          Err(e) => return Err(e.into()),
        }
        let animal_id = tx.last_insert_rowid();

        tx.execute(
          "INSERT INTO weights (animal_id, weight, recorded_at, notes)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![animal_id, weight, now_str, notes],
        )?;
        let weight_id = tx.last_insert_rowid();

        tx.commit()?;
        Ok(Some((animal_id, weight_id)))
      })
      .await?;

    let Some((animal_id, weight_id)) = ids else {
      return Ok(RegisterOutcome::TagTaken);
    };

    let animal = Animal {
      id:         animal_id,
      tag_number: input.tag_number,
      species:    input.species,
      mother_id:  None,
      birth_date: input.birth_date,
      created_at: now,
      updated_at: now,
    };
    let first = WeightRecord {
      id: weight_id,
      animal_id,
      weight: input.initial_weight,
      recorded_at: now,
      notes: input.notes,
    };

    Ok(RegisterOutcome::Created(AnimalWithWeights {
      animal,
      weights: vec![first],
    }))
  }

  async fn find_animal(&self, tag_number: &str) -> Result<Option<Animal>> {
    let tag = tag_number.to_owned();

    let raw: Option<RawAnimal> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, tag_number, species, mother_id, birth_date, created_at, updated_at
               FROM animals WHERE tag_number = ?1",
              rusqlite::params![tag],
              RawAnimal::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAnimal::into_animal).transpose()
  }

  async fn list_animals(&self, tag_filter: Option<&str>) -> Result<Vec<AnimalWithWeights>> {
    let pattern = tag_filter.map(|t| format!("%{t}%"));

    let rows: Vec<(RawAnimal, Option<RawWeight>)> = self
      .conn
      .call(move |conn| {
        // Latest record per animal: greatest recorded_at, insertion
        // sequence as the tie-break.
        const BASE: &str = "SELECT
             a.id, a.tag_number, a.species, a.mother_id, a.birth_date,
             a.created_at, a.updated_at,
             w.id, w.animal_id, w.weight, w.recorded_at, w.notes
           FROM animals a
           LEFT JOIN weights w ON w.id = (
             SELECT id FROM weights
             WHERE animal_id = a.id
             ORDER BY recorded_at DESC, id DESC
             LIMIT 1
           )";

        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(RawAnimal, Option<RawWeight>)> {
          let animal = RawAnimal::from_row(row)?;
          let weight_id: Option<i64> = row.get(7)?;
          let weight = match weight_id {
            Some(id) => Some(RawWeight {
              id,
              animal_id:   row.get(8)?,
              weight:      row.get(9)?,
              recorded_at: row.get(10)?,
              notes:       row.get(11)?,
            }),
            None => None,
          };
          Ok((animal, weight))
        };

        let rows = if let Some(p) = pattern {
          let sql =
            format!("{BASE} WHERE a.tag_number LIKE ?1 ORDER BY a.created_at DESC, a.id DESC");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![p], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!("{BASE} ORDER BY a.created_at DESC, a.id DESC");
          let mut stmt = conn.prepare(&sql)?;
          stmt.query_map([], map)?.collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(raw_animal, raw_weight)| {
        let animal = raw_animal.into_animal()?;
        let weights = match raw_weight {
          Some(rw) => vec![rw.into_record()?],
          None => Vec::new(),
        };
        Ok(AnimalWithWeights { animal, weights })
      })
      .collect()
  }

  // ── Records — append-only writes ──────────────────────────────────────────

  async fn record_weight(&self, input: NewWeightRecord) -> Result<WeightRecord> {
    let recorded_at = Utc::now();
    let at_str    = encode_dt(recorded_at);
    let animal_id = input.animal_id;
    let weight    = input.weight;
    let notes     = input.notes.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO weights (animal_id, weight, recorded_at, notes)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![animal_id, weight, at_str, notes],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(WeightRecord {
      id,
      animal_id: input.animal_id,
      weight: input.weight,
      recorded_at,
      notes: input.notes,
    })
  }

  async fn record_feed(&self, input: NewFeedRecord) -> Result<FeedRecord> {
    let feed_date = input.feed_date.unwrap_or_else(|| Utc::now().date_naive());
    let date_str  = encode_date(feed_date);
    let animal_id = input.animal_id;
    let feed_type = input.feed_type.clone();
    let amount    = input.amount;

    let id: i64 = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feeds (animal_id, feed_type, amount, feed_date)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![animal_id, feed_type, amount, date_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(FeedRecord {
      id,
      animal_id: input.animal_id,
      feed_type: input.feed_type,
      amount: input.amount,
      feed_date,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_weights(&self, query: &WeightQuery) -> Result<Vec<WeightWithAnimal>> {
    let tag       = query.tag_number.clone();
    let animal_id = query.animal_id;

    let rows: Vec<(RawWeight, RawOwner)> = self
      .conn
      .call(move |conn| {
        const BASE: &str = "SELECT w.id, w.animal_id, w.weight, w.recorded_at, w.notes,
                  a.tag_number, a.species
           FROM weights w
           JOIN animals a ON a.id = w.animal_id";
        const ORDER: &str = "ORDER BY w.recorded_at DESC, w.id DESC";

        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(RawWeight, RawOwner)> {
          Ok((
            RawWeight {
              id:          row.get(0)?,
              animal_id:   row.get(1)?,
              weight:      row.get(2)?,
              recorded_at: row.get(3)?,
              notes:       row.get(4)?,
            },
            RawOwner {
              tag_number: row.get(5)?,
              species:    row.get(6)?,
            },
          ))
        };

        let rows = if let Some(t) = tag {
          let sql = format!("{BASE} WHERE a.tag_number = ?1 {ORDER}");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![t], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else if let Some(id) = animal_id {
          let sql = format!("{BASE} WHERE w.animal_id = ?1 {ORDER}");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![id], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!("{BASE} {ORDER} LIMIT ?1");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![RECENT_CAP as i64], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(raw, owner)| {
        Ok(WeightWithAnimal {
          record: raw.into_record()?,
          animal: owner.into_ref()?,
        })
      })
      .collect()
  }

  async fn list_feeds(&self, query: &FeedQuery) -> Result<Vec<FeedWithAnimal>> {
    let tag = query.tag_number.clone();

    let rows: Vec<(RawFeed, RawOwner)> = self
      .conn
      .call(move |conn| {
        const BASE: &str = "SELECT f.id, f.animal_id, f.feed_type, f.amount, f.feed_date,
                  a.tag_number, a.species
           FROM feeds f
           JOIN animals a ON a.id = f.animal_id";
        const ORDER: &str = "ORDER BY f.feed_date DESC, f.id DESC";

        let map = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(RawFeed, RawOwner)> {
          Ok((
            RawFeed {
              id:        row.get(0)?,
              animal_id: row.get(1)?,
              feed_type: row.get(2)?,
              amount:    row.get(3)?,
              feed_date: row.get(4)?,
            },
            RawOwner {
              tag_number: row.get(5)?,
              species:    row.get(6)?,
            },
          ))
        };

        let rows = if let Some(t) = tag {
          let sql = format!("{BASE} WHERE a.tag_number = ?1 {ORDER}");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![t], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!("{BASE} {ORDER} LIMIT ?1");
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![RECENT_CAP as i64], map)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(raw, owner)| {
        Ok(FeedWithAnimal {
          record: raw.into_record()?,
          animal: owner.into_ref()?,
        })
      })
      .collect()
  }
}
