//! The `HerdStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `croft-store-sqlite`).
//! The API layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  animal::{Animal, NewAnimal},
  record::{FeedRecord, NewFeedRecord, NewWeightRecord, WeightRecord},
  view::{AnimalWithWeights, FeedWithAnimal, WeightWithAnimal},
};

/// Row cap applied to the weight and feed listings when no filter is given.
pub const RECENT_CAP: usize = 50;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`HerdStore::list_weights`].
///
/// `tag_number` (exact match on the owner's tag) and `animal_id` are
/// alternatives; when both are `None` the listing is capped to the
/// [`RECENT_CAP`] most recently recorded rows.
#[derive(Debug, Clone, Default)]
pub struct WeightQuery {
  pub tag_number: Option<String>,
  pub animal_id:  Option<i64>,
}

/// Parameters for [`HerdStore::list_feeds`]; same capping rule as weights.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
  pub tag_number: Option<String>,
}

// ─── Registration outcome ────────────────────────────────────────────────────

/// Result of an attempted registration.
///
/// The duplicate-tag case is part of the trait contract rather than a
/// backend error: the tag-number uniqueness constraint lives in the store,
/// and a backend must report a constraint rejection here exactly as if the
/// caller's pre-check had caught it. Callers cannot otherwise tell a lost
/// registration race apart from a backend failure.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
  /// The animal and its first weight record were created.
  Created(AnimalWithWeights),
  /// Another animal already holds the requested tag number.
  TagTaken,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a croft herd-record backend.
///
/// Animals are created once and never mutated; weight and feed records are
/// append-only. All methods return `Send` futures so the trait can be used
/// from multi-threaded async runtimes (tokio with `axum`).
pub trait HerdStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Animals ───────────────────────────────────────────────────────────

  /// Create an animal together with its first weight record. The two
  /// inserts form a single logical operation: concurrent readers never
  /// observe the animal without its record.
  fn register_animal(
    &self,
    input: NewAnimal,
  ) -> impl Future<Output = Result<RegisterOutcome, Self::Error>> + Send + '_;

  /// Look up an animal by its unique tag number. Returns `None` if absent.
  fn find_animal<'a>(
    &'a self,
    tag_number: &'a str,
  ) -> impl Future<Output = Result<Option<Animal>, Self::Error>> + Send + 'a;

  /// List animals, newest first, optionally filtered by tag-number
  /// substring; each carries at most its latest weight record.
  fn list_animals<'a>(
    &'a self,
    tag_filter: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<AnimalWithWeights>, Self::Error>> + Send + 'a;

  // ── Records — append-only writes ──────────────────────────────────────

  /// Append a weight record. `recorded_at` is set by the store.
  fn record_weight(
    &self,
    input: NewWeightRecord,
  ) -> impl Future<Output = Result<WeightRecord, Self::Error>> + Send + '_;

  /// Append a feed record. A missing `feed_date` defaults to today (UTC).
  fn record_feed(
    &self,
    input: NewFeedRecord,
  ) -> impl Future<Output = Result<FeedRecord, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// List weight records, most recently recorded first.
  fn list_weights<'a>(
    &'a self,
    query: &'a WeightQuery,
  ) -> impl Future<Output = Result<Vec<WeightWithAnimal>, Self::Error>> + Send + 'a;

  /// List feed records, newest feed day first.
  fn list_feeds<'a>(
    &'a self,
    query: &'a FeedQuery,
  ) -> impl Future<Output = Result<Vec<FeedWithAnimal>, Self::Error>> + Send + 'a;
}
