//! Integration tests for `SqliteStore` against an in-memory database.

use croft_core::{
  animal::{NewAnimal, Species},
  record::{NewFeedRecord, NewWeightRecord},
  store::{FeedQuery, HerdStore, RECENT_CAP, RegisterOutcome, WeightQuery},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn ewe(tag: &str, weight: f64) -> NewAnimal {
  NewAnimal {
    tag_number:     tag.to_owned(),
    species:        Species::Sheep,
    birth_date:     None,
    initial_weight: weight,
    notes:          None,
  }
}

/// Register and unwrap the created view; panics on `TagTaken`.
async fn register(s: &SqliteStore, input: NewAnimal) -> croft_core::view::AnimalWithWeights {
  match s.register_animal(input).await.unwrap() {
    RegisterOutcome::Created(v) => v,
    RegisterOutcome::TagTaken => panic!("tag unexpectedly taken"),
  }
}

// ─── Registration ────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_and_find_by_tag() {
  let s = store().await;

  let created = register(&s, ewe("A-001", 42.0)).await;
  assert_eq!(created.animal.tag_number, "A-001");
  assert_eq!(created.animal.species, Species::Sheep);
  assert!(created.animal.mother_id.is_none());

  let found = s.find_animal("A-001").await.unwrap().unwrap();
  assert_eq!(found.id, created.animal.id);
  assert_eq!(found.species, Species::Sheep);
}

#[tokio::test]
async fn find_missing_returns_none() {
  let s = store().await;
  assert!(s.find_animal("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn registration_creates_the_first_weight_record() {
  let s = store().await;

  let created = register(&s, ewe("A-002", 38.5)).await;
  assert_eq!(created.weights.len(), 1);
  assert_eq!(created.weights[0].weight, 38.5);
  assert_eq!(created.weights[0].animal_id, created.animal.id);

  let weights = s
    .list_weights(&WeightQuery {
      tag_number: Some("A-002".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(weights.len(), 1);
  assert_eq!(weights[0].record.weight, 38.5);
}

#[tokio::test]
async fn duplicate_tag_reports_tag_taken() {
  let s = store().await;

  register(&s, ewe("A-003", 40.0)).await;
  let second = s.register_animal(ewe("A-003", 41.0)).await.unwrap();
  assert!(matches!(second, RegisterOutcome::TagTaken));

  // The losing attempt must leave no rows behind.
  let animals = s.list_animals(Some("A-003")).await.unwrap();
  assert_eq!(animals.len(), 1);
  let weights = s
    .list_weights(&WeightQuery {
      tag_number: Some("A-003".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(weights.len(), 1);
}

#[tokio::test]
async fn registration_round_trips_birth_date_and_notes() {
  let s = store().await;

  let mut input = ewe("A-004", 12.0);
  input.birth_date = Some(croft_core::record::parse_date("2024-03-01").unwrap());
  input.notes = Some("born in the east paddock".into());
  let created = register(&s, input).await;

  let found = s.find_animal("A-004").await.unwrap().unwrap();
  assert_eq!(found.birth_date, created.animal.birth_date);
  assert_eq!(
    created.weights[0].notes.as_deref(),
    Some("born in the east paddock")
  );
}

// ─── Animal listing ──────────────────────────────────────────────────────────

#[tokio::test]
async fn list_animals_newest_first() {
  let s = store().await;

  register(&s, ewe("A-010", 30.0)).await;
  register(&s, ewe("A-011", 31.0)).await;
  register(&s, ewe("A-012", 32.0)).await;

  let all = s.list_animals(None).await.unwrap();
  let tags: Vec<_> = all.iter().map(|a| a.animal.tag_number.as_str()).collect();
  assert_eq!(tags, ["A-012", "A-011", "A-010"]);
}

#[tokio::test]
async fn list_animals_substring_filter() {
  let s = store().await;

  register(&s, ewe("EWE-1", 30.0)).await;
  register(&s, ewe("EWE-2", 31.0)).await;
  register(&s, ewe("RAM-1", 55.0)).await;

  let ewes = s.list_animals(Some("EWE")).await.unwrap();
  assert_eq!(ewes.len(), 2);
  assert!(ewes.iter().all(|a| a.animal.tag_number.starts_with("EWE")));

  // Substring, not prefix.
  let ones = s.list_animals(Some("-1")).await.unwrap();
  assert_eq!(ones.len(), 2);
}

#[tokio::test]
async fn listing_attaches_only_the_latest_weight() {
  let s = store().await;

  let created = register(&s, ewe("A-020", 30.0)).await;
  let id = created.animal.id;
  s.record_weight(NewWeightRecord { animal_id: id, weight: 33.0, notes: None })
    .await
    .unwrap();
  s.record_weight(NewWeightRecord { animal_id: id, weight: 35.5, notes: None })
    .await
    .unwrap();

  let all = s.list_animals(Some("A-020")).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].weights.len(), 1);
  assert_eq!(all[0].weights[0].weight, 35.5);
}

// ─── Weight recording and listing ────────────────────────────────────────────

#[tokio::test]
async fn weights_listed_most_recent_first() {
  let s = store().await;

  let id = register(&s, ewe("A-030", 30.0)).await.animal.id;
  s.record_weight(NewWeightRecord { animal_id: id, weight: 31.0, notes: None })
    .await
    .unwrap();
  s.record_weight(NewWeightRecord { animal_id: id, weight: 52.3, notes: None })
    .await
    .unwrap();

  let weights = s
    .list_weights(&WeightQuery {
      tag_number: Some("A-030".into()),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(weights.len(), 3);
  assert_eq!(weights[0].record.weight, 52.3);
  assert_eq!(weights[0].animal.tag_number, "A-030");
  assert_eq!(weights[2].record.weight, 30.0);
}

#[tokio::test]
async fn weights_by_animal_id() {
  let s = store().await;

  let a = register(&s, ewe("A-031", 30.0)).await.animal.id;
  let b = register(&s, ewe("A-032", 40.0)).await.animal.id;
  s.record_weight(NewWeightRecord { animal_id: a, weight: 34.0, notes: None })
    .await
    .unwrap();

  let for_a = s
    .list_weights(&WeightQuery { animal_id: Some(a), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(for_a.len(), 2);
  assert!(for_a.iter().all(|w| w.record.animal_id == a));

  let for_b = s
    .list_weights(&WeightQuery { animal_id: Some(b), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(for_b.len(), 1);
}

#[tokio::test]
async fn unfiltered_weights_capped_to_most_recent() {
  let s = store().await;

  let id = register(&s, ewe("A-033", 20.0)).await.animal.id;
  for i in 0..(RECENT_CAP + 5) {
    s.record_weight(NewWeightRecord {
      animal_id: id,
      weight:    20.0 + i as f64,
      notes:     None,
    })
    .await
    .unwrap();
  }

  let recent = s.list_weights(&WeightQuery::default()).await.unwrap();
  assert_eq!(recent.len(), RECENT_CAP);
  // Newest insert comes back first; the oldest rows fell off the cap.
  assert_eq!(recent[0].record.weight, 20.0 + (RECENT_CAP + 4) as f64);

  // A filtered listing is not capped.
  let all = s
    .list_weights(&WeightQuery { animal_id: Some(id), ..Default::default() })
    .await
    .unwrap();
  assert_eq!(all.len(), RECENT_CAP + 6);
}

// ─── Feeds ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn feed_date_defaults_to_today() {
  let s = store().await;

  let id = register(&s, ewe("A-040", 30.0)).await.animal.id;
  let fed = s
    .record_feed(NewFeedRecord {
      animal_id: id,
      feed_type: "hay".into(),
      amount:    1.5,
      feed_date: None,
    })
    .await
    .unwrap();
  assert_eq!(fed.feed_date, chrono::Utc::now().date_naive());

  let feeds = s
    .list_feeds(&FeedQuery { tag_number: Some("A-040".into()) })
    .await
    .unwrap();
  assert_eq!(feeds.len(), 1);
  assert_eq!(feeds[0].record.feed_type, "hay");
  assert_eq!(feeds[0].animal.tag_number, "A-040");
}

#[tokio::test]
async fn feeds_listed_newest_day_first() {
  let s = store().await;

  let id = register(&s, ewe("A-041", 30.0)).await.animal.id;
  for (day, kind) in [("2024-01-02", "hay"), ("2024-01-05", "barley"), ("2024-01-03", "hay")] {
    s.record_feed(NewFeedRecord {
      animal_id: id,
      feed_type: kind.into(),
      amount:    2.0,
      feed_date: Some(croft_core::record::parse_date(day).unwrap()),
    })
    .await
    .unwrap();
  }

  let feeds = s
    .list_feeds(&FeedQuery { tag_number: Some("A-041".into()) })
    .await
    .unwrap();
  let days: Vec<_> = feeds.iter().map(|f| f.record.feed_date.to_string()).collect();
  assert_eq!(days, ["2024-01-05", "2024-01-03", "2024-01-02"]);
}
