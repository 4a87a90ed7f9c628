//! SQL schema for the croft SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// The UNIQUE constraint on `animals.tag_number` is the authoritative
/// duplicate guard; callers' existence pre-checks are an optimization only.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Animal rows are written once and never updated or deleted.
CREATE TABLE IF NOT EXISTS animals (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    tag_number  TEXT NOT NULL UNIQUE,
    species     TEXT NOT NULL,   -- 'SHEEP' | 'LAMB' | 'GOAT' | 'CATTLE' | 'PIG'
    mother_id   INTEGER REFERENCES animals(id),
    birth_date  TEXT,            -- ISO 8601 date or NULL
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    updated_at  TEXT NOT NULL
);

-- Weight records are strictly append-only.
CREATE TABLE IF NOT EXISTS weights (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id   INTEGER NOT NULL REFERENCES animals(id),
    weight      REAL NOT NULL,   -- kilograms
    recorded_at TEXT NOT NULL,   -- RFC 3339 UTC; store-assigned
    notes       TEXT
);

-- Feed records are strictly append-only.
CREATE TABLE IF NOT EXISTS feeds (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id INTEGER NOT NULL REFERENCES animals(id),
    feed_type TEXT NOT NULL,
    amount    REAL NOT NULL,     -- kilograms
    feed_date TEXT NOT NULL      -- ISO 8601 date
);

CREATE INDEX IF NOT EXISTS animals_created_idx  ON animals(created_at);
CREATE INDEX IF NOT EXISTS weights_animal_idx   ON weights(animal_id);
CREATE INDEX IF NOT EXISTS weights_recorded_idx ON weights(recorded_at);
CREATE INDEX IF NOT EXISTS feeds_animal_idx     ON feeds(animal_id);

PRAGMA user_version = 1;
";
