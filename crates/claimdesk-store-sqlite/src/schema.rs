//! SQL schema for the claimdesk SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for future migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,     -- argon2 PHC string
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS claims (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_nb_tx    TEXT NOT NULL UNIQUE,   -- PREFIX-NNNNN
    claim_title    TEXT NOT NULL,
    description    TEXT NOT NULL DEFAULT '',
    published_url  TEXT NOT NULL DEFAULT '',
    category       TEXT NOT NULL DEFAULT '',
    status         TEXT NOT NULL DEFAULT 'Opened',
    comments       TEXT,
    created_by     INTEGER NOT NULL REFERENCES users(id),
    created_at     TEXT NOT NULL,
    updated_at     TEXT,
    date_published TEXT NOT NULL           -- YYYY-MM-DD
);

-- Highest sequence ever issued per prefix. Survives claim deletion so that
-- numbers are never reused.
CREATE TABLE IF NOT EXISTS claim_sequences (
    prefix      TEXT PRIMARY KEY,
    last_value  INTEGER NOT NULL
);

-- Append-only; rows are deleted individually or with their claim.
CREATE TABLE IF NOT EXISTS validations (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id                 INTEGER NOT NULL REFERENCES claims(id),
    validator_id             INTEGER NOT NULL REFERENCES users(id),
    status                   TEXT NOT NULL,
    notes                    TEXT NOT NULL DEFAULT '',
    ai_generated_full_report TEXT NOT NULL,
    ai_generated_conclusion  TEXT NOT NULL,
    created_at               TEXT NOT NULL
);

-- Append-only; rows are deleted with their claim.
CREATE TABLE IF NOT EXISTS rti_requests (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    claim_id                 INTEGER NOT NULL REFERENCES claims(id),
    validator_id             INTEGER NOT NULL REFERENCES users(id),
    status                   TEXT NOT NULL,
    notes                    TEXT NOT NULL DEFAULT '',
    ai_generated_rti_request TEXT NOT NULL,
    created_at               TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS claims_created_idx     ON claims(created_at);
CREATE INDEX IF NOT EXISTS validations_claim_idx  ON validations(claim_id);
CREATE INDEX IF NOT EXISTS rti_requests_claim_idx ON rti_requests(claim_id);

PRAGMA user_version = 1;
";
