// Table layout of the local catalog database.
//
// sync_state is a single-row table (id fixed to 0) seeded on creation, so
// reads never have to handle a missing row.

use rusqlite::Connection;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS countries (
    code         TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    email        TEXT,
    twitter_tags TEXT,
    license      TEXT NOT NULL DEFAULT 'CC0'
);

CREATE TABLE IF NOT EXISTS stations (
    id           INTEGER PRIMARY KEY,
    name         TEXT NOT NULL,
    latitude     REAL NOT NULL,
    longitude    REAL NOT NULL,
    country_code TEXT NOT NULL,
    photographer TEXT,
    photo_url    TEXT
);

CREATE INDEX IF NOT EXISTS idx_stations_country ON stations(country_code);

CREATE TABLE IF NOT EXISTS pending_photos (
    station_id  INTEGER PRIMARY KEY,
    bytes       BLOB NOT NULL,
    captured_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_state (
    id            INTEGER PRIMARY KEY CHECK (id = 0),
    last_update   INTEGER,
    data_complete INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO sync_state (id, last_update, data_complete) VALUES (0, NULL, 0);
";

pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
