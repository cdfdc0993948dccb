// SQLite implementation of the RecordStore port.
//
// Purpose
// - Durable storage for the synced catalog and the pending photo queue.
//
// Responsibilities
// - Run every bulk replace inside one transaction: a failure rolls the whole
//   reconciliation back, leaving the prior stations and pending photos intact.
// - Keep the async executor free by running rusqlite work on the blocking pool.
//
// Boundaries
// - rusqlite errors leave this file as StoreError; the application layer never
//   sees database types.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::adapters::sqlite::schema;
use crate::core::catalog::country::{Country, CountryCode, License};
use crate::core::catalog::photo::PendingPhoto;
use crate::core::catalog::station::Station;
use crate::core::catalog::watermark::SyncWatermark;
use crate::core::ports::{ImportProgress, ProgressSink, RecordStore, StoreError};

impl From<rusqlite::Error> for StoreError {
    fn from(error: rusqlite::Error) -> Self {
        StoreError::Backend(error.to_string())
    }
}

pub struct SqliteRecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| StoreError::Backend(error.to_string()))?;
        }
        let conn = Connection::open(path)?;
        Self::prepare(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, work: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;
            work(&mut guard)
        })
        .await
        .map_err(|error| StoreError::Backend(error.to_string()))?
    }
}

fn country_from_row(row: &Row<'_>) -> rusqlite::Result<Country> {
    let license: String = row.get(4)?;
    Ok(Country {
        code: CountryCode::new(row.get::<_, String>(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        twitter_tags: row.get(3)?,
        license: License::from_wire(&license).unwrap_or_default(),
    })
}

fn station_from_row(row: &Row<'_>) -> rusqlite::Result<Station> {
    Ok(Station {
        id: row.get(0)?,
        name: row.get(1)?,
        latitude: row.get(2)?,
        longitude: row.get(3)?,
        country: CountryCode::new(row.get::<_, String>(4)?),
        photographer: row.get(5)?,
        photo_url: row.get(6)?,
    })
}

#[async_trait::async_trait]
impl RecordStore for SqliteRecordStore {
    async fn replace_all_countries(&self, countries: Vec<Country>) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM countries", [])?;
            {
                let mut statement = tx.prepare(
                    "INSERT INTO countries (code, name, email, twitter_tags, license)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for country in &countries {
                    statement.execute(params![
                        country.code.as_str(),
                        country.name,
                        country.email,
                        country.twitter_tags,
                        country.license.wire_value(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn all_countries(&self) -> Result<Vec<Country>, StoreError> {
        self.with_conn(|conn| {
            let mut statement = conn.prepare(
                "SELECT code, name, email, twitter_tags, license FROM countries ORDER BY code",
            )?;
            let rows = statement.query_map([], country_from_row)?;
            let mut countries = Vec::new();
            for row in rows {
                countries.push(row?);
            }
            Ok(countries)
        })
        .await
    }

    async fn country_by_code(&self, code: &CountryCode) -> Result<Option<Country>, StoreError> {
        let code = code.clone();
        self.with_conn(move |conn| {
            let country = conn
                .query_row(
                    "SELECT code, name, email, twitter_tags, license FROM countries WHERE code = ?1",
                    params![code.as_str()],
                    country_from_row,
                )
                .optional()?;
            Ok(country)
        })
        .await
    }

    async fn reconcile_stations(
        &self,
        stations: Vec<Station>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            let total = stations.len() as u64;
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM pending_photos", [])?;
            tx.execute("DELETE FROM stations", [])?;
            {
                let mut statement = tx.prepare(
                    "INSERT INTO stations (id, name, latitude, longitude, country_code, photographer, photo_url)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                )?;
                for (index, station) in stations.iter().enumerate() {
                    statement.execute(params![
                        station.id,
                        station.name,
                        station.latitude,
                        station.longitude,
                        station.country.as_str(),
                        station.photographer,
                        station.photo_url,
                    ])?;
                    progress.report(ImportProgress {
                        done: index as u64 + 1,
                        total,
                    });
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn all_stations(&self) -> Result<Vec<Station>, StoreError> {
        self.with_conn(|conn| {
            let mut statement = conn.prepare(
                "SELECT id, name, latitude, longitude, country_code, photographer, photo_url
                 FROM stations ORDER BY id",
            )?;
            let rows = statement.query_map([], station_from_row)?;
            let mut stations = Vec::new();
            for row in rows {
                stations.push(row?);
            }
            Ok(stations)
        })
        .await
    }

    async fn station_by_id(&self, id: i64) -> Result<Option<Station>, StoreError> {
        self.with_conn(move |conn| {
            let station = conn
                .query_row(
                    "SELECT id, name, latitude, longitude, country_code, photographer, photo_url
                     FROM stations WHERE id = ?1",
                    params![id],
                    station_from_row,
                )
                .optional()?;
            Ok(station)
        })
        .await
    }

    async fn upsert_photo(&self, photo: PendingPhoto) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO pending_photos (station_id, bytes, captured_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(station_id) DO UPDATE SET bytes = ?2, captured_at = ?3",
                params![photo.station_id, photo.bytes, photo.captured_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn photo_by_station(&self, station_id: i64) -> Result<Option<PendingPhoto>, StoreError> {
        self.with_conn(move |conn| {
            let photo = conn
                .query_row(
                    "SELECT station_id, bytes, captured_at FROM pending_photos WHERE station_id = ?1",
                    params![station_id],
                    |row| {
                        Ok(PendingPhoto {
                            station_id: row.get(0)?,
                            bytes: row.get(1)?,
                            captured_at: row.get(2)?,
                        })
                    },
                )
                .optional()?;
            Ok(photo)
        })
        .await
    }

    async fn pending_station_ids(&self) -> Result<HashSet<i64>, StoreError> {
        self.with_conn(|conn| {
            let mut statement = conn.prepare("SELECT station_id FROM pending_photos")?;
            let rows = statement.query_map([], |row| row.get::<_, i64>(0))?;
            let mut ids = HashSet::new();
            for row in rows {
                ids.insert(row?);
            }
            Ok(ids)
        })
        .await
    }

    async fn remove_all_photos(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM pending_photos", [])?;
            Ok(())
        })
        .await
    }

    async fn watermark(&self) -> Result<SyncWatermark, StoreError> {
        self.with_conn(|conn| {
            let watermark = conn.query_row(
                "SELECT last_update, data_complete FROM sync_state WHERE id = 0",
                [],
                |row| {
                    Ok(SyncWatermark {
                        last_update: row.get(0)?,
                        data_complete: row.get(1)?,
                    })
                },
            )?;
            Ok(watermark)
        })
        .await
    }

    async fn set_watermark(&self, watermark: SyncWatermark) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE sync_state SET last_update = ?1, data_complete = ?2 WHERE id = 0",
                params![watermark.last_update, watermark.data_complete],
            )?;
            Ok(())
        })
        .await
    }
}
