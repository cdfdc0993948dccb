// Ports define what the core needs from the outside world, without implementing it.
//
// Purpose
// - Describe abstract input and output capabilities as traits (for example: RemoteCatalog, RecordStore).
//
// Responsibilities
// - Keep the core independent of any HTTP client or database by coding against traits.
//
// Boundaries
// - No concrete input or output here. Adapters implement these traits in the adapters layer.
// - RemoteCatalog reads return plain collections: transport and parse failures
//   are collapsed into "no data" by the adapter, and the caller keeps its
//   stale local set either way.
// - RecordStore failures stay visible as StoreError. A failed write must not
//   advance the watermark or drop pending photos.
//
// Testing guidance
// - Provide in memory implementations for tests and local development.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::catalog::country::{Country, CountryCode, License};
use crate::core::catalog::photo::PendingPhoto;
use crate::core::catalog::station::Station;
use crate::core::catalog::watermark::SyncWatermark;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),
}

/// Remote-side filter for station reads. `None` fields are left out of the
/// request entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationFilter {
    pub country: Option<CountryCode>,
    pub has_photo: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProfile {
    pub nickname: String,
    pub email: String,
    pub license: License,
    pub photo_owner: bool,
    /// Linked account platform; serialized as the literal "NO" when absent.
    pub linking: Option<String>,
    pub link: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportProgress {
    pub done: u64,
    pub total: u64,
}

/// Receiver for bulk-import progress ticks. Implementations must be cheap:
/// the store calls this once per imported record.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: ImportProgress);
}

impl<TSink: ProgressSink + ?Sized> ProgressSink for Arc<TSink> {
    fn report(&self, progress: ImportProgress) {
        (**self).report(progress);
    }
}

/// Sink for callers that do not observe progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: ImportProgress) {}
}

#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn fetch_countries(&self) -> Vec<Country>;
    async fn fetch_stations(&self, filter: &StationFilter) -> Vec<Station>;
    async fn fetch_photographers(&self, country: Option<&CountryCode>) -> BTreeMap<String, u64>;
    /// True only when the remote side acknowledged the registration.
    async fn submit_registration(&self, profile: &RegistrationProfile) -> bool;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Atomic bulk replace: readers observe the old set or the new set, never a mix.
    async fn replace_all_countries(&self, countries: Vec<Country>) -> Result<(), StoreError>;
    async fn all_countries(&self) -> Result<Vec<Country>, StoreError>;
    async fn country_by_code(&self, code: &CountryCode) -> Result<Option<Country>, StoreError>;

    /// One atomic unit: clear pending photos, replace the full station set,
    /// report one progress tick per inserted station. On failure the prior
    /// stations and pending photos stay intact.
    async fn reconcile_stations(
        &self,
        stations: Vec<Station>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<(), StoreError>;
    async fn all_stations(&self) -> Result<Vec<Station>, StoreError>;
    async fn station_by_id(&self, id: i64) -> Result<Option<Station>, StoreError>;

    async fn upsert_photo(&self, photo: PendingPhoto) -> Result<(), StoreError>;
    async fn photo_by_station(&self, station_id: i64) -> Result<Option<PendingPhoto>, StoreError>;
    async fn pending_station_ids(&self) -> Result<HashSet<i64>, StoreError>;
    async fn remove_all_photos(&self) -> Result<(), StoreError>;

    async fn watermark(&self) -> Result<SyncWatermark, StoreError>;
    async fn set_watermark(&self, watermark: SyncWatermark) -> Result<(), StoreError>;
}
