// In memory implementation of the RecordStore port.
//
// Purpose
// - Support handler and query tests and local development without a database.
//
// Responsibilities
// - Keep every record set behind one RwLock so readers observe the old set or
//   the new set during a reconcile, never a partial one.
// - toggle_offline fails write operations; reads keep working so tests can
//   inspect the aftermath of a failed refresh.
// - set_reconcile_delay_ms stretches the reconcile write section, which lets
//   tests race readers against it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::core::catalog::country::{Country, CountryCode};
use crate::core::catalog::photo::PendingPhoto;
use crate::core::catalog::station::Station;
use crate::core::catalog::watermark::SyncWatermark;
use crate::core::ports::{ImportProgress, ProgressSink, RecordStore, StoreError};

#[derive(Default)]
struct Records {
    countries: Vec<Country>,
    stations: Vec<Station>,
    photos: HashMap<i64, PendingPhoto>,
    watermark: SyncWatermark,
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Records>,
    is_offline: bool,
    reconcile_delay_ms: u64,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub fn set_reconcile_delay_ms(&mut self, delay_ms: u64) {
        self.reconcile_delay_ms = delay_ms;
    }

    fn write_guarded(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Backend("record store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn replace_all_countries(&self, countries: Vec<Country>) -> Result<(), StoreError> {
        self.write_guarded()?;
        let mut records = self.records.write().await;
        records.countries = countries;
        records.countries.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(())
    }

    async fn all_countries(&self) -> Result<Vec<Country>, StoreError> {
        Ok(self.records.read().await.countries.clone())
    }

    async fn country_by_code(&self, code: &CountryCode) -> Result<Option<Country>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .countries
            .iter()
            .find(|country| &country.code == code)
            .cloned())
    }

    async fn reconcile_stations(
        &self,
        stations: Vec<Station>,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<(), StoreError> {
        self.write_guarded()?;
        let mut records = self.records.write().await;
        if self.reconcile_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.reconcile_delay_ms)).await;
        }
        records.photos.clear();
        records.stations.clear();
        let total = stations.len() as u64;
        for (index, station) in stations.into_iter().enumerate() {
            records.stations.push(station);
            progress.report(ImportProgress {
                done: index as u64 + 1,
                total,
            });
        }
        records.stations.sort_by_key(|station| station.id);
        Ok(())
    }

    async fn all_stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.records.read().await.stations.clone())
    }

    async fn station_by_id(&self, id: i64) -> Result<Option<Station>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .stations
            .iter()
            .find(|station| station.id == id)
            .cloned())
    }

    async fn upsert_photo(&self, photo: PendingPhoto) -> Result<(), StoreError> {
        self.write_guarded()?;
        self.records
            .write()
            .await
            .photos
            .insert(photo.station_id, photo);
        Ok(())
    }

    async fn photo_by_station(&self, station_id: i64) -> Result<Option<PendingPhoto>, StoreError> {
        Ok(self.records.read().await.photos.get(&station_id).cloned())
    }

    async fn pending_station_ids(&self) -> Result<HashSet<i64>, StoreError> {
        Ok(self.records.read().await.photos.keys().copied().collect())
    }

    async fn remove_all_photos(&self) -> Result<(), StoreError> {
        self.write_guarded()?;
        self.records.write().await.photos.clear();
        Ok(())
    }

    async fn watermark(&self) -> Result<SyncWatermark, StoreError> {
        Ok(self.records.read().await.watermark)
    }

    async fn set_watermark(&self, watermark: SyncWatermark) -> Result<(), StoreError> {
        self.write_guarded()?;
        self.records.write().await.watermark = watermark;
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_record_store_tests {
    use super::*;
    use crate::core::ports::NoProgress;
    use crate::test_support::fixtures::catalog::{fixture_countries, fixture_stations};
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> InMemoryRecordStore {
        InMemoryRecordStore::new()
    }

    fn pending(station_id: i64) -> PendingPhoto {
        PendingPhoto {
            station_id,
            bytes: vec![1, 2, 3],
            captured_at: 1_700_000_000_000,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_store_countries_sorted_by_code(before_each: InMemoryRecordStore) {
        let store = before_each;
        let mut reversed = fixture_countries();
        reversed.reverse();

        store.replace_all_countries(reversed).await.unwrap();

        assert_eq!(store.all_countries().await.unwrap(), fixture_countries());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reconcile_stations_and_clear_pending_photos(
        before_each: InMemoryRecordStore,
    ) {
        let store = before_each;
        store.upsert_photo(pending(6005)).await.unwrap();

        store
            .reconcile_stations(fixture_stations(), Arc::new(NoProgress))
            .await
            .unwrap();

        assert_eq!(store.all_stations().await.unwrap(), fixture_stations());
        assert!(store.pending_station_ids().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_writes_when_offline_but_keep_reads(
        before_each: InMemoryRecordStore,
    ) {
        let mut store = before_each;
        store
            .replace_all_countries(fixture_countries())
            .await
            .unwrap();
        store.toggle_offline();

        let result = store.replace_all_countries(Vec::new()).await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("record store offline")
        );
        assert_eq!(store.all_countries().await.unwrap(), fixture_countries());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_never_expose_a_partial_station_set_during_a_reconcile(
        before_each: InMemoryRecordStore,
    ) {
        let mut store = before_each;
        store
            .reconcile_stations(fixture_stations(), Arc::new(NoProgress))
            .await
            .unwrap();
        store.set_reconcile_delay_ms(20);
        let store = Arc::new(store);

        let replacement = vec![fixture_stations().remove(0)];
        let (write_result, observed) = tokio::join!(
            store.reconcile_stations(replacement.clone(), Arc::new(NoProgress)),
            async {
                // Starts while the write lock is held, so it must wait and
                // then observe the complete new set.
                tokio::time::sleep(Duration::from_millis(5)).await;
                store.all_stations().await.unwrap()
            }
        );

        write_result.unwrap();
        assert_eq!(observed, replacement);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_watermark_until_it_is_set(before_each: InMemoryRecordStore) {
        let store = before_each;
        assert_eq!(store.watermark().await.unwrap(), SyncWatermark::default());

        store
            .set_watermark(SyncWatermark::completed(1_700_000_000_000))
            .await
            .unwrap();

        assert_eq!(
            store.watermark().await.unwrap(),
            SyncWatermark::completed(1_700_000_000_000)
        );
    }
}
