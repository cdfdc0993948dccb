// Station refresh orchestration.
//
// Responsibilities
// - Fetch the full, unfiltered station set so every local filter stays derivable.
// - Hand the set to the store as one reconciliation unit (clear pending photos,
//   replace stations) with per-insert progress behind a monotonic guard.
// - Advance the watermark strictly after the bulk write, and only on success.
// - Keep the stale set, the pending photos and the watermark untouched when
//   the fetch produced nothing or the store failed.

use std::sync::Arc;

use chrono::Utc;

use crate::application::errors::RefreshError;
use crate::application::sync::gate::RefreshGate;
use crate::application::sync::outcome::RefreshOutcome;
use crate::application::sync::progress::MonotonicProgress;
use crate::core::catalog::watermark::SyncWatermark;
use crate::core::ports::{ProgressSink, RecordStore, RemoteCatalog, StationFilter};

pub struct RefreshStationsHandler<TCatalog, TStore>
where
    TCatalog: RemoteCatalog,
    TStore: RecordStore,
{
    catalog: Arc<TCatalog>,
    store: Arc<TStore>,
    gate: RefreshGate,
}

impl<TCatalog, TStore> RefreshStationsHandler<TCatalog, TStore>
where
    TCatalog: RemoteCatalog,
    TStore: RecordStore,
{
    pub fn new(catalog: Arc<TCatalog>, store: Arc<TStore>) -> Self {
        Self {
            catalog,
            store,
            gate: RefreshGate::new(),
        }
    }

    pub async fn handle(
        &self,
        progress: Arc<dyn ProgressSink>,
    ) -> Result<RefreshOutcome, RefreshError> {
        let Some(_permit) = self.gate.acquire().await else {
            return Ok(RefreshOutcome::Coalesced);
        };

        let stations = self.catalog.fetch_stations(&StationFilter::default()).await;
        if stations.is_empty() {
            tracing::info!("station refresh produced no data, keeping the current set");
            return Ok(RefreshOutcome::NoData);
        }

        let imported = stations.len() as u64;
        let progress = Arc::new(MonotonicProgress::new(progress));
        self.store.reconcile_stations(stations, progress).await?;

        let now = Utc::now().timestamp_millis();
        self.store
            .set_watermark(SyncWatermark::completed(now))
            .await?;
        tracing::info!(imported, "station refresh complete");
        Ok(RefreshOutcome::Refreshed { imported })
    }
}

#[cfg(test)]
mod refresh_stations_handler_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_catalog::InMemoryCatalog;
    use crate::adapters::in_memory::in_memory_record_store::InMemoryRecordStore;
    use crate::core::catalog::photo::PendingPhoto;
    use crate::core::ports::{ImportProgress, NoProgress};
    use crate::test_support::fixtures::catalog::fixture_stations;
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        ticks: Mutex<Vec<ImportProgress>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, progress: ImportProgress) {
            self.ticks.lock().unwrap().push(progress);
        }
    }

    #[fixture]
    fn before_each() -> (InMemoryCatalog, InMemoryRecordStore) {
        let mut catalog = InMemoryCatalog::new();
        catalog.preset_stations(fixture_stations());
        (catalog, InMemoryRecordStore::new())
    }

    fn pending_photo(station_id: i64) -> PendingPhoto {
        PendingPhoto {
            station_id,
            bytes: vec![0xFF, 0xD8, 0xFF],
            captured_at: 1_700_000_000_000,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_import_the_full_station_set(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (catalog, store) = before_each;
        let store = Arc::new(store);
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::clone(&store));

        let outcome = handler
            .handle(Arc::new(NoProgress))
            .await
            .expect("station refresh failed");

        let expected = fixture_stations();
        assert_eq!(
            outcome,
            RefreshOutcome::Refreshed {
                imported: expected.len() as u64
            }
        );
        assert_eq!(store.all_stations().await.unwrap(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_advance_the_watermark_only_after_a_successful_import(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (catalog, store) = before_each;
        let store = Arc::new(store);
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::clone(&store));

        let before = Utc::now().timestamp_millis();
        handler
            .handle(Arc::new(NoProgress))
            .await
            .expect("station refresh failed");

        let watermark = store.watermark().await.unwrap();
        assert!(watermark.data_complete);
        assert!(watermark.last_update.unwrap() >= before);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_clear_pending_photos_on_a_successful_refresh(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (catalog, store) = before_each;
        let store = Arc::new(store);
        store.upsert_photo(pending_photo(6005)).await.unwrap();
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::clone(&store));

        handler
            .handle(Arc::new(NoProgress))
            .await
            .expect("station refresh failed");

        assert!(store.pending_station_ids().await.unwrap().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_leave_everything_untouched_when_the_fetch_yields_nothing(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (mut catalog, store) = before_each;
        catalog.toggle_fail_fetches();
        let store = Arc::new(store);
        store
            .reconcile_stations(fixture_stations(), Arc::new(NoProgress))
            .await
            .unwrap();
        store.upsert_photo(pending_photo(6005)).await.unwrap();
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::clone(&store));

        let outcome = handler
            .handle(Arc::new(NoProgress))
            .await
            .expect("station refresh failed");

        assert_eq!(outcome, RefreshOutcome::NoData);
        assert_eq!(store.all_stations().await.unwrap(), fixture_stations());
        assert_eq!(
            store.pending_station_ids().await.unwrap(),
            std::collections::HashSet::from([6005])
        );
        assert_eq!(store.watermark().await.unwrap(), SyncWatermark::default());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_keep_the_watermark_and_pending_photos_when_the_store_fails(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (catalog, mut store) = before_each;
        store.upsert_photo(pending_photo(6005)).await.unwrap();
        store.toggle_offline();
        let store = Arc::new(store);
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::clone(&store));

        let result = handler.handle(Arc::new(NoProgress)).await;

        assert!(result.is_err());
        // The offline knob fails writes only, so the aftermath stays inspectable.
        assert_eq!(store.watermark().await.unwrap(), SyncWatermark::default());
        assert_eq!(
            store.pending_station_ids().await.unwrap(),
            std::collections::HashSet::from([6005])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_report_monotonic_progress_up_to_the_total(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (catalog, store) = before_each;
        let sink = Arc::new(RecordingSink::default());
        let handler = RefreshStationsHandler::new(Arc::new(catalog), Arc::new(store));

        handler
            .handle(Arc::clone(&sink) as Arc<dyn ProgressSink>)
            .await
            .expect("station refresh failed");

        let ticks = sink.ticks.lock().unwrap().clone();
        let total = fixture_stations().len() as u64;
        assert!(!ticks.is_empty());
        assert!(ticks.windows(2).all(|pair| pair[0].done <= pair[1].done));
        assert!(ticks.iter().all(|tick| tick.done <= tick.total));
        assert_eq!(ticks.last().unwrap().done, total);
        assert_eq!(ticks.last().unwrap().total, total);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_coalesce_a_second_concurrent_refresh(
        before_each: (InMemoryCatalog, InMemoryRecordStore),
    ) {
        let (mut catalog, store) = before_each;
        catalog.set_fetch_delay_ms(10);
        let catalog = Arc::new(catalog);
        let handler = Arc::new(RefreshStationsHandler::new(
            Arc::clone(&catalog),
            Arc::new(store),
        ));

        let (first, second) = tokio::join!(
            handler.handle(Arc::new(NoProgress)),
            handler.handle(Arc::new(NoProgress))
        );

        let outcomes = [first.unwrap(), second.unwrap()];
        assert!(outcomes.contains(&RefreshOutcome::Coalesced));
        assert!(
            outcomes
                .iter()
                .any(|outcome| matches!(outcome, RefreshOutcome::Refreshed { .. }))
        );
        assert_eq!(catalog.station_fetch_count(), 1);
    }
}
