// Pending photo queue over the record store.
//
// Responsibilities
// - Save a captured photo keyed by station id, overwriting an earlier capture
//   for the same station.
// - Serve the capture screen's point lookup.
// - Expose the bulk clear used by the settings surface. The station refresh
//   clears pending photos itself, inside its reconciliation step.

use std::sync::Arc;

use crate::core::catalog::photo::PendingPhoto;
use crate::core::ports::{RecordStore, StoreError};

pub struct PendingPhotoQueue<TStore: RecordStore> {
    store: Arc<TStore>,
}

impl<TStore: RecordStore> PendingPhotoQueue<TStore> {
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, photo: PendingPhoto) -> Result<(), StoreError> {
        tracing::debug!(station_id = photo.station_id, "saving pending photo");
        self.store.upsert_photo(photo).await
    }

    pub async fn photo_for(&self, station_id: i64) -> Result<Option<PendingPhoto>, StoreError> {
        self.store.photo_by_station(station_id).await
    }

    pub async fn clear_all(&self) -> Result<(), StoreError> {
        self.store.remove_all_photos().await
    }
}

#[cfg(test)]
mod pending_photo_queue_tests {
    use super::*;
    use crate::adapters::in_memory::in_memory_record_store::InMemoryRecordStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> PendingPhotoQueue<InMemoryRecordStore> {
        PendingPhotoQueue::new(Arc::new(InMemoryRecordStore::new()))
    }

    fn photo(station_id: i64, bytes: &[u8]) -> PendingPhoto {
        PendingPhoto {
            station_id,
            bytes: bytes.to_vec(),
            captured_at: 1_700_000_000_000,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_save_and_return_a_pending_photo(
        before_each: PendingPhotoQueue<InMemoryRecordStore>,
    ) {
        let queue = before_each;
        queue.save(photo(6005, b"first")).await.unwrap();

        let found = queue.photo_for(6005).await.unwrap();
        assert_eq!(found, Some(photo(6005, b"first")));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_overwrite_an_earlier_capture_for_the_same_station(
        before_each: PendingPhotoQueue<InMemoryRecordStore>,
    ) {
        let queue = before_each;
        queue.save(photo(6005, b"first")).await.unwrap();
        queue.save(photo(6005, b"second")).await.unwrap();

        let found = queue.photo_for(6005).await.unwrap();
        assert_eq!(found, Some(photo(6005, b"second")));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_none_for_a_station_without_a_capture(
        before_each: PendingPhotoQueue<InMemoryRecordStore>,
    ) {
        let queue = before_each;
        assert_eq!(queue.photo_for(9999).await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_clear_all_pending_photos(
        before_each: PendingPhotoQueue<InMemoryRecordStore>,
    ) {
        let queue = before_each;
        queue.save(photo(6005, b"first")).await.unwrap();
        queue.save(photo(8501, b"second")).await.unwrap();

        queue.clear_all().await.unwrap();

        assert_eq!(queue.photo_for(6005).await.unwrap(), None);
        assert_eq!(queue.photo_for(8501).await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_store_failures() {
        let mut store = InMemoryRecordStore::new();
        store.toggle_offline();
        let queue = PendingPhotoQueue::new(Arc::new(store));

        let result = queue.save(photo(6005, b"first")).await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("record store offline")
        );
    }
}
