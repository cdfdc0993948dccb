// Read-only station views over the record store.
//
// Purpose
// - Serve the listing and detail screens without exposing store internals.
//
// Responsibilities
// - Merge pending local photos into the photo status: a station counts as
//   photographed when the remote lists a photo URL or a pending capture exists.
// - Classify attribution against an explicit viewer, never ambient state.
//
// Boundaries
// - No writes, no network. Every call reads the current store state.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::catalog::country::CountryCode;
use crate::core::catalog::station::{Attribution, Station};
use crate::core::ports::{RecordStore, StoreError};

/// The account on whose behalf views are rendered. Passed in by the shell;
/// an unset name means "browsing anonymously".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    pub account_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StationView {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: CountryCode,
    pub photographer: Option<String>,
    pub photo_url: Option<String>,
    pub has_photo: bool,
}

impl StationView {
    fn new(station: Station, pending: &HashSet<i64>) -> Self {
        let has_photo = station.has_remote_photo() || pending.contains(&station.id);
        Self {
            id: station.id,
            name: station.name,
            latitude: station.latitude,
            longitude: station.longitude,
            country: station.country,
            photographer: station.photographer,
            photo_url: station.photo_url,
            has_photo,
        }
    }

    pub fn attribution(&self, viewer: &Viewer) -> Attribution {
        Attribution::classify(self.photographer.as_deref(), viewer.account_name.as_deref())
    }
}

pub struct StationQueries<TStore: RecordStore> {
    store: Arc<TStore>,
}

impl<TStore: RecordStore> StationQueries<TStore> {
    pub fn new(store: Arc<TStore>) -> Self {
        Self { store }
    }

    pub async fn all(&self) -> Result<Vec<StationView>, StoreError> {
        let pending = self.store.pending_station_ids().await?;
        let stations = self.store.all_stations().await?;
        Ok(stations
            .into_iter()
            .map(|station| StationView::new(station, &pending))
            .collect())
    }

    pub async fn without_confirmed_photo(&self) -> Result<Vec<StationView>, StoreError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|view| !view.has_photo)
            .collect())
    }

    pub async fn in_country(&self, code: &CountryCode) -> Result<Vec<StationView>, StoreError> {
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|view| &view.country == code)
            .collect())
    }

    pub async fn by_id(&self, id: i64) -> Result<Option<StationView>, StoreError> {
        let Some(station) = self.store.station_by_id(id).await? else {
            return Ok(None);
        };
        let pending = self.store.pending_station_ids().await?;
        Ok(Some(StationView::new(station, &pending)))
    }
}
