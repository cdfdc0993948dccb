// In memory implementation of the RemoteCatalog port.
//
// Purpose
// - Script remote responses for handler tests and local development.
//
// Responsibilities
// - Serve preset record sets, honoring the station filter the way the remote
//   side would.
// - toggle_fail_fetches simulates the collapsed failure mode: reads come back
//   empty, exactly as the HTTP adapter behaves after a transport error.
// - Count fetches and record submissions so tests can assert call behavior.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::core::catalog::country::{Country, CountryCode};
use crate::core::catalog::station::Station;
use crate::core::ports::{RegistrationProfile, RemoteCatalog, StationFilter};

#[derive(Default)]
pub struct InMemoryCatalog {
    countries: Vec<Country>,
    stations: Vec<Station>,
    photographers: BTreeMap<String, u64>,
    fail_fetches: bool,
    reject_registrations: bool,
    fetch_delay_ms: u64,
    country_fetches: AtomicUsize,
    station_fetches: AtomicUsize,
    submitted: RwLock<Vec<RegistrationProfile>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset_countries(&mut self, countries: Vec<Country>) {
        self.countries = countries;
    }

    pub fn preset_stations(&mut self, stations: Vec<Station>) {
        self.stations = stations;
    }

    pub fn preset_photographers(&mut self, photographers: BTreeMap<String, u64>) {
        self.photographers = photographers;
    }

    pub fn toggle_fail_fetches(&mut self) {
        self.fail_fetches = !self.fail_fetches;
    }

    pub fn toggle_accept_registrations(&mut self) {
        self.reject_registrations = !self.reject_registrations;
    }

    /// Keeps a fetch in flight long enough for a second caller to pile up.
    pub fn set_fetch_delay_ms(&mut self, delay_ms: u64) {
        self.fetch_delay_ms = delay_ms;
    }

    pub fn country_fetch_count(&self) -> usize {
        self.country_fetches.load(Ordering::SeqCst)
    }

    pub fn station_fetch_count(&self) -> usize {
        self.station_fetches.load(Ordering::SeqCst)
    }

    pub async fn submissions(&self) -> Vec<RegistrationProfile> {
        self.submitted.read().await.clone()
    }

    async fn simulate_latency(&self) {
        if self.fetch_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.fetch_delay_ms)).await;
        }
    }
}

#[async_trait::async_trait]
impl RemoteCatalog for InMemoryCatalog {
    async fn fetch_countries(&self) -> Vec<Country> {
        self.country_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_fetches {
            return Vec::new();
        }
        self.countries.clone()
    }

    async fn fetch_stations(&self, filter: &StationFilter) -> Vec<Station> {
        self.station_fetches.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if self.fail_fetches {
            return Vec::new();
        }
        self.stations
            .iter()
            .filter(|station| match &filter.country {
                Some(code) => &station.country == code,
                None => true,
            })
            .filter(|station| match filter.has_photo {
                Some(has_photo) => station.has_remote_photo() == has_photo,
                None => true,
            })
            .cloned()
            .collect()
    }

    async fn fetch_photographers(&self, _country: Option<&CountryCode>) -> BTreeMap<String, u64> {
        self.simulate_latency().await;
        if self.fail_fetches {
            return BTreeMap::new();
        }
        // The preset map stands for whatever scope a test wants; per-country
        // scoping is not simulated.
        self.photographers.clone()
    }

    async fn submit_registration(&self, profile: &RegistrationProfile) -> bool {
        if self.reject_registrations {
            return false;
        }
        self.submitted.write().await.push(profile.clone());
        true
    }
}
