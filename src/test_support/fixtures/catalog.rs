// Shared test fixtures for catalog records.
//
// The golden JSON under tests/fixtures/ is the single source for example
// records; it enters through the same wire DTOs production payloads use.

use std::fs;

use crate::adapters::http::wire::{CountryRecord, StationRecord};
use crate::core::catalog::country::{Country, CountryCode};
use crate::core::catalog::station::Station;

pub fn fixture_countries() -> Vec<Country> {
    let json = fs::read_to_string("tests/fixtures/countries.json").unwrap();
    let records: Vec<CountryRecord> = serde_json::from_str(&json).unwrap();
    records
        .into_iter()
        .map(CountryRecord::into_domain)
        .collect()
}

pub fn fixture_stations() -> Vec<Station> {
    let json = fs::read_to_string("tests/fixtures/stations.json").unwrap();
    let records: Vec<StationRecord> = serde_json::from_str(&json).unwrap();
    records
        .into_iter()
        .map(StationRecord::into_domain)
        .collect()
}

pub struct StationBuilder {
    inner: Station,
}

impl Default for StationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl StationBuilder {
    pub fn new() -> Self {
        Self {
            inner: fixture_stations().remove(0),
        }
    }

    pub fn id(mut self, v: i64) -> Self {
        self.inner.id = v;
        self
    }

    pub fn name(mut self, v: impl Into<String>) -> Self {
        self.inner.name = v.into();
        self
    }

    pub fn position(mut self, latitude: f64, longitude: f64) -> Self {
        self.inner.latitude = latitude;
        self.inner.longitude = longitude;
        self
    }

    pub fn country(mut self, v: impl AsRef<str>) -> Self {
        self.inner.country = CountryCode::new(v);
        self
    }

    pub fn photographer(mut self, v: Option<&str>) -> Self {
        self.inner.photographer = v.map(String::from);
        self
    }

    pub fn photo_url(mut self, v: Option<&str>) -> Self {
        self.inner.photo_url = v.map(String::from);
        self
    }

    pub fn build(self) -> Station {
        self.inner
    }
}
