// This module groups the station catalog domain records.
//
// Structure
// - country.rs: Country record, normalized CountryCode, photo License
// - station.rs: Station record and photo Attribution
// - photo.rs: locally captured PendingPhoto
// - watermark.rs: freshness marker for the synced station set

pub mod country;
pub mod photo;
pub mod station;
pub mod watermark;
