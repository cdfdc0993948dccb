// Wire shapes of the remote catalog API.
//
// Purpose
// - Decode remote payloads strictly: a record missing a required field fails
//   the whole batch, so a partially valid catalog never reaches the store.
//
// Boundaries
// - Conversions into domain records happen here and nowhere else. Country
//   codes are normalized at this boundary.

use serde::{Deserialize, Serialize};

use crate::core::catalog::country::{Country, CountryCode, License};
use crate::core::catalog::station::Station;
use crate::core::ports::RegistrationProfile;

#[derive(Debug, Clone, Deserialize)]
pub struct CountryRecord {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "twitterTags")]
    pub twitter_tags: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
}

impl CountryRecord {
    pub fn into_domain(self) -> Country {
        Country {
            code: CountryCode::new(self.code),
            name: self.name,
            email: self.email,
            twitter_tags: self.twitter_tags,
            license: self
                .license
                .as_deref()
                .and_then(License::from_wire)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    pub id: i64,
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default, rename = "photoUrl")]
    pub photo_url: Option<String>,
}

impl StationRecord {
    pub fn into_domain(self) -> Station {
        Station {
            id: self.id,
            name: self.title,
            latitude: self.lat,
            longitude: self.lon,
            country: CountryCode::new(self.country_code),
            photographer: self.photographer,
            photo_url: self.photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationBody {
    pub nickname: String,
    pub email: String,
    pub license: &'static str,
    #[serde(rename = "photoOwner")]
    pub photo_owner: bool,
    pub linking: String,
    pub link: String,
}

impl RegistrationBody {
    pub fn from_profile(profile: &RegistrationProfile) -> Self {
        Self {
            nickname: profile.nickname.clone(),
            email: profile.email.clone(),
            license: profile.license.wire_value(),
            photo_owner: profile.photo_owner,
            linking: profile.linking.clone().unwrap_or_else(|| "NO".to_string()),
            link: profile.link.clone(),
        }
    }
}
