// Country catalog record.
//
// Purpose
// - Carry the per-country metadata the remote catalog publishes: display name,
//   contact address, social tags and the default photo license.
//
// Responsibilities
// - Normalize the country code exactly once, at construction. Every comparison
//   after that point is plain equality.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Country identifier, lowercased at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Normalization must also hold for codes arriving through serde, so the
// derive is not enough here.
impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(CountryCode::new)
    }
}

/// License under which photos for a country are published.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum License {
    #[default]
    Cc0,
    Cc40,
}

impl License {
    pub fn wire_value(&self) -> &'static str {
        match self {
            License::Cc0 => "CC0",
            License::Cc40 => "CC4.0",
        }
    }

    pub fn from_wire(value: &str) -> Option<License> {
        match value {
            "CC0" => Some(License::Cc0),
            "CC4.0" => Some(License::Cc40),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: CountryCode,
    pub name: String,
    pub email: Option<String>,
    pub twitter_tags: Option<String>,
    pub license: License,
}
