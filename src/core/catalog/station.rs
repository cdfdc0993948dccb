// Station catalog record.
//
// Purpose
// - Carry one station as published by the remote catalog: identity, position,
//   country membership and the state of its photo.
//
// Responsibilities
// - Hold the attribution rule: whose photo is this, relative to a viewer.
// - Stay free of any local-store concern. Whether a pending local photo exists
//   for a station is merged in by the query layer, not stored here.

use serde::{Deserialize, Serialize};

use crate::core::catalog::country::CountryCode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: CountryCode,
    pub photographer: Option<String>,
    pub photo_url: Option<String>,
}

impl Station {
    pub fn has_remote_photo(&self) -> bool {
        self.photo_url.is_some()
    }

    pub fn attribution(&self, account_name: Option<&str>) -> Attribution {
        Attribution::classify(self.photographer.as_deref(), account_name)
    }
}

/// Classification of a station photo relative to the viewing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    Mine,
    Other,
    None,
}

impl Attribution {
    /// Case-insensitive on both sides; an unset account never matches.
    pub fn classify(photographer: Option<&str>, account_name: Option<&str>) -> Attribution {
        let Some(photographer) = photographer else {
            return Attribution::None;
        };
        match account_name {
            Some(account) if account.to_lowercase() == photographer.to_lowercase() => {
                Attribution::Mine
            }
            _ => Attribution::Other,
        }
    }
}
