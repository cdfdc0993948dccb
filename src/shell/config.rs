// Account and sync preferences read from the environment.
//
// Responsibilities
// - Everything identity-like lives here: account name, contact email, linked
//   platform, license choice, photo ownership confirmation, preferred country.
// - Connection settings (base URL, API key, database path) are CLI arguments
//   with env fallbacks, declared in cli.rs.

use std::env;
use std::path::PathBuf;

use anyhow::Context;

use station_sync::application::query_handlers::station_queries::Viewer;
use station_sync::core::catalog::country::{CountryCode, License};
use station_sync::core::ports::RegistrationProfile;

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub account_name: Option<String>,
    pub account_email: Option<String>,
    pub account_link: Option<String>,
    pub linking: Option<String>,
    pub license: License,
    pub photo_owner: bool,
    pub country: Option<CountryCode>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            account_name: read("STATION_SYNC_ACCOUNT"),
            account_email: read("STATION_SYNC_EMAIL"),
            account_link: read("STATION_SYNC_LINK"),
            linking: read("STATION_SYNC_LINKING"),
            license: read("STATION_SYNC_LICENSE")
                .and_then(|raw| License::from_wire(&raw))
                .unwrap_or_default(),
            photo_owner: read("STATION_SYNC_PHOTO_OWNER")
                .map(|raw| is_truthy(&raw))
                .unwrap_or(false),
            country: read("STATION_SYNC_COUNTRY").map(CountryCode::new),
        }
    }

    pub fn viewer(&self) -> Viewer {
        Viewer {
            account_name: self.account_name.clone(),
        }
    }

    pub fn registration_profile(&self) -> anyhow::Result<RegistrationProfile> {
        let nickname = self
            .account_name
            .clone()
            .context("STATION_SYNC_ACCOUNT is not set")?;
        let email = self
            .account_email
            .clone()
            .context("STATION_SYNC_EMAIL is not set")?;
        anyhow::ensure!(
            self.photo_owner,
            "set STATION_SYNC_PHOTO_OWNER=true to confirm the photos are your own"
        );
        Ok(RegistrationProfile {
            nickname,
            email,
            license: self.license,
            photo_owner: self.photo_owner,
            linking: self.linking.clone(),
            link: self.account_link.clone().unwrap_or_default(),
        })
    }
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir().context("no user data directory available")?;
    Ok(base.join("station-sync").join("catalog.db"))
}

fn read(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

fn is_truthy(raw: &str) -> bool {
    raw == "1" || raw.eq_ignore_ascii_case("true")
}
