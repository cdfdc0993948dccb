// HTTP implementation of the RemoteCatalog port.
//
// Purpose
// - Talk to the public railway station API over reqwest.
//
// Boundaries
// - Transport failures, non-success statuses and malformed payloads all
//   collapse into the port's "no data" values here. The private request
//   methods keep the real error for the log line, nothing else sees it.
//
// Testing guidance
// - The request builders are pure and covered directly; exchanges over the
//   wire are exercised with the in memory catalog instead.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::adapters::http::wire::{CountryRecord, RegistrationBody, StationRecord};
use crate::core::catalog::country::{Country, CountryCode};
use crate::core::catalog::station::Station;
use crate::core::ports::{RegistrationProfile, RemoteCatalog, StationFilter};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpRemoteCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteCatalog {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("station-sync/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_countries(&self) -> anyhow::Result<Vec<CountryRecord>> {
        let response = self
            .client
            .get(self.endpoint("countries.json"))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get_stations(&self, filter: &StationFilter) -> anyhow::Result<Vec<StationRecord>> {
        let response = self
            .client
            .get(self.endpoint("stations"))
            .query(&station_query(filter))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn get_photographers(
        &self,
        country: Option<&CountryCode>,
    ) -> anyhow::Result<BTreeMap<String, u64>> {
        let response = self
            .client
            .get(self.endpoint("photographers"))
            .query(&photographer_query(country))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn post_registration(&self, profile: &RegistrationProfile) -> anyhow::Result<StatusCode> {
        let mut request = self
            .client
            .post(self.endpoint("registration"))
            .json(&RegistrationBody::from_profile(profile));
        if let Some(key) = &self.api_key {
            request = request.header("API-Key", key);
        }
        Ok(request.send().await?.status())
    }
}

fn station_query(filter: &StationFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(code) = &filter.country {
        params.push(("country", code.as_str().to_string()));
    }
    if let Some(has_photo) = filter.has_photo {
        params.push(("hasPhoto", has_photo.to_string()));
    }
    params
}

fn photographer_query(country: Option<&CountryCode>) -> Vec<(&'static str, String)> {
    match country {
        Some(code) => vec![("country", code.as_str().to_string())],
        None => Vec::new(),
    }
}

#[async_trait]
impl RemoteCatalog for HttpRemoteCatalog {
    async fn fetch_countries(&self) -> Vec<Country> {
        match self.get_countries().await {
            Ok(records) => records
                .into_iter()
                .map(CountryRecord::into_domain)
                .collect(),
            Err(error) => {
                tracing::warn!(%error, "country fetch failed, treating as no data");
                Vec::new()
            }
        }
    }

    async fn fetch_stations(&self, filter: &StationFilter) -> Vec<Station> {
        match self.get_stations(filter).await {
            Ok(records) => records
                .into_iter()
                .map(StationRecord::into_domain)
                .collect(),
            Err(error) => {
                tracing::warn!(%error, "station fetch failed, treating as no data");
                Vec::new()
            }
        }
    }

    async fn fetch_photographers(&self, country: Option<&CountryCode>) -> BTreeMap<String, u64> {
        match self.get_photographers(country).await {
            Ok(photographers) => photographers,
            Err(error) => {
                tracing::warn!(%error, "photographer fetch failed, treating as no data");
                BTreeMap::new()
            }
        }
    }

    async fn submit_registration(&self, profile: &RegistrationProfile) -> bool {
        match self.post_registration(profile).await {
            Ok(StatusCode::ACCEPTED) => true,
            Ok(status) => {
                tracing::warn!(%status, "registration not accepted");
                false
            }
            Err(error) => {
                tracing::warn!(%error, "registration request failed");
                false
            }
        }
    }
}
