// Country refresh orchestration.
//
// Responsibilities
// - Fetch the country set from the remote catalog.
// - Replace the locally stored set atomically when the fetch produced data.
// - Keep the stale set when the fetch produced nothing; that is not an error.
// - Never touch the sync watermark. Only the station refresh owns it.

use std::sync::Arc;

use crate::application::errors::RefreshError;
use crate::application::sync::gate::RefreshGate;
use crate::application::sync::outcome::RefreshOutcome;
use crate::core::ports::{RecordStore, RemoteCatalog};

pub struct RefreshCountriesHandler<TCatalog, TStore>
where
    TCatalog: RemoteCatalog,
    TStore: RecordStore,
{
    catalog: Arc<TCatalog>,
    store: Arc<TStore>,
    gate: RefreshGate,
}

impl<TCatalog, TStore> RefreshCountriesHandler<TCatalog, TStore>
where
    TCatalog: RemoteCatalog,
    TStore: RecordStore,
{
    pub fn new(catalog: Arc<TCatalog>, store: Arc<TStore>) -> Self {
        Self {
            catalog,
            store,
            gate: RefreshGate::new(),
        }
    }

    pub async fn handle(&self) -> Result<RefreshOutcome, RefreshError> {
        let Some(_permit) = self.gate.acquire().await else {
            return Ok(RefreshOutcome::Coalesced);
        };

        let countries = self.catalog.fetch_countries().await;
        if countries.is_empty() {
            tracing::info!("country refresh produced no data, keeping the current set");
            return Ok(RefreshOutcome::NoData);
        }

        let imported = countries.len() as u64;
        self.store.replace_all_countries(countries).await?;
        tracing::info!(imported, "country refresh complete");
        Ok(RefreshOutcome::Refreshed { imported })
    }
}
