// Composition root: wires the HTTP catalog and the SQLite store into the
// application handlers once, at startup.

use std::sync::Arc;

use station_sync::adapters::http::catalog_client::HttpRemoteCatalog;
use station_sync::adapters::sqlite::sqlite_record_store::SqliteRecordStore;
use station_sync::application::command_handlers::pending_photo_queue::PendingPhotoQueue;
use station_sync::application::command_handlers::register_account_handler::RegisterAccountHandler;
use station_sync::application::query_handlers::country_queries::CountryQueries;
use station_sync::application::query_handlers::station_queries::StationQueries;
use station_sync::application::sync::refresh_countries_handler::RefreshCountriesHandler;
use station_sync::application::sync::refresh_stations_handler::RefreshStationsHandler;

use crate::config::Settings;

pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<HttpRemoteCatalog>,
    pub store: Arc<SqliteRecordStore>,
    pub refresh_countries: RefreshCountriesHandler<HttpRemoteCatalog, SqliteRecordStore>,
    pub refresh_stations: RefreshStationsHandler<HttpRemoteCatalog, SqliteRecordStore>,
    pub station_queries: StationQueries<SqliteRecordStore>,
    pub country_queries: CountryQueries<SqliteRecordStore>,
    pub photo_queue: PendingPhotoQueue<SqliteRecordStore>,
    pub register_account: RegisterAccountHandler<HttpRemoteCatalog>,
}

impl AppState {
    pub fn new(settings: Settings, catalog: HttpRemoteCatalog, store: SqliteRecordStore) -> Self {
        let catalog = Arc::new(catalog);
        let store = Arc::new(store);
        Self {
            settings,
            refresh_countries: RefreshCountriesHandler::new(
                Arc::clone(&catalog),
                Arc::clone(&store),
            ),
            refresh_stations: RefreshStationsHandler::new(
                Arc::clone(&catalog),
                Arc::clone(&store),
            ),
            station_queries: StationQueries::new(Arc::clone(&store)),
            country_queries: CountryQueries::new(Arc::clone(&store)),
            photo_queue: PendingPhotoQueue::new(Arc::clone(&store)),
            register_account: RegisterAccountHandler::new(Arc::clone(&catalog)),
            catalog,
            store,
        }
    }
}
