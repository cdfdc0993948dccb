// Binary entry point.
//
// Purpose
// - Wire the HTTP and SQLite adapters into the application handlers and
//   dispatch a single CLI command.

mod cli;
mod config;
mod state;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use station_sync::adapters::http::catalog_client::HttpRemoteCatalog;
use station_sync::adapters::sqlite::sqlite_record_store::SqliteRecordStore;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let Cli {
        base_url,
        api_key,
        database,
        command,
    } = Cli::parse();

    let settings = Settings::from_env();
    let database = match database {
        Some(path) => path,
        None => config::default_database_path()?,
    };

    let store = SqliteRecordStore::open(&database)?;
    let catalog = HttpRemoteCatalog::new(base_url, api_key)?;
    let state = AppState::new(settings, catalog, store);

    match command {
        Commands::RefreshCountries => cli::refresh_countries(&state).await,
        Commands::RefreshStations => cli::refresh_stations(&state).await,
        Commands::Countries => cli::list_countries(&state).await,
        Commands::Stations {
            missing_photo,
            country,
        } => cli::list_stations(&state, missing_photo, country).await,
        Commands::Station { id } => cli::show_station(&state, id).await,
        Commands::Photographers { country } => cli::photographers(&state, country).await,
        Commands::SavePhoto { station_id, path } => {
            cli::save_photo(&state, station_id, &path).await
        }
        Commands::ClearPhotos => cli::clear_photos(&state).await,
        Commands::Status => cli::status(&state).await,
        Commands::Register => cli::register(&state).await,
    }
}
