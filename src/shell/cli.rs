// CLI command definitions and handlers.
//
// The CLI stands in for the app screens: refresh, browse, queue a photo,
// register. Connection arguments carry env fallbacks so a .env file is enough
// for day-to-day use.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, TimeZone, Utc};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use station_sync::application::query_handlers::station_queries::{StationView, Viewer};
use station_sync::application::sync::outcome::RefreshOutcome;
use station_sync::application::sync::progress::ProgressChannel;
use station_sync::core::catalog::country::CountryCode;
use station_sync::core::catalog::photo::PendingPhoto;
use station_sync::core::catalog::station::Attribution;
use station_sync::core::ports::{RecordStore, RemoteCatalog};

use crate::state::AppState;

#[derive(Parser)]
#[command(name = "station-sync")]
#[command(version, about = "Sync and browse the railway station photo catalog")]
pub struct Cli {
    /// Remote catalog base URL
    #[arg(
        long,
        env = "STATION_SYNC_BASE_URL",
        default_value = "https://api.railway-stations.org"
    )]
    pub base_url: String,

    /// API key sent with registration requests
    #[arg(long, env = "STATION_SYNC_API_KEY")]
    pub api_key: Option<String>,

    /// Path to the local catalog database (defaults to the user data dir)
    #[arg(long, env = "STATION_SYNC_DB")]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the country list and replace the local copy
    RefreshCountries,

    /// Fetch the full station set and replace the local copy
    RefreshStations,

    /// List countries in the local store
    Countries,

    /// List stations in the local store
    Stations {
        /// Only stations without a confirmed photo
        #[arg(long)]
        missing_photo: bool,

        /// Restrict to one country (defaults to STATION_SYNC_COUNTRY)
        #[arg(long)]
        country: Option<String>,
    },

    /// Show one station
    Station {
        /// Station id
        id: i64,
    },

    /// Photographer leaderboard from the remote catalog
    Photographers {
        /// Restrict to one country (defaults to STATION_SYNC_COUNTRY)
        #[arg(long)]
        country: Option<String>,
    },

    /// Queue a local photo file for a station
    SavePhoto {
        /// Station id the photo belongs to
        station_id: i64,

        /// Image file to queue
        path: PathBuf,
    },

    /// Drop all queued local photos
    ClearPhotos,

    /// Show sync freshness and photo coverage
    Status,

    /// Register an account with the remote catalog
    Register,
}

pub async fn refresh_countries(state: &AppState) -> Result<()> {
    let outcome = state.refresh_countries.handle().await?;
    report_outcome("countries", outcome);
    Ok(())
}

pub async fn refresh_stations(state: &AppState) -> Result<()> {
    let (sink, mut rx) = ProgressChannel::new();
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} stations")?
            .progress_chars("█▓░"),
    );

    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            bar.set_length(progress.total);
            bar.set_position(progress.done);
        }
        bar.finish_and_clear();
    });

    // The sink is dropped once the refresh is over, which ends the printer
    // loop in both the success and the failure case.
    let outcome = state.refresh_stations.handle(Arc::new(sink)).await;
    printer.await?;
    report_outcome("stations", outcome?);
    Ok(())
}

pub async fn list_countries(state: &AppState) -> Result<()> {
    let countries = state.country_queries.all().await?;
    for country in &countries {
        println!(
            "{}  {}  [{}]",
            country.code,
            country.name,
            country.license.wire_value()
        );
    }
    println!("{} countries", countries.len());
    Ok(())
}

pub async fn list_stations(
    state: &AppState,
    missing_photo: bool,
    country: Option<String>,
) -> Result<()> {
    let country = country
        .map(CountryCode::new)
        .or_else(|| state.settings.country.clone());
    let mut views = match &country {
        Some(code) => state.station_queries.in_country(code).await?,
        None => state.station_queries.all().await?,
    };
    if missing_photo {
        views.retain(|view| !view.has_photo);
    }

    let viewer = state.settings.viewer();
    for view in &views {
        println!(
            "{:>8}  {}  {}  {}",
            view.id,
            photo_marker(view, &viewer),
            view.country,
            view.name
        );
    }
    println!("{} stations", views.len());
    Ok(())
}

pub async fn show_station(state: &AppState, id: i64) -> Result<()> {
    let Some(view) = state.station_queries.by_id(id).await? else {
        anyhow::bail!("no station with id {id} in the local store");
    };

    println!("{} ({})", view.name, view.country);
    println!("  position   {:.6}, {:.6}", view.latitude, view.longitude);
    if let Some(photo_url) = &view.photo_url {
        match view.attribution(&state.settings.viewer()) {
            Attribution::Mine => println!("  photo      {photo_url} (yours)"),
            Attribution::Other => println!(
                "  photo      {photo_url} (by {})",
                view.photographer.as_deref().unwrap_or("unknown")
            ),
            Attribution::None => println!("  photo      {photo_url}"),
        }
    } else if view.has_photo {
        println!("  photo      queued locally, not confirmed yet");
    } else {
        println!("  photo      none yet");
    }
    Ok(())
}

pub async fn photographers(state: &AppState, country: Option<String>) -> Result<()> {
    let country = country
        .map(CountryCode::new)
        .or_else(|| state.settings.country.clone());
    let leaderboard = state.catalog.fetch_photographers(country.as_ref()).await;
    if leaderboard.is_empty() {
        println!("no photographer data received");
        return Ok(());
    }

    let mut entries: Vec<(String, u64)> = leaderboard.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    for (nickname, count) in entries {
        println!("{count:>6}  {nickname}");
    }
    Ok(())
}

pub async fn save_photo(state: &AppState, station_id: i64, path: &Path) -> Result<()> {
    let Some(view) = state.station_queries.by_id(station_id).await? else {
        anyhow::bail!("no station with id {station_id} in the local store, refresh first");
    };

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let photo = PendingPhoto {
        station_id,
        bytes,
        captured_at: Utc::now().timestamp_millis(),
    };
    state.photo_queue.save(photo).await?;
    println!("queued photo for {} ({station_id})", view.name);
    Ok(())
}

pub async fn clear_photos(state: &AppState) -> Result<()> {
    state.photo_queue.clear_all().await?;
    println!("cleared all queued photos");
    Ok(())
}

pub async fn status(state: &AppState) -> Result<()> {
    let watermark = state.store.watermark().await?;
    match watermark.last_update {
        Some(millis) => println!("last update    {}", format_update_time(millis)),
        None => println!("last update    never"),
    }
    println!(
        "data complete  {}",
        if watermark.data_complete { "yes" } else { "no" }
    );

    let views = state.station_queries.all().await?;
    let missing = views.iter().filter(|view| !view.has_photo).count();
    println!("stations       {} total, {missing} without a photo", views.len());

    let queued = state.store.pending_station_ids().await?.len();
    println!("queued photos  {queued}");
    Ok(())
}

pub async fn register(state: &AppState) -> Result<()> {
    let profile = state.settings.registration_profile()?;
    if state.register_account.handle(profile).await {
        println!("registration accepted, watch your inbox");
        Ok(())
    } else {
        anyhow::bail!("registration was not accepted")
    }
}

fn report_outcome(what: &str, outcome: RefreshOutcome) {
    match outcome {
        RefreshOutcome::Refreshed { imported } => println!("imported {imported} {what}"),
        RefreshOutcome::NoData => println!("no data received, kept the current {what}"),
        RefreshOutcome::Coalesced => println!("another refresh was already running"),
    }
}

fn photo_marker(view: &StationView, viewer: &Viewer) -> &'static str {
    if !view.has_photo {
        return " ";
    }
    match view.attribution(viewer) {
        Attribution::Mine => "●",
        _ => "○",
    }
}

fn format_update_time(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(when) if when.date_naive() == Local::now().date_naive() => {
            format!("today at {}", when.format("%H:%M"))
        }
        Some(when) => when.format("%d.%m.%Y %H:%M").to_string(),
        None => "unknown".to_string(),
    }
}
