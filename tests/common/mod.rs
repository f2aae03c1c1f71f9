#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use ticket_booking::{
    config::Config,
    models::{BookingId, CredentialRef, SeatGrid},
    services::{
        catalog::MovieSeed,
        credentials::{CredentialIssuer, IssuanceError},
        CatalogSeed, FileCredentialIssuer,
    },
    AppState,
};

pub struct TestApp {
    pub state: Arc<AppState>,
    // Keeps issued credential files alive for the test
    pub dir: TempDir,
}

/// Issuer that always fails, standing in for a broken printer or disk.
pub struct FailingIssuer;

#[async_trait]
impl CredentialIssuer for FailingIssuer {
    async fn issue(&self, _booking_id: &BookingId) -> Result<CredentialRef, IssuanceError> {
        Err(IssuanceError::Rejected("printer offline".to_string()))
    }
}

/// One city, one cinema, one studio, two showings (ids 1 and 2).
pub fn small_seed() -> CatalogSeed {
    let movie = |title: &str, day: u32| MovieSeed {
        title: title.to_string(),
        genre: "Action".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 12, day).unwrap(),
        time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
    };
    CatalogSeed {
        cities: vec!["Bandung".to_string()],
        cinemas: vec!["CGV".to_string()],
        studios_per_cinema: 1,
        movies: vec![movie("The Great Adventure", 20), movie("Comedy Hour", 24)],
    }
}

pub async fn app_with(config: Config, seed: &CatalogSeed) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let issuer = Arc::new(FileCredentialIssuer::new(dir.path()));
    let state = AppState::with_issuer(config, seed, issuer).await.unwrap();
    TestApp { state, dir }
}

pub async fn app() -> TestApp {
    app_with(Config::in_memory(), &small_seed()).await
}

pub async fn full_catalog_app() -> TestApp {
    app_with(Config::in_memory(), &CatalogSeed::default()).await
}

pub async fn failing_issuer_app() -> Arc<AppState> {
    AppState::with_issuer(Config::in_memory(), &small_seed(), Arc::new(FailingIssuer))
        .await
        .unwrap()
}

fn file_config(dir: &Path, pool_size: u32, grid: SeatGrid) -> Config {
    let mut config = Config::default();
    config.database.url = format!("sqlite://{}", dir.join("booking.db").display());
    config.database.pool_size = pool_size;
    config.booking.grid = grid;
    config.credentials.output_dir = dir.to_path_buf();
    config
}

/// File-backed store with a real connection pool, for concurrency tests.
pub async fn pooled_app(pool_size: u32) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let state = open_file_app(dir.path(), pool_size, SeatGrid::default()).await;
    TestApp { state, dir }
}

/// Opens (and on first use seeds) the store kept in `dir`, configured with
/// `grid`. Reopening an existing store leaves its catalog untouched.
pub async fn open_file_app(dir: &Path, pool_size: u32, grid: SeatGrid) -> Arc<AppState> {
    let issuer = Arc::new(FileCredentialIssuer::new(dir));
    AppState::with_issuer(file_config(dir, pool_size, grid), &small_seed(), issuer)
        .await
        .unwrap()
}
