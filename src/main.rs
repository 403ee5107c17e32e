// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, logging and database, then run the daily scraper once

mod config;
mod db;
mod errors;
mod models;
mod services;
#[cfg(test)]
mod test_support;

use anyhow::Context;
use config::Config;
use db::{PgResourceStore, ResourceStore};
use services::{
    AssetDownloader, BingClient, GoogleTranslateClient, HttpClient, IngestService,
    NasaApodClient, PexelsClient, PhotoFeed, Pipeline, RetryPolicy, RunOutcome, Translator,
    UnsplashClient,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration (.env included)
    let config = Config::from_env();

    // 2. Initialize logging
    if let Err(e) = config::init_logging(&config) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // 3. Build and execute the run
    match run(&config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("Run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether any photo was obtained
async fn run(config: &Config) -> anyhow::Result<bool> {
    let pool = config::init_db_pool(config)
        .await
        .context("Failed to connect to database")?;
    config::ensure_schema(&pool)
        .await
        .context("Failed to prepare recursos_diarios")?;

    let http = HttpClient::new(RetryPolicy {
        max_retries: config.http_max_retries,
        ..RetryPolicy::default()
    })?;

    let store: Arc<dyn ResourceStore> = Arc::new(PgResourceStore::new(pool));

    // Fixed order: Bing, Pexels, Unsplash, NASA
    let feeds: Vec<Box<dyn PhotoFeed>> = vec![
        Box::new(BingClient::new(http.clone())),
        Box::new(PexelsClient::new(http.clone(), config.pexels_api_key.clone())),
        Box::new(UnsplashClient::new(http.clone(), config.unsplash_access_key.clone())),
        Box::new(NasaApodClient::new(http.clone(), config.nasa_api_key.clone())),
    ];

    let translator = Translator::new(
        Arc::new(GoogleTranslateClient::new(http.clone())),
        config.target_language.clone(),
    );
    let ingest = IngestService::new(
        store.clone(),
        translator,
        AssetDownloader::new(http),
        config.image_dir.clone(),
    );

    let pipeline = Pipeline::new(store, feeds, ingest, config.image_dir.clone());
    let stats = pipeline.run().await?;

    log::info!(
        "Run finished in {}s: {} photos fetched",
        stats.duration_seconds,
        stats.total_fetched()
    );
    if let RunOutcome::Completed(ingest) = &stats.outcome {
        log::info!("{} photos saved", ingest.records_saved);
    }

    Ok(stats.is_success())
}
