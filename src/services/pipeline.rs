// src/services/pipeline.rs
// DOCUMENTATION: Daily ingestion run
// PURPOSE: Clean the previous data set, collect photos from every feed and save them

use crate::db::ResourceStore;
use crate::errors::ScraperError;
use crate::services::{IngestService, IngestStats, PhotoFeed};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Records were handed to the ingest service
    Completed(IngestStats),
    /// Every feed came back empty, nothing was saved
    NothingFetched,
}

/// Run statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Photos obtained per source, in fetch order
    pub fetched: Vec<(String, u32)>,
    pub outcome: RunOutcome,
    pub duration_seconds: u64,
    pub started_at: String,
    pub completed_at: String,
}

impl RunStats {
    pub fn total_fetched(&self) -> u32 {
        self.fetched.iter().map(|(_, n)| n).sum()
    }

    /// A run fails when no source produced anything
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed(_))
    }
}

pub struct Pipeline {
    store: Arc<dyn ResourceStore>,
    feeds: Vec<Box<dyn PhotoFeed>>,
    ingest: IngestService,
    image_dir: PathBuf,
}

impl Pipeline {
    /// Feeds are queried in the order given
    pub fn new(
        store: Arc<dyn ResourceStore>,
        feeds: Vec<Box<dyn PhotoFeed>>,
        ingest: IngestService,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            feeds,
            ingest,
            image_dir: image_dir.into(),
        }
    }

    /// Execute one full run
    /// DOCUMENTATION:
    /// 1. Pre-flight: truncate the table and empty the image directory; any failure aborts
    /// 2. Fetch every feed in order, concatenating results
    /// 3. Save the combined set once, unless it is empty
    pub async fn run(&self) -> Result<RunStats, ScraperError> {
        let start_time = Instant::now();
        let started_at = Utc::now().to_rfc3339();

        log::info!("=== Starting multi-source scraper ===");
        self.preflight().await.map_err(|e| {
            log::error!("Could not clean the environment: {}. Aborting run.", e);
            ScraperError::Preflight(e.to_string())
        })?;

        let mut all_photos = Vec::new();
        let mut fetched = Vec::with_capacity(self.feeds.len());

        for feed in &self.feeds {
            log::info!("Fetching photos from {}...", feed.source());
            let photos = feed.fetch().await;

            if photos.is_empty() {
                log::warn!("No photos obtained from {}", feed.source());
            } else {
                log::info!("Obtained {} photos from {}", photos.len(), feed.source());
            }

            fetched.push((feed.source().to_string(), photos.len() as u32));
            all_photos.extend(photos);
        }

        let outcome = if all_photos.is_empty() {
            log::warn!("No photos obtained from any source");
            RunOutcome::NothingFetched
        } else {
            RunOutcome::Completed(self.ingest.save(all_photos).await?)
        };

        Ok(RunStats {
            fetched,
            outcome,
            duration_seconds: start_time.elapsed().as_secs(),
            started_at,
            completed_at: Utc::now().to_rfc3339(),
        })
    }

    async fn preflight(&self) -> Result<(), ScraperError> {
        log::info!("Removing previous records and image files...");

        self.store.truncate().await?;
        log::info!("Table recursos_diarios emptied");

        let removed = clear_directory(&self.image_dir).await?;
        log::info!("Image directory emptied ({} files removed)", removed);

        Ok(())
    }
}

/// Delete every regular file in `dir`, creating the directory if needed
async fn clear_directory(dir: &Path) -> Result<usize, ScraperError> {
    tokio::fs::create_dir_all(dir).await?;

    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_file() {
            tokio::fs::remove_file(entry.path()).await?;
            removed += 1;
        }
    }

    Ok(removed)
}
