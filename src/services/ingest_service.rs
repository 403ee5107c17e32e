// src/services/ingest_service.rs
// DOCUMENTATION: Persistence of normalized photos
// PURPOSE: Translate, download and upsert every record, isolating per-record failures

use crate::db::ResourceStore;
use crate::errors::ScraperError;
use crate::models::{DailyResource, PhotoRecord, SourceKind};
use crate::services::{AssetDownloader, Translator};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use validator::Validate;

/// Results of one save call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestStats {
    /// Records received
    pub records_received: u32,
    /// Rows written to the table
    pub records_saved: u32,
    /// Records dropped because their image could not be downloaded
    pub downloads_failed: u32,
    /// Records dropped before any side effect
    pub records_invalid: u32,
    /// Records whose upsert failed and was rolled back
    pub records_failed: u32,
    /// Error messages encountered
    pub errors: Vec<String>,
}

/// Name of the stored image file
/// DOCUMENTATION: The ordinal is the record's position in the whole save call,
/// the source prefix keeps names distinct across feeds sharing a date
pub fn asset_filename(source: SourceKind, date: NaiveDate, ordinal: usize) -> String {
    format!("{}_{}_{}.jpg", source.as_str(), date.format("%Y-%m-%d"), ordinal)
}

pub struct IngestService {
    store: Arc<dyn ResourceStore>,
    translator: Translator,
    downloader: AssetDownloader,
    image_dir: PathBuf,
}

impl IngestService {
    pub fn new(
        store: Arc<dyn ResourceStore>,
        translator: Translator,
        downloader: AssetDownloader,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            translator,
            downloader,
            image_dir: image_dir.into(),
        }
    }

    /// Persist a batch of records
    /// DOCUMENTATION: Per record, in order:
    /// 1. Validate
    /// 2. Translate title and description
    /// 3. Download the image to `{source}_{date}_{ordinal}.jpg`, skipping the record on failure
    /// 4. Upsert keyed by (fecha, titulo); a failure only rolls back this record
    ///
    /// Everything saved is committed once at the end
    pub async fn save(&self, records: Vec<PhotoRecord>) -> Result<IngestStats, ScraperError> {
        let mut stats = IngestStats {
            records_received: records.len() as u32,
            ..IngestStats::default()
        };
        let total = records.len();

        let mut batch = self.store.begin().await?;
        let mut written = Vec::new();

        for (ordinal, mut record) in records.into_iter().enumerate() {
            let preview: String = record.title.chars().take(60).collect();
            log::info!("Processing [{}/{}]: {}", ordinal + 1, total, preview);

            if let Err(e) = record.validate() {
                stats.records_invalid += 1;
                let error_msg = format!("Invalid record '{}': {}", preview, e);
                log::warn!("{}", error_msg);
                stats.errors.push(error_msg);
                continue;
            }

            record.title = self.translator.translate(&record.title).await;
            record.description = self.translator.translate(&record.description).await;

            let filename = asset_filename(record.source, record.date, ordinal);
            let path = self.image_dir.join(&filename);
            if !self.downloader.download(&record.image_url, &path).await {
                stats.downloads_failed += 1;
                log::warn!("Could not download image for '{}'. Skipping record.", preview);
                continue;
            }

            let resource = DailyResource::from_record(&record, &filename);
            match batch.upsert(&resource).await {
                Ok(()) => {
                    stats.records_saved += 1;
                    written.push(path);
                }
                Err(e) => {
                    stats.records_failed += 1;
                    let error_msg = format!("Error processing photo '{}': {}", record.title, e);
                    log::error!("{}", error_msg);
                    stats.errors.push(error_msg);
                    remove_asset(&path).await;
                }
            }
        }

        if let Err(e) = batch.commit().await {
            log::error!("Commit failed, discarding {} downloaded images", written.len());
            for path in &written {
                remove_asset(path).await;
            }
            return Err(e);
        }

        log::info!(
            "Save finished. Total photos saved: {} ({} download failures, {} invalid, {} failed)",
            stats.records_saved,
            stats.downloads_failed,
            stats.records_invalid,
            stats.records_failed
        );

        Ok(stats)
    }
}

/// Delete an image whose row was not persisted
async fn remove_asset(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        log::error!("Could not remove orphan image {}: {}", path.display(), e);
    }
}
