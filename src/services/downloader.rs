// src/services/downloader.rs
// DOCUMENTATION: Image asset downloader
// PURPOSE: Stream a remote image to disk, never leaving partial files behind

use crate::errors::ScraperError;
use crate::services::HttpClient;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use uuid::Uuid;

/// Bound on the whole request, body included
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const CHUNK_SIZE: usize = 8192;

pub struct AssetDownloader {
    http: HttpClient,
}

impl AssetDownloader {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Download `url` into `destination`
    /// DOCUMENTATION: Returns false on network errors, non-2xx statuses and
    /// non-image content; the destination is only created on success
    pub async fn download(&self, url: &str, destination: &Path) -> bool {
        match self.try_download(url, destination).await {
            Ok(bytes) => {
                log::debug!("Saved {} ({} bytes)", destination.display(), bytes);
                true
            }
            Err(ScraperError::NotAnImage { content_type }) => {
                log::warn!("URL is not an image: {} (type: {})", url, content_type);
                false
            }
            Err(e) => {
                log::error!("Error downloading image {}: {}", url, e);
                false
            }
        }
    }

    async fn try_download(&self, url: &str, destination: &Path) -> Result<u64, ScraperError> {
        let request = self.http.get(url).timeout(DOWNLOAD_TIMEOUT);
        let mut response = self.http.send_ok(request).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.to_ascii_lowercase().starts_with("image/") {
            return Err(ScraperError::NotAnImage { content_type });
        }

        let partial = partial_path(destination);
        let written = async {
            let file = File::create(&partial).await?;
            let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
            let mut written = 0u64;
            while let Some(chunk) = response.chunk().await? {
                writer.write_all(&chunk).await?;
                written += chunk.len() as u64;
            }
            writer.flush().await?;
            fs::rename(&partial, destination).await?;
            Ok::<u64, ScraperError>(written)
        }
        .await;

        if written.is_err() {
            // The partial file may not exist if creation itself failed
            let _ = fs::remove_file(&partial).await;
        }
        written
    }
}

/// Hidden sibling of the destination used while the body is streaming
fn partial_path(destination: &Path) -> PathBuf {
    let name = format!(".{}.part", Uuid::new_v4());
    destination.with_file_name(name)
}
