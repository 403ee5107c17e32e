// src/services/nasa_client.rs
// DOCUMENTATION: NASA Astronomy Picture of the Day client
// PURPOSE: Fetch random recent APOD entries, keeping only images

use crate::errors::ScraperError;
use crate::models::{non_empty, PhotoRecord, SourceKind, DEFAULT_COLOR};
use crate::services::{run_date, HttpClient, PhotoFeed};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

const NASA_BASE_URL: &str = "https://api.nasa.gov";
const ENTRY_COUNT: &str = "10";
const TAGS: &str = "astronomía,espacio,ciencia,nasa";

#[derive(Debug, Deserialize)]
struct ApodEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    explanation: String,
    url: Option<String>,
    hdurl: Option<String>,
    #[serde(default)]
    media_type: String,
    copyright: Option<String>,
    date: Option<String>,
}

pub struct NasaApodClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl NasaApodClient {
    pub fn new(http: HttpClient, api_key: String) -> Self {
        Self::with_base_url(http, api_key, NASA_BASE_URL)
    }

    pub fn with_base_url(http: HttpClient, api_key: String, base_url: &str) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// None for videos and for entries without any usable link
    fn to_record(entry: ApodEntry) -> Option<PhotoRecord> {
        if entry.media_type != "image" {
            log::debug!("Skipping APOD entry '{}' ({})", entry.title, entry.media_type);
            return None;
        }

        let link = non_empty(entry.hdurl.as_deref())
            .or_else(|| non_empty(entry.url.as_deref()))
            .map(str::to_string);
        let Some(link) = link else {
            log::warn!("APOD entry '{}' has no image URL", entry.title);
            return None;
        };

        let date = entry
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or_else(run_date);

        // Copyright lines come with embedded newlines
        let author = non_empty(entry.copyright.as_deref())
            .map(|c| c.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_else(|| "NASA".to_string());

        Some(PhotoRecord {
            source_url: link.clone(),
            image_url: link,
            title: entry.title,
            description: entry.explanation,
            category: "Astronomía".to_string(),
            author,
            source: SourceKind::Nasa,
            tags: TAGS.to_string(),
            date,
            width: 2000,
            height: 1500,
            dominant_color: DEFAULT_COLOR.to_string(),
        })
    }
}

#[async_trait]
impl PhotoFeed for NasaApodClient {
    fn source(&self) -> SourceKind {
        SourceKind::Nasa
    }

    async fn try_fetch(&self) -> Result<Vec<PhotoRecord>, ScraperError> {
        let mut request = self
            .http
            .get(&format!("{}/planetary/apod", self.base_url))
            .query(&[("count", ENTRY_COUNT)]);

        if !self.api_key.is_empty() {
            request = request.query(&[("api_key", self.api_key.as_str())]);
        }

        let entries: Vec<ApodEntry> = self.http.send_ok(request).await?.json().await?;

        Ok(entries.into_iter().filter_map(Self::to_record).collect())
    }
}
