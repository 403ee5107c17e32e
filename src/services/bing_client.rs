// src/services/bing_client.rs
// DOCUMENTATION: Bing "image of the day" archive client
// PURPOSE: Fetch the latest wallpapers and normalize them into PhotoRecord

use crate::errors::ScraperError;
use crate::models::{PhotoRecord, SourceKind, DEFAULT_COLOR};
use crate::services::{run_date, HttpClient, PhotoFeed};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;

const BING_BASE_URL: &str = "https://www.bing.com";
const IMAGE_COUNT: &str = "8";
const MARKET: &str = "en-US";
const TAGS: &str = "paisaje,naturaleza,fotografía del día";

/// Response of HPImageArchive.aspx?format=js
#[derive(Debug, Deserialize)]
struct BingArchive {
    #[serde(default)]
    images: Vec<BingImage>,
}

#[derive(Debug, Deserialize)]
struct BingImage {
    /// Path relative to the Bing host
    url: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    copyright: String,
    /// Publication day as YYYYMMDD
    startdate: Option<String>,
}

pub struct BingClient {
    http: HttpClient,
    base_url: String,
}

impl BingClient {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, BING_BASE_URL)
    }

    pub fn with_base_url(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn to_record(&self, host: &Url, image: BingImage) -> Result<PhotoRecord, ScraperError> {
        let image_url = host
            .join(&image.url)
            .map_err(|e| ScraperError::Parse(format!("Bad image path {}: {}", image.url, e)))?;

        let search_url = host
            .join("/search")
            .and_then(|url| Url::parse_with_params(url.as_str(), &[("q", image.title.as_str())]))
            .map_err(|e| ScraperError::Parse(format!("Bad search URL: {}", e)))?;

        let date = image
            .startdate
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y%m%d").ok())
            .unwrap_or_else(run_date);

        Ok(PhotoRecord {
            source_url: search_url.to_string(),
            image_url: image_url.to_string(),
            title: image.title,
            description: image.copyright,
            category: "Paisaje".to_string(),
            author: "Bing".to_string(),
            source: SourceKind::Bing,
            tags: TAGS.to_string(),
            date,
            width: 1920,
            height: 1080,
            dominant_color: DEFAULT_COLOR.to_string(),
        })
    }
}

#[async_trait]
impl PhotoFeed for BingClient {
    fn source(&self) -> SourceKind {
        SourceKind::Bing
    }

    async fn try_fetch(&self) -> Result<Vec<PhotoRecord>, ScraperError> {
        let host = Url::parse(&self.base_url)
            .map_err(|e| ScraperError::Config(format!("Bad Bing URL: {}", e)))?;

        let request = self
            .http
            .get(&format!("{}/HPImageArchive.aspx", self.base_url))
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .query(&[("format", "js"), ("idx", "0"), ("n", IMAGE_COUNT), ("mkt", MARKET)]);

        let archive: BingArchive = self.http.send_ok(request).await?.json().await?;

        Ok(archive
            .images
            .into_iter()
            .filter_map(|image| match self.to_record(&host, image) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping Bing image: {}", e);
                    None
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{json_route, no_backoff_client, StubServer};

    const ARCHIVE: &str = r#"{
        "images": [
            {
                "startdate": "20261013",
                "url": "/th?id=OHR.Fjord_EN-US123_1920x1080.jpg&rf=LaDigue_1920x1080.jpg",
                "title": "Fjord at dawn",
                "copyright": "Geirangerfjord, Norway (© Someone)"
            },
            {
                "url": "/th?id=OHR.Dunes_EN-US456_1920x1080.jpg"
            }
        ]
    }"#;

    #[actix_web::test]
    async fn test_fetch_normalizes_archive() {
        let server = StubServer::start(|cfg| json_route(cfg, "/HPImageArchive.aspx", ARCHIVE));
        let base = server.base_url();
        let client = BingClient::with_base_url(no_backoff_client(), &base);

        let photos = client.fetch().await;
        server.stop().await;

        assert_eq!(photos.len(), 2);
        let first = &photos[0];
        assert_eq!(first.source, SourceKind::Bing);
        assert_eq!(first.title, "Fjord at dawn");
        assert_eq!(first.category, "Paisaje");
        assert_eq!(first.author, "Bing");
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 10, 13).unwrap());
        assert!(first.image_url.starts_with(&base));
        assert!(first.image_url.contains("/th?id=OHR.Fjord"));
        assert!(first.source_url.contains("/search?q=Fjord"));
        assert_eq!((first.width, first.height), (1920, 1080));

        // Missing title, copyright and date take their fallbacks
        let second = &photos[1];
        assert_eq!(second.title, "");
        assert_eq!(second.description, "");
        assert_eq!(second.date, run_date());
    }

    #[actix_web::test]
    async fn test_bad_image_path_skips_only_that_image() {
        let server = StubServer::start(|cfg| {
            json_route(
                cfg,
                "/HPImageArchive.aspx",
                r#"{"images": [
                    {"url": "//[broken/th.jpg", "title": "Broken"},
                    {"url": "/th?id=OHR.Dunes_EN-US456_1920x1080.jpg", "title": "Dunes"}
                ]}"#,
            )
        });
        let client = BingClient::with_base_url(no_backoff_client(), &server.base_url());

        let photos = client.fetch().await;
        server.stop().await;

        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].title, "Dunes");
    }

    #[actix_web::test]
    async fn test_malformed_response_is_empty() {
        let server = StubServer::start(|cfg| json_route(cfg, "/HPImageArchive.aspx", "<html>"));
        let client = BingClient::with_base_url(no_backoff_client(), &server.base_url());

        assert!(client.fetch().await.is_empty());
        server.stop().await;
    }

    #[actix_web::test]
    async fn test_unreachable_host_is_empty() {
        // Port 9 (discard) is closed on test machines
        let client = BingClient::with_base_url(
            crate::services::HttpClient::new(crate::services::RetryPolicy {
                max_retries: 0,
                backoff_factor: std::time::Duration::ZERO,
            })
            .unwrap(),
            "http://127.0.0.1:9",
        );

        assert!(client.fetch().await.is_empty());
    }
}
