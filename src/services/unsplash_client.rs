// src/services/unsplash_client.rs
// DOCUMENTATION: Unsplash search API client
// PURPOSE: Search a fixed list of terms and normalize the photos into PhotoRecord

use crate::errors::ScraperError;
use crate::models::{non_empty, title_case, PhotoRecord, SourceKind, DEFAULT_COLOR};
use crate::services::{collect_terms, run_date, HttpClient, PhotoFeed};
use async_trait::async_trait;
use serde::Deserialize;

const UNSPLASH_BASE_URL: &str = "https://api.unsplash.com";
const SEARCH_TERMS: [&str; 4] = ["nature", "landscape", "wildlife", "astronomy"];
const PER_PAGE: &str = "5";

#[derive(Debug, Deserialize)]
struct UnsplashSearch {
    #[serde(default)]
    results: Vec<UnsplashPhoto>,
}

#[derive(Debug, Deserialize)]
struct UnsplashPhoto {
    links: UnsplashLinks,
    urls: UnsplashUrls,
    alt_description: Option<String>,
    description: Option<String>,
    user: UnsplashUser,
    width: i32,
    height: i32,
    color: Option<String>,
    #[serde(default)]
    tags: Vec<UnsplashTag>,
}

#[derive(Debug, Deserialize)]
struct UnsplashLinks {
    html: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashUrls {
    full: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct UnsplashTag {
    #[serde(default)]
    title: String,
}

pub struct UnsplashClient {
    http: HttpClient,
    access_key: String,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(http: HttpClient, access_key: String) -> Self {
        Self::with_base_url(http, access_key, UNSPLASH_BASE_URL)
    }

    pub fn with_base_url(http: HttpClient, access_key: String, base_url: &str) -> Self {
        Self {
            http,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, term: &str) -> Result<Vec<PhotoRecord>, ScraperError> {
        let request = self
            .http
            .get(&format!("{}/search/photos", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Client-ID {}", self.access_key),
            )
            .query(&[("query", term), ("per_page", PER_PAGE)]);

        let page: UnsplashSearch = self.http.send_ok(request).await?.json().await?;

        Ok(page
            .results
            .into_iter()
            .map(|photo| Self::to_record(term, photo))
            .collect())
    }

    fn to_record(term: &str, photo: UnsplashPhoto) -> PhotoRecord {
        let title = non_empty(photo.alt_description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Fotografía de {}", term));

        let description = non_empty(photo.description.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Fotografía de {} por {}", term, photo.user.name));

        let tags: Vec<&str> = photo
            .tags
            .iter()
            .map(|tag| tag.title.trim())
            .filter(|t| !t.is_empty())
            .collect();
        let tags = if tags.is_empty() {
            term.to_string()
        } else {
            tags.join(",")
        };

        PhotoRecord {
            source_url: photo.links.html,
            image_url: photo.urls.full,
            title,
            description,
            category: title_case(term),
            author: photo.user.name,
            source: SourceKind::Unsplash,
            tags,
            date: run_date(),
            width: photo.width,
            height: photo.height,
            dominant_color: non_empty(photo.color.as_deref())
                .unwrap_or(DEFAULT_COLOR)
                .to_string(),
        }
    }
}

#[async_trait]
impl PhotoFeed for UnsplashClient {
    fn source(&self) -> SourceKind {
        SourceKind::Unsplash
    }

    async fn try_fetch(&self) -> Result<Vec<PhotoRecord>, ScraperError> {
        collect_terms(self.source(), &SEARCH_TERMS, |term| self.search(term)).await
    }
}
