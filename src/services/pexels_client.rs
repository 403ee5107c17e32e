// src/services/pexels_client.rs
// DOCUMENTATION: Pexels search API client
// PURPOSE: Search a fixed list of terms and normalize the photos into PhotoRecord

use crate::errors::ScraperError;
use crate::models::{non_empty, title_case, PhotoRecord, SourceKind, DEFAULT_COLOR};
use crate::services::{collect_terms, run_date, HttpClient, PhotoFeed};
use async_trait::async_trait;
use serde::Deserialize;

const PEXELS_BASE_URL: &str = "https://api.pexels.com";
const SEARCH_TERMS: [&str; 5] = ["parking", "garage", "cars", "urban", "city"];
const PER_PAGE: &str = "5";

#[derive(Debug, Deserialize)]
struct PexelsSearch {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    /// Photo page on pexels.com
    url: String,
    photographer: String,
    width: i32,
    height: i32,
    avg_color: Option<String>,
    alt: Option<String>,
    src: PexelsSrc,
}

#[derive(Debug, Deserialize)]
struct PexelsSrc {
    original: String,
}

pub struct PexelsClient {
    http: HttpClient,
    api_key: String,
    base_url: String,
}

impl PexelsClient {
    pub fn new(http: HttpClient, api_key: String) -> Self {
        Self::with_base_url(http, api_key, PEXELS_BASE_URL)
    }

    pub fn with_base_url(http: HttpClient, api_key: String, base_url: &str) -> Self {
        Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn search(&self, term: &str) -> Result<Vec<PhotoRecord>, ScraperError> {
        let mut request = self
            .http
            .get(&format!("{}/v1/search", self.base_url))
            .query(&[("query", term), ("per_page", PER_PAGE)]);

        if !self.api_key.is_empty() {
            request = request.header(reqwest::header::AUTHORIZATION, &self.api_key);
        }

        let page: PexelsSearch = self.http.send_ok(request).await?.json().await?;

        Ok(page
            .photos
            .into_iter()
            .map(|photo| Self::to_record(term, photo))
            .collect())
    }

    fn to_record(term: &str, photo: PexelsPhoto) -> PhotoRecord {
        let title = non_empty(photo.alt.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Fotografía de {}", term));

        PhotoRecord {
            source_url: photo.url,
            image_url: photo.src.original,
            title,
            description: format!("Fotografía de {} por {}", term, photo.photographer),
            category: title_case(term),
            author: photo.photographer,
            source: SourceKind::Pexels,
            tags: format!("{},fotografía", term),
            date: run_date(),
            width: photo.width,
            height: photo.height,
            dominant_color: non_empty(photo.avg_color.as_deref())
                .unwrap_or(DEFAULT_COLOR)
                .to_string(),
        }
    }
}

#[async_trait]
impl PhotoFeed for PexelsClient {
    fn source(&self) -> SourceKind {
        SourceKind::Pexels
    }

    async fn try_fetch(&self) -> Result<Vec<PhotoRecord>, ScraperError> {
        collect_terms(self.source(), &SEARCH_TERMS, |term| self.search(term)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{no_backoff_client, StubServer};
    use actix_web::{web, HttpRequest, HttpResponse};

    const PAGE: &str = r##"{
        "page": 1,
        "per_page": 5,
        "photos": [
            {
                "id": 1,
                "url": "https://www.pexels.com/photo/1/",
                "photographer": "Ana Gómez",
                "width": 4000,
                "height": 3000,
                "avg_color": "#7F7F7F",
                "alt": "Cars parked at night",
                "src": { "original": "https://images.pexels.com/photos/1/original.jpeg" }
            },
            {
                "id": 2,
                "url": "https://www.pexels.com/photo/2/",
                "photographer": "Luis",
                "width": 800,
                "height": 600,
                "avg_color": null,
                "alt": "",
                "src": { "original": "https://images.pexels.com/photos/2/original.jpeg" }
            }
        ]
    }"##;

    /// Answers only when the expected Authorization header is present
    fn search_route(cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/v1/search",
            web::get().to(|req: HttpRequest| async move {
                let authorized = req
                    .headers()
                    .get("Authorization")
                    .map(|v| v == "pexels-key")
                    .unwrap_or(false);
                if !authorized {
                    return HttpResponse::Unauthorized().finish();
                }
                if req.query_string().contains("query=parking") {
                    HttpResponse::Ok().content_type("application/json").body(PAGE)
                } else {
                    HttpResponse::Ok()
                        .content_type("application/json")
                        .body(r#"{"photos": []}"#)
                }
            }),
        );
    }

    #[actix_web::test]
    async fn test_fetch_normalizes_photos() {
        let server = StubServer::start(search_route);
        let client = PexelsClient::with_base_url(
            no_backoff_client(),
            "pexels-key".to_string(),
            &server.base_url(),
        );

        let photos = client.fetch().await;
        server.stop().await;

        assert_eq!(photos.len(), 2);

        let first = &photos[0];
        assert_eq!(first.source, SourceKind::Pexels);
        assert_eq!(first.title, "Cars parked at night");
        assert_eq!(first.description, "Fotografía de parking por Ana Gómez");
        assert_eq!(first.category, "Parking");
        assert_eq!(first.author, "Ana Gómez");
        assert_eq!(first.tags, "parking,fotografía");
        assert_eq!(first.dominant_color, "#7F7F7F");
        assert_eq!((first.width, first.height), (4000, 3000));
        assert_eq!(first.image_url, "https://images.pexels.com/photos/1/original.jpeg");

        let second = &photos[1];
        assert_eq!(second.title, "Fotografía de parking");
        assert_eq!(second.dominant_color, DEFAULT_COLOR);
    }

    #[actix_web::test]
    async fn test_rejected_credentials_yield_empty() {
        let server = StubServer::start(search_route);
        let client =
            PexelsClient::with_base_url(no_backoff_client(), String::new(), &server.base_url());

        assert!(client.fetch().await.is_empty());
        server.stop().await;
    }
}
