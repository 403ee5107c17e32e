// src/services/photo_feed.rs
// DOCUMENTATION: Common contract of the source adapters
// PURPOSE: Keep one failing source from affecting the others

use crate::errors::ScraperError;
use crate::models::{PhotoRecord, SourceKind};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};

/// A source of daily photos
#[async_trait]
pub trait PhotoFeed: Send + Sync {
    /// Identifier written into every record this feed produces
    fn source(&self) -> SourceKind;

    /// Query the remote API and normalize its response
    async fn try_fetch(&self) -> Result<Vec<PhotoRecord>, ScraperError>;

    /// Fetch all photos; errors are logged and turn into an empty result
    async fn fetch(&self) -> Vec<PhotoRecord> {
        match self.try_fetch().await {
            Ok(photos) => photos,
            Err(e) => {
                log::error!("Error fetching {} photos: {}", self.source(), e);
                Vec::new()
            }
        }
    }
}

/// Date used for records whose source carries none
pub fn run_date() -> NaiveDate {
    Local::now().date_naive()
}

/// Run one search per term, keeping what earlier terms returned when a later one fails
pub(crate) async fn collect_terms<'a, F, Fut>(
    source: SourceKind,
    terms: &'a [&'a str],
    mut search: F,
) -> Result<Vec<PhotoRecord>, ScraperError>
where
    F: FnMut(&'a str) -> Fut,
    Fut: std::future::Future<Output = Result<Vec<PhotoRecord>, ScraperError>>,
{
    let mut photos = Vec::new();

    for &term in terms {
        match search(term).await {
            Ok(batch) => {
                log::debug!("{} '{}': {} photos", source, term, batch.len());
                photos.extend(batch);
            }
            Err(e) if photos.is_empty() => return Err(e),
            Err(e) => {
                log::error!(
                    "Error fetching {} photos for '{}': {}. Keeping {} photos from earlier terms",
                    source,
                    term,
                    e,
                    photos.len()
                );
                break;
            }
        }
    }

    Ok(photos)
}
