// src/models/photo.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Placeholder used whenever a source gives no dominant color
pub const DEFAULT_COLOR: &str = "#000000";

/// The four feeds a record can come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Bing,
    Pexels,
    Unsplash,
    #[serde(rename = "NASA")]
    Nasa,
}

impl SourceKind {
    /// Identifier stored in the `fuente` column and used in filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Bing => "Bing",
            SourceKind::Pexels => "Pexels",
            SourceKind::Unsplash => "Unsplash",
            SourceKind::Nasa => "NASA",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized photo coming out of a source adapter
/// DOCUMENTATION: `title` and `description` hold the source text until the
/// ingest service replaces them with their translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PhotoRecord {
    /// Link to the original listing
    pub source_url: String,
    /// Direct location of the image binary
    #[validate(url)]
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub author: String,
    pub source: SourceKind,
    /// Comma-joined labels
    pub tags: String,
    pub date: NaiveDate,
    #[validate(range(min = 1))]
    pub width: i32,
    #[validate(range(min = 1))]
    pub height: i32,
    pub dominant_color: String,
}

/// Upper-case the first letter of every word ("city lights" -> "City Lights")
pub fn title_case(term: &str) -> String {
    term.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Treat missing and blank strings the same way
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) fn sample_record(source: SourceKind, title: &str) -> PhotoRecord {
    PhotoRecord {
        source_url: "https://example.com/listing".to_string(),
        image_url: "https://example.com/image.jpg".to_string(),
        title: title.to_string(),
        description: format!("About {}", title),
        category: "Paisaje".to_string(),
        author: "Tester".to_string(),
        source,
        tags: "a,b".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
        width: 1920,
        height: 1080,
        dominant_color: DEFAULT_COLOR.to_string(),
    }
}
