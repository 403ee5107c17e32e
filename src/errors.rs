// src/errors.rs
// DOCUMENTATION: Custom error types for the scraper
// PURPOSE: Centralized error handling for entire application

use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each component decides locally whether a variant is recoverable (see services)
#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource is not an image (content-type: {content_type})")]
    NotAnImage { content_type: String },

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pre-flight cleanup failed: {0}")]
    Preflight(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ScraperError::Parse(e.to_string())
        } else {
            ScraperError::ExternalApi(e.to_string())
        }
    }
}

impl From<validator::ValidationErrors> for ScraperError {
    fn from(e: validator::ValidationErrors) -> Self {
        ScraperError::Validation(e.to_string())
    }
}
