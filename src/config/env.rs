// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string
    /// Built from DB_HOST/DB_USER/DB_PASSWORD/DB_DATABASE/DB_PORT unless DATABASE_URL is set
    pub database_url: String,

    /// Maximum connections in database pool
    pub db_max_connections: u32,

    /// Connection timeout in seconds
    pub db_connection_timeout: u64,

    /// Pexels API key (sent as the Authorization header)
    pub pexels_api_key: String,

    /// Unsplash access key (sent as "Client-ID {key}")
    pub unsplash_access_key: String,

    /// NASA APOD API key (sent as the api_key query parameter)
    pub nasa_api_key: String,

    /// Directory holding downloaded images
    pub image_dir: PathBuf,

    /// Log file, overwritten on every run
    pub log_file: PathBuf,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// Target language for titles and descriptions
    pub target_language: String,

    /// Retries on connection errors and 5xx responses
    pub http_max_retries: u32,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "postgresql://{}:{}@{}:{}/{}",
                get("DB_USER", "postgres"),
                get("DB_PASSWORD", ""),
                get("DB_HOST", "localhost"),
                get("DB_PORT", "5432"),
                get("DB_DATABASE", "recursos"),
            )
        });

        Config {
            database_url,

            db_max_connections: get("DB_MAX_CONNECTIONS", "5").parse().unwrap_or(5),

            db_connection_timeout: get("DB_CONNECTION_TIMEOUT", "30").parse().unwrap_or(30),

            pexels_api_key: get("PEXELS_API_KEY", ""),

            unsplash_access_key: get("UNSPLASH_ACCESS_KEY", ""),

            nasa_api_key: get("NASA_API_KEY", ""),

            image_dir: PathBuf::from(get("IMAGE_DIR", "data/images")),

            log_file: PathBuf::from(get("LOG_FILE", "scraper.log")),

            log_level: get("LOG_LEVEL", "info"),

            target_language: get("TARGET_LANGUAGE", "es"),

            http_max_retries: get("HTTP_MAX_RETRIES", "5").parse().unwrap_or(5),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Missing API keys are not fatal, the affected source just comes back empty
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if self.target_language.is_empty() {
            return Err("TARGET_LANGUAGE must not be empty".to_string());
        }

        if self.pexels_api_key.is_empty() {
            log::warn!("PEXELS_API_KEY not configured - Pexels will return no photos");
        }

        if self.unsplash_access_key.is_empty() {
            log::warn!("UNSPLASH_ACCESS_KEY not configured - Unsplash will return no photos");
        }

        if self.nasa_api_key.is_empty() {
            log::warn!("NASA_API_KEY not configured - NASA APOD will return no photos");
        }

        Ok(())
    }
}
