// src/services/translator.rs
// DOCUMENTATION: Best-effort translation of titles and descriptions
// PURPOSE: Translate text without ever blocking the pipeline on a provider failure

use crate::errors::ScraperError;
use crate::services::HttpClient;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

const GOOGLE_TRANSLATE_BASE_URL: &str = "https://translate.googleapis.com";
/// Longest text the provider accepts in one request
const MAX_TEXT_CHARS: usize = 5000;
/// Pause before every provider call
const CALL_DELAY: Duration = Duration::from_millis(100);

/// External text translation capability
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ScraperError>;
}

/// Google Translate web endpoint, source language auto-detected
pub struct GoogleTranslateClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, GOOGLE_TRANSLATE_BASE_URL)
    }

    pub fn with_base_url(http: HttpClient, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The response is `[[["translated", "original", ...], ...], ...]`
    fn parse_segments(body: &Value) -> Result<String, ScraperError> {
        let segments = body
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ScraperError::Translation("Unexpected response shape".to_string()))?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if translated.is_empty() {
            return Err(ScraperError::Translation("Empty translation".to_string()));
        }

        Ok(translated)
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslateClient {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ScraperError> {
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(ScraperError::Translation(format!(
                "Text longer than {} characters",
                MAX_TEXT_CHARS
            )));
        }

        let request = self
            .http
            .get(&format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ]);

        let body: Value = self
            .http
            .send_ok(request)
            .await
            .map_err(|e| ScraperError::Translation(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScraperError::Translation(format!("Parse error: {}", e)))?;

        Self::parse_segments(&body)
    }
}

/// Wraps a provider with the never-fail contract
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    target: String,
}

impl Translator {
    pub fn new(provider: Arc<dyn TranslationProvider>, target: impl Into<String>) -> Self {
        Self {
            provider,
            target: target.into(),
        }
    }

    /// Translate into the target language
    /// DOCUMENTATION: Blank text (empty or whitespace only) is returned as is without calling the provider;
    /// on provider failure the original text comes back unchanged
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }

        tokio::time::sleep(CALL_DELAY).await;

        match self.provider.translate(text, &self.target).await {
            Ok(translated) => translated,
            Err(e) => {
                let preview: String = text.chars().take(30).collect();
                log::warn!("Translation failed for '{}...': {}", preview, e);
                text.to_string()
            }
        }
    }
}
