// src/models/resource.rs

use crate::models::PhotoRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Maximum length of `titulo_display`, in characters
pub const DISPLAY_TITLE_MAX: usize = 200;

/// Row of the `recursos_diarios` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct DailyResource {
    pub fecha: NaiveDate,
    pub titulo: String,
    pub titulo_display: String,
    pub descripcion: String,
    pub categoria: String,
    pub autor: String,
    pub fuente: String,
    pub tags: String,
    pub url_fuente: String,
    pub path_imagen: String,
    pub width: i32,
    pub height: i32,
    pub color_dominante: String,
}

impl DailyResource {
    /// Build the row for an already translated record and its saved image
    pub fn from_record(record: &PhotoRecord, image_filename: &str) -> Self {
        Self {
            fecha: record.date,
            titulo: record.title.clone(),
            titulo_display: record.title.chars().take(DISPLAY_TITLE_MAX).collect(),
            descripcion: record.description.clone(),
            categoria: record.category.clone(),
            autor: record.author.clone(),
            fuente: record.source.as_str().to_string(),
            tags: record.tags.clone(),
            url_fuente: record.source_url.clone(),
            path_imagen: image_filename.to_string(),
            width: record.width,
            height: record.height,
            color_dominante: record.dominant_color.clone(),
        }
    }
}
