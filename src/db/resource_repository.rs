// src/db/resource_repository.rs
// DOCUMENTATION: Daily resources table operations
// PURPOSE: Truncate and upsert rows of recursos_diarios

use crate::errors::ScraperError;
use crate::models::DailyResource;
use async_trait::async_trait;
use sqlx::{Acquire, PgPool, Postgres, Transaction};

const UPSERT_SQL: &str = r#"
    INSERT INTO recursos_diarios (
        fecha, titulo, titulo_display, descripcion, categoria,
        autor, fuente, tags, url_fuente, path_imagen,
        width, height, color_dominante
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    ON CONFLICT (fecha, titulo) DO UPDATE
    SET descripcion = EXCLUDED.descripcion,
        path_imagen = EXCLUDED.path_imagen
"#;

/// Storage for the daily data set
/// DOCUMENTATION: The whole table is replaced on every run, rows are never deleted one by one
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Remove every row
    async fn truncate(&self) -> Result<(), ScraperError>;

    /// Open the unit of work used by one save call
    async fn begin(&self) -> Result<Box<dyn ResourceBatch>, ScraperError>;
}

/// One save call's unit of work
/// DOCUMENTATION: A failed upsert only undoes itself; the batch stays usable
/// and the remaining rows are committed together at the end
#[async_trait]
pub trait ResourceBatch: Send {
    /// Insert the row, or refresh description and image path if (fecha, titulo) exists
    async fn upsert(&mut self, resource: &DailyResource) -> Result<(), ScraperError>;

    async fn commit(self: Box<Self>) -> Result<(), ScraperError>;
}

/// PostgreSQL implementation backed by sqlx
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn truncate(&self) -> Result<(), ScraperError> {
        sqlx::query("TRUNCATE TABLE recursos_diarios")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Failed to truncate recursos_diarios: {}", e);
                ScraperError::Database(format!("Truncate failed: {}", e))
            })?;

        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn ResourceBatch>, ScraperError> {
        let tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            ScraperError::Database(format!("Begin failed: {}", e))
        })?;

        Ok(Box::new(PgResourceBatch { tx }))
    }
}

/// Outer transaction; each upsert runs in its own savepoint
pub struct PgResourceBatch {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ResourceBatch for PgResourceBatch {
    async fn upsert(&mut self, resource: &DailyResource) -> Result<(), ScraperError> {
        let mut savepoint = Acquire::begin(&mut self.tx)
            .await
            .map_err(|e| ScraperError::Database(format!("Savepoint failed: {}", e)))?;

        let result = sqlx::query(UPSERT_SQL)
            .bind(resource.fecha)
            .bind(&resource.titulo)
            .bind(&resource.titulo_display)
            .bind(&resource.descripcion)
            .bind(&resource.categoria)
            .bind(&resource.autor)
            .bind(&resource.fuente)
            .bind(&resource.tags)
            .bind(&resource.url_fuente)
            .bind(&resource.path_imagen)
            .bind(resource.width)
            .bind(resource.height)
            .bind(&resource.color_dominante)
            .execute(&mut *savepoint)
            .await;

        match result {
            Ok(_) => savepoint
                .commit()
                .await
                .map_err(|e| ScraperError::Database(format!("Release savepoint failed: {}", e))),
            Err(e) => {
                if let Err(rollback_err) = savepoint.rollback().await {
                    log::error!("Failed to roll back savepoint: {}", rollback_err);
                }
                Err(ScraperError::Database(format!("Upsert failed: {}", e)))
            }
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), ScraperError> {
        self.tx.commit().await.map_err(|e| {
            log::error!("Failed to commit daily resources: {}", e);
            ScraperError::Database(format!("Commit failed: {}", e))
        })
    }
}
