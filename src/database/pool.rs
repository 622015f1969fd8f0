use super::{ensure_id, Document, DocumentStore, StoreError, StoreResult};
use crate::config::StoreConfig;
use sqlx::migrate::Migrator;
use sqlx::types::Json;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::path::Path;
use tracing::debug;

/// Create a PostgreSQL connection pool
///
/// # Arguments
/// * `config` - Store configuration
///
/// # Returns
/// * `Ok(PgPool)` - Successfully created connection pool
/// * `Err(StoreError)` - Error creating the pool
pub async fn create_pool(config: &StoreConfig) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .max_lifetime(config.max_lifetime())
        .test_before_acquire(config.test_before_acquire)
        .connect(&config.url)
        .await
        .map_err(StoreError::PoolCreation)?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(StoreError::PoolCreation)?;

    Ok(pool)
}

/// Migrations bundled into the crate at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `migrations_path` - Directory to load migrations from at runtime; `None`
///   runs the bundled [`MIGRATOR`], independent of the working directory
pub async fn run_migrations(pool: &PgPool, migrations_path: Option<&str>) -> Result<(), StoreError> {
    match migrations_path {
        Some(path) => {
            let migrator = Migrator::new(Path::new(path)).await?;
            migrator.run(pool).await?;
        }
        None => MIGRATOR.run(pool).await?,
    }

    Ok(())
}

/// Document store backed by a single JSONB table
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the pool, run migrations and wrap the result
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let pool = create_pool(config).await?;
        run_migrations(&pool, None).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn into_pool(self) -> PgPool {
        self.pool
    }
}

impl DocumentStore for PgDocumentStore {
    async fn find_one(&self, collection: &str, filter: &Document) -> StoreResult<Option<Document>> {
        let row: Option<(Json<Document>,)> = sqlx::query_as(
            r#"
            SELECT doc
            FROM documents
            WHERE collection = $1 AND doc @> $2
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(Json(filter.clone()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(document),)| document))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Document,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<(Json<Document>,)> = sqlx::query_as(
            r#"
            SELECT doc
            FROM documents
            WHERE collection = $1 AND doc @> $2
            ORDER BY seq
            LIMIT $3
            "#,
        )
        .bind(collection)
        .bind(Json(filter.clone()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(Json(document),)| document).collect())
    }

    async fn save(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let id = ensure_id(&mut document)?;

        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, doc)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id)
            DO UPDATE SET doc = EXCLUDED.doc, updated_at = NOW()
            "#,
        )
        .bind(collection)
        .bind(id.as_str())
        .bind(Json(document))
        .execute(&self.pool)
        .await?;

        debug!("Upserted document {} in {}", id, collection);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_migrations_create_documents_table() {
        let descriptions: Vec<_> = MIGRATOR.iter().map(|m| m.description.to_string()).collect();
        assert!(descriptions.iter().any(|d| d.contains("create documents")));
    }
}
