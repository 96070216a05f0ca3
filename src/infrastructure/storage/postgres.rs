//! PostgreSQL document storage with connection pooling

use std::fmt::Debug;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::storage::{unique_field, DocumentId, Storage, StorageEntity, Stored};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/bloglist".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Opens a connection pool with these settings
    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(self.idle_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

/// PostgreSQL document store for one collection
///
/// Each collection is a table of (id, version, data) rows with the document
/// kept as JSONB. Unique fields are backed by unique expression indexes, so
/// the database rejects duplicates even when two inserts race.
pub struct PostgresStorage<E>
where
    E: StorageEntity,
{
    pool: PgPool,
    table_name: String,
    _phantom: PhantomData<E>,
}

impl<E> Debug for PostgresStorage<E>
where
    E: StorageEntity,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStorage")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl<E> PostgresStorage<E>
where
    E: StorageEntity,
{
    /// Creates a store over an existing pool, using the entity's collection name
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table_name: E::COLLECTION.to_string(),
            _phantom: PhantomData,
        }
    }

    /// Name of the unique index backing `field`
    fn index_name(&self, field: &str) -> String {
        format!("{}_{}_key", self.table_name, field)
    }

    /// Ensures the collection table and its unique indexes exist
    pub async fn ensure_collection(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(64) PRIMARY KEY,
                version INTEGER NOT NULL DEFAULT 0,
                data JSONB NOT NULL,
                seq BIGSERIAL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        for field in E::UNIQUE_FIELDS {
            let query = format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ((data->>'{}'))",
                self.index_name(field),
                self.table_name,
                field
            );

            sqlx::query(&query)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to create unique index: {}", e))
                })?;
        }

        Ok(())
    }

    fn row_to_stored(row: &PgRow) -> Result<Stored<E>, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::storage(format!("Failed to read id: {}", e)))?;
        let version: i32 = row
            .try_get("version")
            .map_err(|e| DomainError::storage(format!("Failed to read version: {}", e)))?;
        let data: serde_json::Value = row
            .try_get("data")
            .map_err(|e| DomainError::storage(format!("Failed to read data: {}", e)))?;

        let document: E = serde_json::from_value(data).map_err(|e| {
            DomainError::storage(format!("Failed to deserialize document: {}", e))
        })?;
        let version = u32::try_from(version)
            .map_err(|_| DomainError::storage(format!("Invalid document version {}", version)))?;

        Ok(Stored::new(DocumentId::from_external(id), version, document))
    }

    /// Translates a write failure, recognising unique index violations
    fn write_error(&self, error: sqlx::Error, action: &str) -> DomainError {
        if let Some(db_error) = error.as_database_error() {
            if db_error.is_unique_violation() {
                let field = db_error
                    .constraint()
                    .and_then(|constraint| {
                        E::UNIQUE_FIELDS
                            .iter()
                            .find(|field| self.index_name(field) == constraint)
                    })
                    .copied()
                    .unwrap_or("id");

                return DomainError::conflict(E::COLLECTION, field);
            }
        }

        DomainError::storage(format!("Failed to {} document: {}", action, error))
    }
}

#[async_trait]
impl<E> Storage<E> for PostgresStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn find_all(&self) -> Result<Vec<Stored<E>>, DomainError> {
        let query = format!(
            "SELECT id, version, data FROM {} ORDER BY seq",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list documents: {}", e)))?;

        rows.iter().map(Self::row_to_stored).collect()
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Stored<E>>, DomainError> {
        let query = format!(
            "SELECT id, version, data FROM {} WHERE id = $1",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get document: {}", e)))?;

        row.as_ref().map(Self::row_to_stored).transpose()
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Stored<E>>, DomainError> {
        // Same expression as the unique index, so the lookup uses it
        let field = unique_field::<E>(field)?;
        let query = format!(
            "SELECT id, version, data FROM {} WHERE data->>'{}' = $1",
            self.table_name, field
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find document: {}", e)))?;

        row.as_ref().map(Self::row_to_stored).transpose()
    }

    async fn insert(&self, document: E) -> Result<Stored<E>, DomainError> {
        let id = DocumentId::generate();
        let data = serde_json::to_value(&document).map_err(|e| {
            DomainError::storage(format!("Failed to serialize document: {}", e))
        })?;

        let query = format!(
            "INSERT INTO {} (id, version, data) VALUES ($1, 0, $2)",
            self.table_name
        );

        sqlx::query(&query)
            .bind(id.as_str())
            .bind(&data)
            .execute(&self.pool)
            .await
            .map_err(|e| self.write_error(e, "insert"))?;

        Ok(Stored::new(id, 0, document))
    }

    async fn update_by_id(
        &self,
        id: &DocumentId,
        document: E,
    ) -> Result<Option<Stored<E>>, DomainError> {
        let data = serde_json::to_value(&document).map_err(|e| {
            DomainError::storage(format!("Failed to serialize document: {}", e))
        })?;

        let query = format!(
            r#"
            UPDATE {}
            SET data = $2, version = version + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING version
            "#,
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .bind(&data)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| self.write_error(e, "update"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let version: i32 = row
            .try_get("version")
            .map_err(|e| DomainError::storage(format!("Failed to read version: {}", e)))?;
        let version = u32::try_from(version)
            .map_err(|_| DomainError::storage(format!("Invalid document version {}", version)))?;

        Ok(Some(Stored::new(id.clone(), version, document)))
    }

    async fn delete_by_id(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete document: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) AS count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count documents: {}", e)))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| DomainError::storage(format!("Failed to read count: {}", e)))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.connect_timeout_secs, 30);
        assert_eq!(config.idle_timeout_secs, 600);
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://localhost/test")
            .with_max_connections(20)
            .with_min_connections(5)
            .with_connect_timeout(60);

        assert_eq!(config.url, "postgres://localhost/test");
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.min_connections, 5);
        assert_eq!(config.connect_timeout_secs, 60);
    }
}
