//! Storage factory for runtime storage selection

use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::configuration(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Opened storage backend, able to hand out one store per collection
///
/// All PostgreSQL collections share a single connection pool.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Postgres(PgPool),
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Opens the backend described by the configuration
    pub async fn open(config: &StorageConfig) -> Result<StorageBackend, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(StorageBackend::InMemory),
            StorageConfig::Postgres(pg_config) => {
                Ok(StorageBackend::Postgres(pg_config.connect().await?))
            }
        }
    }

    /// Creates the store for `E`'s collection on an opened backend
    pub async fn collection<E>(backend: &StorageBackend) -> Result<Arc<dyn Storage<E>>, DomainError>
    where
        E: StorageEntity + 'static,
    {
        match backend {
            StorageBackend::InMemory => Ok(Arc::new(InMemoryStorage::<E>::new())),
            StorageBackend::Postgres(pool) => {
                let storage = PostgresStorage::<E>::new(pool.clone());
                storage.ensure_collection().await?;
                Ok(Arc::new(storage))
            }
        }
    }
}
