//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{DocumentId, StorageEntity, Stored};

/// Document store bound to one collection
///
/// Every operation is a single atomic store operation. The store assigns
/// identifiers on insert and enforces the entity's unique fields, reporting
/// violations as `DomainError::Conflict`.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves every document in storage order
    async fn find_all(&self) -> Result<Vec<Stored<E>>, DomainError>;

    /// Retrieves a document by its identifier
    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Stored<E>>, DomainError>;

    /// Retrieves the document whose unique `field` equals `value`
    ///
    /// `field` must be one of the entity's `UNIQUE_FIELDS`.
    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Stored<E>>, DomainError>;

    /// Inserts a document under a freshly generated identifier
    async fn insert(&self, document: E) -> Result<Stored<E>, DomainError>;

    /// Replaces the document stored under `id`, returns `None` if absent
    async fn update_by_id(
        &self,
        id: &DocumentId,
        document: E,
    ) -> Result<Option<Stored<E>>, DomainError>;

    /// Deletes a document, returns true if one was removed
    async fn delete_by_id(&self, id: &DocumentId) -> Result<bool, DomainError>;

    /// Returns the number of documents
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.find_all().await?.len())
    }
}
