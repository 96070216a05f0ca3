//! In-memory storage implementation

use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{
    holds_unique_value, unique_field, DocumentId, Storage, StorageEntity, Stored,
};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Documents are kept in insertion order. Unique fields are checked and the
/// document written under one write lock, so concurrent inserts cannot both
/// claim the same value. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    documents: RwLock<Vec<Stored<E>>>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

/// First unique field of `document` already claimed by another document
fn unique_violation<E: StorageEntity>(
    documents: &[Stored<E>],
    document: &E,
    skip: Option<&DocumentId>,
) -> Option<&'static str> {
    let wanted = document.unique_values();

    documents
        .iter()
        .filter(|existing| Some(existing.id()) != skip)
        .flat_map(|existing| existing.document().unique_values())
        .find_map(|(field, value)| {
            wanted
                .iter()
                .any(|(f, v)| *f == field && *v == value)
                .then_some(field)
        })
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn find_all(&self) -> Result<Vec<Stored<E>>, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.clone())
    }

    async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Stored<E>>, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.iter().find(|d| d.id() == id).cloned())
    }

    async fn find_by_field(
        &self,
        field: &str,
        value: &str,
    ) -> Result<Option<Stored<E>>, DomainError> {
        let field = unique_field::<E>(field)?;
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents
            .iter()
            .find(|d| holds_unique_value(d.document(), field, value))
            .cloned())
    }

    async fn insert(&self, document: E) -> Result<Stored<E>, DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(field) = unique_violation(&documents, &document, None) {
            return Err(DomainError::conflict(E::COLLECTION, field));
        }

        let stored = Stored::new(DocumentId::generate(), 0, document);
        documents.push(stored.clone());
        Ok(stored)
    }

    async fn update_by_id(
        &self,
        id: &DocumentId,
        document: E,
    ) -> Result<Option<Stored<E>>, DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(field) = unique_violation(&documents, &document, Some(id)) {
            return Err(DomainError::conflict(E::COLLECTION, field));
        }

        let Some(slot) = documents.iter_mut().find(|d| d.id() == id) else {
            return Ok(None);
        };

        let revised = slot.clone().revise(document);
        *slot = revised.clone();
        Ok(Some(revised))
    }

    async fn delete_by_id(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = documents.len();
        documents.retain(|d| d.id() != id);
        Ok(documents.len() < before)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.len())
    }
}
