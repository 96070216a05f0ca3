//! Blog repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Blog, BlogInput, BlogPatch};
use crate::domain::storage::{DocumentId, Stored};
use crate::domain::DomainError;

/// Minimal display data of a blog's owner
///
/// `username` and `name` are `None` when the referenced user no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerSummary {
    pub id: DocumentId,
    pub username: Option<String>,
    pub name: Option<String>,
}

/// Stored blog with its owner reference resolved
#[derive(Debug, Clone)]
pub struct BlogEntry {
    pub record: Stored<Blog>,
    pub owner: Option<OwnerSummary>,
}

impl BlogEntry {
    pub fn blog(&self) -> &Blog {
        self.record.document()
    }
}

/// Repository enforcing blog invariants on top of the document store
#[async_trait]
pub trait BlogRepository: Send + Sync + Debug {
    /// All blogs in storage order with owners resolved
    async fn list_all(&self) -> Result<Vec<BlogEntry>, DomainError>;

    /// Validate and persist a new blog
    async fn create(
        &self,
        input: BlogInput,
        owner: Option<DocumentId>,
    ) -> Result<BlogEntry, DomainError>;

    /// Get a blog, failing with `DomainError::NotFound` if absent
    async fn get_by_id(&self, id: &DocumentId) -> Result<BlogEntry, DomainError>;

    /// Merge the supplied fields onto an existing blog
    async fn update(&self, id: &DocumentId, patch: BlogPatch) -> Result<BlogEntry, DomainError>;

    /// Delete a blog, returns true if one was removed
    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError>;
}
