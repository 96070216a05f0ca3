//! Blog repository backed by the document store

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::blog::{Blog, BlogEntry, BlogInput, BlogPatch, BlogRepository, OwnerSummary};
use crate::domain::storage::{DocumentId, Storage, Stored};
use crate::domain::{DomainError, User};

fn blog_not_found(id: &DocumentId) -> DomainError {
    DomainError::not_found(format!("Blog '{}' not found", id))
}

fn summarize(owner: &DocumentId, user: Option<&Stored<User>>) -> OwnerSummary {
    OwnerSummary {
        id: owner.clone(),
        username: user.map(|u| u.document().username().to_string()),
        name: user.and_then(|u| u.document().name().map(String::from)),
    }
}

/// Blog repository over the `blogs` collection
///
/// Owner references are resolved against the `users` collection on every
/// read; a reference to a missing user resolves to an id-only summary.
#[derive(Debug)]
pub struct StorageBlogRepository {
    blogs: Arc<dyn Storage<Blog>>,
    users: Arc<dyn Storage<User>>,
}

impl StorageBlogRepository {
    pub fn new(blogs: Arc<dyn Storage<Blog>>, users: Arc<dyn Storage<User>>) -> Self {
        Self { blogs, users }
    }

    async fn resolve(&self, record: Stored<Blog>) -> Result<BlogEntry, DomainError> {
        let owner = match record.document().owner() {
            Some(owner_id) => {
                let user = self.users.find_by_id(owner_id).await?;
                Some(summarize(owner_id, user.as_ref()))
            }
            None => None,
        };

        Ok(BlogEntry { record, owner })
    }
}

#[async_trait]
impl BlogRepository for StorageBlogRepository {
    async fn list_all(&self) -> Result<Vec<BlogEntry>, DomainError> {
        let records = self.blogs.find_all().await?;

        if records.iter().all(|r| r.document().owner().is_none()) {
            return Ok(records
                .into_iter()
                .map(|record| BlogEntry {
                    record,
                    owner: None,
                })
                .collect());
        }

        let users: HashMap<DocumentId, Stored<User>> = self
            .users
            .find_all()
            .await?
            .into_iter()
            .map(|u| (u.id().clone(), u))
            .collect();

        Ok(records
            .into_iter()
            .map(|record| {
                let owner = record
                    .document()
                    .owner()
                    .map(|owner_id| summarize(owner_id, users.get(owner_id)));
                BlogEntry { record, owner }
            })
            .collect())
    }

    async fn create(
        &self,
        input: BlogInput,
        owner: Option<DocumentId>,
    ) -> Result<BlogEntry, DomainError> {
        let blog = Blog::new(input, owner).map_err(|e| DomainError::validation(e.to_string()))?;

        info!(title = %blog.title(), owned = blog.owner().is_some(), "Creating blog");

        let record = self.blogs.insert(blog).await?;
        self.resolve(record).await
    }

    async fn get_by_id(&self, id: &DocumentId) -> Result<BlogEntry, DomainError> {
        let record = self
            .blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| blog_not_found(id))?;

        self.resolve(record).await
    }

    async fn update(&self, id: &DocumentId, patch: BlogPatch) -> Result<BlogEntry, DomainError> {
        let current = self
            .blogs
            .find_by_id(id)
            .await?
            .ok_or_else(|| blog_not_found(id))?;

        if patch.is_empty() {
            debug!(id = %id, "Empty blog patch, nothing to write");
            return self.resolve(current).await;
        }

        let patched = current
            .document()
            .patched(&patch)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        info!(id = %id, "Updating blog");

        // The blog may have been deleted between read and write
        let record = self
            .blogs
            .update_by_id(id, patched)
            .await?
            .ok_or_else(|| blog_not_found(id))?;

        self.resolve(record).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<bool, DomainError> {
        let removed = self.blogs.delete_by_id(id).await?;
        info!(id = %id, removed, "Deleting blog");
        Ok(removed)
    }
}
