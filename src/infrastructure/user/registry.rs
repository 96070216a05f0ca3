//! User registry backed by the document store

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::storage::{DocumentId, Storage, Stored};
use crate::domain::user::{
    validate_password, validate_username, NewUser, OwnedBlog, User, UserRegistry,
    UserValidationError, UserWithBlogs,
};
use crate::domain::{Blog, DomainError};

use super::password::PasswordHasher;

fn duplicate_username() -> DomainError {
    DomainError::validation(UserValidationError::DuplicateUsername.to_string())
}

/// User registry over the `users` collection
///
/// The `blogs` collection is only read, to join owned blogs on listing.
#[derive(Debug)]
pub struct StorageUserRegistry<H: PasswordHasher> {
    users: Arc<dyn Storage<User>>,
    blogs: Arc<dyn Storage<Blog>>,
    hasher: Arc<H>,
}

impl<H: PasswordHasher> StorageUserRegistry<H> {
    /// Create a new registry
    pub fn new(
        users: Arc<dyn Storage<User>>,
        blogs: Arc<dyn Storage<Blog>>,
        hasher: Arc<H>,
    ) -> Self {
        Self {
            users,
            blogs,
            hasher,
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Stored<User>>, DomainError> {
        self.users.find_by_field("username", username).await
    }
}

#[async_trait]
impl<H: PasswordHasher + 'static> UserRegistry for StorageUserRegistry<H> {
    async fn register(&self, new_user: NewUser) -> Result<Stored<User>, DomainError> {
        info!(username = %new_user.username, "Registering user");

        validate_username(&new_user.username)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&new_user.password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        // Early exit only; the store's unique constraint is authoritative
        if self.find_by_username(&new_user.username).await?.is_some() {
            debug!(username = %new_user.username, "Username already taken");
            return Err(duplicate_username());
        }

        let password_hash = self.hasher.hash(&new_user.password)?;
        let user = User::new(new_user.username, new_user.name, password_hash)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        match self.users.insert(user).await {
            Ok(stored) => Ok(stored),
            Err(DomainError::Conflict { field, .. }) if field == "username" => {
                warn!("Username claimed concurrently, rejected by store");
                Err(duplicate_username())
            }
            Err(e) => Err(e),
        }
    }

    async fn list(&self) -> Result<Vec<UserWithBlogs>, DomainError> {
        let users = self.users.find_all().await?;
        let blogs = self.blogs.find_all().await?;

        let result = users
            .into_iter()
            .map(|user| {
                let owned = blogs
                    .iter()
                    .filter(|b| b.document().owner() == Some(user.id()))
                    .map(|b| OwnedBlog {
                        id: b.id().clone(),
                        title: b.document().title().to_string(),
                        author: b.document().author().map(String::from),
                        url: b.document().url().to_string(),
                    })
                    .collect();

                UserWithBlogs { user, blogs: owned }
            })
            .collect();

        Ok(result)
    }

    async fn get(&self, id: &DocumentId) -> Result<Option<Stored<User>>, DomainError> {
        self.users.find_by_id(id).await
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Stored<User>>, DomainError> {
        let Some(user) = self.find_by_username(username).await? else {
            return Ok(None);
        };

        if !self.hasher.verify(password, user.document().password_hash()) {
            return Ok(None);
        }

        Ok(Some(user))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }
}
