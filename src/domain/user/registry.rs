//! User registry trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::User;
use crate::domain::storage::{DocumentId, Stored};
use crate::domain::DomainError;

/// Registration input; the password is plaintext and only lives until hashed
#[derive(Clone)]
pub struct NewUser {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Blog owned by a user, joined by reference on listing
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedBlog {
    pub id: DocumentId,
    pub title: String,
    pub author: Option<String>,
    pub url: String,
}

/// User together with the blogs that reference it as owner
#[derive(Debug, Clone)]
pub struct UserWithBlogs {
    pub user: Stored<User>,
    pub blogs: Vec<OwnedBlog>,
}

/// Registry enforcing username uniqueness and password hashing
#[async_trait]
pub trait UserRegistry: Send + Sync + Debug {
    /// Register a new user
    ///
    /// Fails with `DomainError::Validation` on short username/password or a
    /// taken username. The registry is unchanged on failure.
    async fn register(&self, new_user: NewUser) -> Result<Stored<User>, DomainError>;

    /// List all users with their owned blogs
    async fn list(&self) -> Result<Vec<UserWithBlogs>, DomainError>;

    /// Get a user by identifier
    async fn get(&self, id: &DocumentId) -> Result<Option<Stored<User>>, DomainError>;

    /// Verify credentials, returns the user on success
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Stored<User>>, DomainError>;

    /// Count registered users
    async fn count(&self) -> Result<usize, DomainError>;
}
