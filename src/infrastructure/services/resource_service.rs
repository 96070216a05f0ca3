//! Resource service - the operations exposed over HTTP for blogs and users

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::blog::stats;
use crate::domain::storage::DocumentId;
use crate::domain::{Blog, BlogInput, BlogPatch, BlogRepository, DomainError, NewUser, UserRegistry};
use crate::infrastructure::auth::JwtGenerator;

use super::views::{BlogStatsView, BlogView, LoginView, UserView};

/// Request to create a new blog
///
/// Carries no identifier: the store assigns one.
#[derive(Debug, Clone, Default)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request to update an existing blog, absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Request to register a new user
#[derive(Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub name: Option<String>,
    pub password: String,
}

impl fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Service for blog and user resources
///
/// Translates requests into repository and registry calls and shapes every
/// result into a view.
#[derive(Debug)]
pub struct ResourceService {
    blogs: Arc<dyn BlogRepository>,
    users: Arc<dyn UserRegistry>,
    tokens: Arc<dyn JwtGenerator>,
}

impl ResourceService {
    /// Create a new ResourceService
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        users: Arc<dyn UserRegistry>,
        tokens: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            blogs,
            users,
            tokens,
        }
    }

    /// List all blogs
    pub async fn list_blogs(&self) -> Result<Vec<BlogView>, DomainError> {
        let entries = self.blogs.list_all().await?;
        debug!(count = entries.len(), "Listed blogs");
        Ok(entries.iter().map(BlogView::from).collect())
    }

    /// Get a blog by ID
    pub async fn get_blog(&self, id: &str) -> Result<BlogView, DomainError> {
        let entry = self.blogs.get_by_id(&DocumentId::from_external(id)).await?;
        Ok(BlogView::from(&entry))
    }

    /// Create a blog, owned by `owner` when the caller is authenticated
    pub async fn create_blog(
        &self,
        request: CreateBlogRequest,
        owner: Option<DocumentId>,
    ) -> Result<BlogView, DomainError> {
        let input = BlogInput {
            title: request.title,
            author: request.author,
            url: request.url,
            likes: request.likes,
        };

        let entry = self.blogs.create(input, owner).await?;
        Ok(BlogView::from(&entry))
    }

    /// Update the supplied fields of a blog
    pub async fn update_blog(
        &self,
        id: &str,
        request: UpdateBlogRequest,
    ) -> Result<BlogView, DomainError> {
        let patch = BlogPatch {
            title: request.title,
            author: request.author,
            url: request.url,
            likes: request.likes,
        };

        let entry = self
            .blogs
            .update(&DocumentId::from_external(id), patch)
            .await?;
        Ok(BlogView::from(&entry))
    }

    /// Delete a blog, returns true if one was removed
    pub async fn delete_blog(&self, id: &str) -> Result<bool, DomainError> {
        self.blogs.delete(&DocumentId::from_external(id)).await
    }

    /// Aggregates over all blogs
    pub async fn blog_stats(&self) -> Result<BlogStatsView, DomainError> {
        let entries = self.blogs.list_all().await?;
        let blogs: Vec<Blog> = entries.iter().map(|e| e.blog().clone()).collect();

        let favorite_blog = stats::favorite_blog(&blogs)
            .and_then(|fav| blogs.iter().position(|b| std::ptr::eq(b, fav)))
            .map(|index| BlogView::from(&entries[index]));

        Ok(BlogStatsView {
            total_blogs: blogs.len(),
            total_likes: stats::total_likes(&blogs),
            favorite_blog,
            most_blogs: stats::most_blogs(&blogs),
            most_likes: stats::most_likes(&blogs),
        })
    }

    /// List all users with the blogs they own
    pub async fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Register a new user
    pub async fn register_user(
        &self,
        request: RegisterUserRequest,
    ) -> Result<UserView, DomainError> {
        let user = self
            .users
            .register(NewUser {
                username: request.username,
                name: request.name,
                password: request.password,
            })
            .await?;

        info!(id = %user.id(), "User registered");
        Ok(UserView::from_user(&user))
    }

    /// Exchange credentials for a token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginView, DomainError> {
        let Some(user) = self.users.authenticate(username, password).await? else {
            warn!(username = %username, "Rejected login");
            return Err(DomainError::unauthorized("invalid username or password"));
        };

        let token = self.tokens.generate(&user)?;
        info!(id = %user.id(), "User logged in");

        Ok(LoginView {
            token,
            username: user.document().username().to_string(),
            name: user.document().name().map(String::from),
        })
    }

    /// Resolve a bearer token to the id of an existing user
    pub async fn authenticate_token(&self, token: &str) -> Result<DocumentId, DomainError> {
        let claims = self.tokens.validate(token)?;

        let user = self
            .users
            .get(&claims.user_id())
            .await?
            .ok_or_else(|| DomainError::unauthorized("token subject no longer exists"))?;

        Ok(user.id().clone())
    }

    /// Number of registered users, used to probe the store
    pub async fn user_count(&self) -> Result<usize, DomainError> {
        self.users.count().await
    }
}
