//! Response shapes for the blog and user resources
//!
//! Every view exposes the document id as `id` and nothing else from the
//! storage envelope; password hashes have no field to land in.

use serde::Serialize;

use crate::domain::blog::stats::{AuthorBlogs, AuthorLikes};
use crate::domain::storage::Stored;
use crate::domain::user::{OwnedBlog, UserWithBlogs};
use crate::domain::{BlogEntry, OwnerSummary, User};

/// Owner of a blog as embedded in the blog view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&OwnerSummary> for OwnerView {
    fn from(owner: &OwnerSummary) -> Self {
        Self {
            id: owner.id.to_string(),
            username: owner.username.clone(),
            name: owner.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerView>,
}

impl From<&BlogEntry> for BlogView {
    fn from(entry: &BlogEntry) -> Self {
        let blog = entry.blog();

        Self {
            id: entry.record.id().to_string(),
            title: blog.title().to_string(),
            author: blog.author().map(String::from),
            url: blog.url().to_string(),
            likes: blog.likes(),
            user: entry.owner.as_ref().map(OwnerView::from),
        }
    }
}

/// Blog as listed under its owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnedBlogView {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
}

impl From<OwnedBlog> for OwnedBlogView {
    fn from(blog: OwnedBlog) -> Self {
        Self {
            id: blog.id.to_string(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub blogs: Vec<OwnedBlogView>,
}

impl UserView {
    /// View of a user with no blogs joined, as returned on registration
    pub fn from_user(user: &Stored<User>) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.document().username().to_string(),
            name: user.document().name().map(String::from),
            blogs: Vec::new(),
        }
    }
}

impl From<UserWithBlogs> for UserView {
    fn from(entry: UserWithBlogs) -> Self {
        let mut view = Self::from_user(&entry.user);
        view.blogs = entry.blogs.into_iter().map(OwnedBlogView::from).collect();
        view
    }
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginView {
    pub token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Aggregates over the whole blog list
#[derive(Debug, Clone, Serialize)]
pub struct BlogStatsView {
    pub total_blogs: usize,
    pub total_likes: u64,
    pub favorite_blog: Option<BlogView>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}
