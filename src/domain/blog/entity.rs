//! Blog entity and its create/update inputs

use serde::{Deserialize, Serialize};

use super::validation::{validate_likes, validate_title, validate_url, BlogValidationError};
use crate::domain::storage::{DocumentId, StorageEntity};

/// Fields accepted when creating a blog
///
/// There is no identifier field: identifiers are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl BlogPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.url.is_none() && self.likes.is_none()
    }
}

/// Blog entry as persisted in the `blogs` collection
///
/// Construction and patching both validate, so a `Blog` value always has a
/// non-empty title and url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    url: String,
    #[serde(default)]
    likes: u64,
    /// Weak reference to the owning user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<DocumentId>,
}

impl Blog {
    /// Create a blog from client input, defaulting likes to zero
    pub fn new(input: BlogInput, owner: Option<DocumentId>) -> Result<Self, BlogValidationError> {
        let title = validate_title(input.title.as_deref())?.to_string();
        let url = validate_url(input.url.as_deref())?.to_string();
        let likes = match input.likes {
            Some(likes) => validate_likes(likes)?,
            None => 0,
        };

        Ok(Self {
            title,
            author: input.author,
            url,
            likes,
            owner,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn owner(&self) -> Option<&DocumentId> {
        self.owner.as_ref()
    }

    /// Merge a patch into a copy of this blog
    ///
    /// Every supplied field is validated before anything is merged, so an
    /// invalid patch leaves no partially applied result.
    pub fn patched(&self, patch: &BlogPatch) -> Result<Self, BlogValidationError> {
        let title = match patch.title.as_deref() {
            Some(t) => validate_title(Some(t))?.to_string(),
            None => self.title.clone(),
        };
        let url = match patch.url.as_deref() {
            Some(u) => validate_url(Some(u))?.to_string(),
            None => self.url.clone(),
        };
        let likes = match patch.likes {
            Some(likes) => validate_likes(likes)?,
            None => self.likes,
        };

        Ok(Self {
            title,
            author: patch.author.clone().or_else(|| self.author.clone()),
            url,
            likes,
            owner: self.owner.clone(),
        })
    }
}

impl StorageEntity for Blog {
    const COLLECTION: &'static str = "blogs";
}
