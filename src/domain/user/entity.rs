//! User entity

use serde::{Deserialize, Serialize};

use super::validation::{validate_username, UserValidationError};
use crate::domain::storage::StorageEntity;

/// Registered user as persisted in the `users` collection
///
/// The password hash is part of the stored document; outputs are shaped
/// from `Stored<User>` by the resource service and never include it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    password_hash: String,
}

impl User {
    /// Create a new user from an already computed password hash
    pub fn new(
        username: impl Into<String>,
        name: Option<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let username = username.into();
        validate_username(&username)?;

        Ok(Self {
            username,
            name,
            password_hash: password_hash.into(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

impl StorageEntity for User {
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["username"];

    fn unique_values(&self) -> Vec<(&'static str, String)> {
        vec![("username", self.username.clone())]
    }
}
