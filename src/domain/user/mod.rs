//! User domain
//!
//! This module provides domain types and traits for user registration and
//! authentication: the user document, validation rules and the registry trait.

mod entity;
mod registry;
mod validation;

pub use entity::User;
pub use registry::{NewUser, OwnedBlog, UserRegistry, UserWithBlogs};
pub use validation::{
    validate_password, validate_username, UserValidationError, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
