//! Blog domain
//!
//! The blog document and its invariants, the repository trait and the
//! aggregate helpers used for list statistics.

mod entity;
mod repository;
pub mod stats;
mod validation;

pub use entity::{Blog, BlogInput, BlogPatch};
pub use repository::{BlogEntry, BlogRepository, OwnerSummary};
pub use validation::{validate_likes, validate_title, validate_url, BlogValidationError};
