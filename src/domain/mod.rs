//! Domain layer - Core business rules and entities

pub mod blog;
pub mod error;
pub mod storage;
pub mod user;

pub use blog::{Blog, BlogEntry, BlogInput, BlogPatch, BlogRepository, OwnerSummary};
pub use error::DomainError;
pub use storage::{DocumentId, Storage, StorageEntity, Stored};
pub use user::{NewUser, User, UserRegistry, UserWithBlogs};
