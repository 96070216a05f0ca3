//! Storage domain - Document store abstraction layer

mod entity;
mod repository;

pub use entity::{holds_unique_value, unique_field, DocumentId, StorageEntity, Stored};
pub use repository::Storage;

#[cfg(test)]
pub use repository::mock;
