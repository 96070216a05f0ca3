//! Blog infrastructure module

mod repository;

pub use repository::StorageBlogRepository;
