//! User infrastructure module
//!
//! Password hashing with Argon2 and the user registry built on the document store.

mod password;
mod registry;

pub use password::{Argon2Hasher, PasswordHasher};
pub use registry::StorageUserRegistry;

#[cfg(test)]
pub use password::fake;
