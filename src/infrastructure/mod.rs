//! Infrastructure layer - Storage backends, repositories and services

pub mod auth;
pub mod blog;
pub mod logging;
pub mod services;
pub mod storage;
pub mod user;
