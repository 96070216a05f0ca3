//! Bloglist API
//!
//! A small HTTP service for a shared list of blog entries:
//! - Blog entries with create, read, update and delete
//! - User registration with Argon2 password hashing
//! - Token login; authenticated creates record the entry's owner
//! - In-memory or PostgreSQL document storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::AuthConfig;
use domain::{Blog, Storage, User};
use infrastructure::{
    auth::{JwtConfig, JwtService},
    blog::StorageBlogRepository,
    services::ResourceService,
    storage::StorageFactory,
    user::{Argon2Hasher, StorageUserRegistry},
};
use rand::Rng;
use tracing::{info, warn};

/// Create the application state from configuration
///
/// Opens the configured storage backend and one store per collection.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    config.auth.validate()?;
    let jwt_config = create_jwt_config(&config.auth);

    let storage_config = config.storage.storage_config()?;
    info!(backend = ?storage_config.storage_type(), "Opening storage");

    let backend = StorageFactory::open(&storage_config).await?;
    let blogs = StorageFactory::collection::<Blog>(&backend).await?;
    let users = StorageFactory::collection::<User>(&backend).await?;

    Ok(build_app_state(blogs, users, jwt_config))
}

/// JWT settings from the configured secret, or a random one
fn create_jwt_config(auth: &AuthConfig) -> JwtConfig {
    let secret = auth.secret().map(String::from).unwrap_or_else(|| {
        warn!(
            "No auth.jwt_secret configured. Generating random secret. \
            Tokens will NOT survive a restart. \
            Set APP__AUTH__JWT_SECRET for persistent sessions."
        );
        generate_random_secret()
    });

    JwtConfig::new(secret, auth.token_expiration_hours)
}

/// Generate a random JWT secret
fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Wire the services over already opened stores
pub fn build_app_state(
    blogs: Arc<dyn Storage<Blog>>,
    users: Arc<dyn Storage<User>>,
    jwt_config: JwtConfig,
) -> AppState {
    let blog_repository = Arc::new(StorageBlogRepository::new(blogs.clone(), users.clone()));
    let user_registry = Arc::new(StorageUserRegistry::new(
        users,
        blogs,
        Arc::new(Argon2Hasher::new()),
    ));
    let jwt_service = Arc::new(JwtService::new(jwt_config));

    AppState::new(Arc::new(ResourceService::new(
        blog_repository,
        user_registry,
        jwt_service,
    )))
}
