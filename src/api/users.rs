//! User registration and listing endpoints

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::{RegisterUserRequest, UserView};

/// Create the user router
pub fn create_users_router() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(register_user))
}

/// Request to register a user
///
/// Missing `username` or `password` fall through to the length checks.
#[derive(Clone, Deserialize)]
pub struct RegisterUserApiRequest {
    #[serde(default)]
    pub username: String,
    pub name: Option<String>,
    #[serde(default)]
    pub password: String,
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserView>>, ApiError> {
    debug!("Listing users");

    Ok(Json(state.resources.list_users().await?))
}

/// POST /api/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserApiRequest>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    debug!(username = %request.username, "Registering user");

    let user = state
        .resources
        .register_user(RegisterUserRequest {
            username: request.username,
            name: request.name,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
