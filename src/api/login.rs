//! Token login endpoint

use axum::extract::State;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::LoginView;

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login with username and password
///
/// POST /api/login
///
/// Returns a JWT token to send as `Authorization: Bearer <token>`.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginView>, ApiError> {
    debug!(username = %request.username, "Login attempt");

    let login = state
        .resources
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(login))
}
