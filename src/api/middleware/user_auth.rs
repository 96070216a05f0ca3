//! User authentication using JWT tokens

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::storage::DocumentId;

/// Extractor for an optional authenticated user
///
/// Without an `Authorization` header the request is anonymous. A header that
/// is present but does not carry a valid `Bearer` token for an existing user
/// rejects the request with 401.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<DocumentId>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = extract_jwt_token(&parts.headers)? else {
            return Ok(OptionalUser(None));
        };

        debug!("Validating JWT token");

        let user_id = state
            .resources
            .authenticate_token(&token)
            .await
            .inspect_err(|e| warn!(error = %e, "Rejected bearer token"))?;

        Ok(OptionalUser(Some(user_id)))
    }
}

/// Extract a JWT token from the Authorization header
///
/// Returns `Ok(None)` when no header is sent at all.
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::unauthorized(
            "Provide a JWT token via 'Authorization: Bearer <token>' header",
        )),
    }
}
