use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated admin extracted from a valid bearer token.
///
/// Taking this as a handler argument makes the route protected: requests
/// without a valid `Authorization: Bearer <token>` header are rejected with
/// 401 before the handler body runs.
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub username: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).map_err(ApiError::unauthorized)?;

        let username = state.sessions.verify(token).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthAdmin { username })
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, String> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| "Not authenticated".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    let (scheme, token) = auth_str
        .split_once(' ')
        .ok_or_else(|| "Authorization header must use Bearer token format".to_string())?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format".to_string());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty bearer token".to_string());
    }
    Ok(token)
}
