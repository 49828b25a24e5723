use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiResult;

/// Body of both admin endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLogin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub message: String,
}

/// POST /api/admin/setup - create the admin; only works while none exists
pub async fn setup(State(state): State<AppState>, Json(body): Json<AdminLogin>) -> ApiResult<Json<Value>> {
    state.credentials.create_admin(&body.username, &body.password).await?;
    Ok(Json(json!({ "message": "Admin created successfully" })))
}

/// POST /api/admin/login - exchange admin credentials for a bearer token
pub async fn login(State(state): State<AppState>, Json(body): Json<AdminLogin>) -> ApiResult<Json<LoginResponse>> {
    let username = body.username.trim();
    state.credentials.authenticate(username, &body.password).await?;
    let token = state.sessions.issue(username)?;
    tracing::info!("Admin {} logged in", username);

    Ok(Json(LoginResponse {
        token,
        message: "Login successful".to_string(),
    }))
}
