//! Content endpoints. Reads are public; writes take an `AuthAdmin`.
//!
//! Handlers are generic over the document type and instantiated per route
//! in `app::portfolio_routes`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::{CollectionItem, SectionDocument};
use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthAdmin;

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("JSON serialization error: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })
}

/// GET /api/portfolio/{hero|about|contact} - the document, or `{}` when unset
pub async fn get_section<T: SectionDocument>(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let document = match state.portfolio.section::<T>().await? {
        Some(document) => to_json(&document)?,
        None => json!({}),
    };
    Ok(Json(document))
}

/// PUT /api/portfolio/{hero|about|contact}
pub async fn replace_section<T: SectionDocument>(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(document): Json<T>,
) -> ApiResult<Json<Value>> {
    state.portfolio.replace_section(&document).await?;
    tracing::info!("{} replaced by {}", T::LABEL, admin.username);
    Ok(Json(json!({ "message": format!("{} updated", T::LABEL) })))
}

/// GET /api/portfolio/{skills|projects} - sorted by `order`
pub async fn list_items<T: CollectionItem>(State(state): State<AppState>) -> ApiResult<Json<Vec<T>>> {
    Ok(Json(state.portfolio.list::<T>().await?))
}

/// POST /api/portfolio/{skills|projects}
pub async fn add_item<T: CollectionItem>(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Json(item): Json<T>,
) -> ApiResult<Json<Value>> {
    let id = state.portfolio.add(&item).await?;
    tracing::info!("{} {} added by {}", T::LABEL, id, admin.username);
    Ok(Json(json!({ "message": format!("{} added", T::LABEL), "id": id })))
}

/// PUT /api/portfolio/{skills|projects}/:id - an unknown id is a no-op
pub async fn replace_item<T: CollectionItem>(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(id): Path<String>,
    Json(item): Json<T>,
) -> ApiResult<Json<Value>> {
    if state.portfolio.replace(&id, item).await? {
        tracing::info!("{} {} replaced by {}", T::LABEL, id, admin.username);
    } else {
        tracing::debug!("{} {} not found, nothing replaced", T::LABEL, id);
    }
    Ok(Json(json!({ "message": format!("{} updated", T::LABEL) })))
}

/// DELETE /api/portfolio/{skills|projects}/:id - an unknown id is a no-op
pub async fn delete_item<T: CollectionItem>(
    State(state): State<AppState>,
    admin: AuthAdmin,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if state.portfolio.remove::<T>(&id).await? {
        tracing::info!("{} {} deleted by {}", T::LABEL, id, admin.username);
    }
    Ok(Json(json!({ "message": format!("{} deleted", T::LABEL) })))
}
