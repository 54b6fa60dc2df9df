use std::sync::Arc;

use axum::{extract::Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};

use taskhub_auth::UserSummary;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CurrentIdentity;

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "message": "Task Management API is running",
        "timestamp": Utc::now(),
    }))
}

/// Stored profile of the caller.
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<UserSummary>, ApiError> {
    let profile = services.auth.profile(&identity).await?;
    Ok(Json(profile))
}
