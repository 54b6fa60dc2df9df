use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use taskhub_auth::UserSummary;

use crate::app::dto::AddUserRequest;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::CurrentIdentity;

/// Add a user to the caller's tenant (ADMIN only).
pub async fn add_user(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    body: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserSummary>), ApiError> {
    let Json(body) = body?;
    let input = body.validate()?;

    let user = services.auth.add_member(&identity, input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
