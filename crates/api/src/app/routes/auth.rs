use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use taskhub_auth::AuthOutcome;

use crate::app::dto::{LoginRequest, RegisterRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthOutcome>), ApiError> {
    let Json(body) = body?;
    let input = body.validate()?;

    let outcome = services.auth.register(input, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthOutcome>, ApiError> {
    let Json(body) = body?;
    body.validate()?;

    let outcome = services.auth.login(&body.email, &body.password, Utc::now()).await?;
    Ok(Json(outcome))
}
