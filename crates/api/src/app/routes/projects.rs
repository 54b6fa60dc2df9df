use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use taskhub_core::ProjectId;
use taskhub_tasks::Project;

use crate::app::dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::app::errors::ApiError;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/:id", get(get_project).put(update_project).delete(delete_project))
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    body: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let Json(body) = body?;
    let project = services
        .workspace
        .create_project(&identity, body.into(), Utc::now())?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Vec<Project>>, ApiError> {
    Ok(Json(services.workspace.list_projects(&identity)?))
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let id: ProjectId = parse_id(&id)?;
    Ok(Json(services.workspace.get_project(&identity, id)?))
}

pub async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    body: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> Result<Json<Project>, ApiError> {
    let id: ProjectId = parse_id(&id)?;
    let Json(body) = body?;
    let project = services
        .workspace
        .update_project(&identity, id, body.into(), Utc::now())?;
    Ok(Json(project))
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: ProjectId = parse_id(&id)?;
    services.workspace.delete_project(&identity, id)?;
    Ok(StatusCode::NO_CONTENT)
}
