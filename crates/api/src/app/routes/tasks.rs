use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use chrono::Utc;

use taskhub_core::{ProjectId, TaskId};
use taskhub_tasks::{Task, TaskFilter, TaskPriority, TaskStatus};

use crate::app::dto::{CreateTaskRequest, TaskQuery, UpdateTaskRequest};
use crate::app::errors::ApiError;
use crate::app::routes::{comments, parse_id};
use crate::app::services::AppServices;
use crate::context::CurrentIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/my-tasks", get(my_tasks))
        .route("/project/:project_id", get(list_project_tasks))
        .route("/status/:status", get(list_tasks_by_status))
        .route("/priority/:priority", get(list_tasks_by_priority))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/comments", get(comments::list_comments).post(comments::add_comment))
        .route("/:id/comments/:comment_id", delete(comments::delete_comment))
}

pub async fn create_task(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(body) = body?;
    let task = services.workspace.create_task(&identity, body.into(), Utc::now())?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Tasks of the caller's tenant, optionally filtered by query string.
pub async fn list_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    query: Result<Query<TaskQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let Query(query) = query?;
    Ok(Json(services.workspace.list_tasks(&identity, query.into())?))
}

/// `GET /api/tasks/status/{status}`: shorthand for `?status=`.
pub async fn list_tasks_by_status(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(status): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = TaskFilter {
        status: Some(status.parse::<TaskStatus>()?),
        ..TaskFilter::default()
    };
    Ok(Json(services.workspace.list_tasks(&identity, filter)?))
}

/// `GET /api/tasks/priority/{priority}`: shorthand for `?priority=`.
pub async fn list_tasks_by_priority(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(priority): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let filter = TaskFilter {
        priority: Some(priority.parse::<TaskPriority>()?),
        ..TaskFilter::default()
    };
    Ok(Json(services.workspace.list_tasks(&identity, filter)?))
}

pub async fn my_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(services.workspace.my_tasks(&identity)?))
}

pub async fn list_project_tasks(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let project_id: ProjectId = parse_id(&project_id)?;
    Ok(Json(services.workspace.list_project_tasks(&identity, project_id)?))
}

pub async fn get_task(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id: TaskId = parse_id(&id)?;
    Ok(Json(services.workspace.get_task(&identity, id)?))
}

pub async fn update_task(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let id: TaskId = parse_id(&id)?;
    let Json(body) = body?;
    let task = services
        .workspace
        .update_task(&identity, id, body.into(), Utc::now())?;
    Ok(Json(task))
}

pub async fn delete_task(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: TaskId = parse_id(&id)?;
    services.workspace.delete_task(&identity, id)?;
    Ok(StatusCode::NO_CONTENT)
}
