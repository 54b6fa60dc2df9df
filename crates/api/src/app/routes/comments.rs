use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use taskhub_core::{CommentId, TaskId};
use taskhub_tasks::{Comment, NewComment};

use crate::app::dto::CreateCommentRequest;
use crate::app::errors::ApiError;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;
use crate::context::CurrentIdentity;

pub async fn add_comment(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(task_id): Path<String>,
    body: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let task_id: TaskId = parse_id(&task_id)?;
    let Json(body) = body?;

    let author = services.auth.profile(&identity).await?;
    let input = NewComment {
        content: body.content,
        author_name: format!("{} {}", author.first_name, author.last_name),
    };
    let comment = services.workspace.add_comment(&identity, task_id, input, Utc::now())?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Newest first.
pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path(task_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let task_id: TaskId = parse_id(&task_id)?;
    Ok(Json(services.workspace.list_comments(&identity, task_id)?))
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentIdentity(identity): CurrentIdentity,
    Path((task_id, comment_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let task_id: TaskId = parse_id(&task_id)?;
    let comment_id: CommentId = parse_id(&comment_id)?;
    services.workspace.delete_comment(&identity, task_id, comment_id)?;
    Ok(StatusCode::NO_CONTENT)
}
