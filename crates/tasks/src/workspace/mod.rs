//! The `Workspace` service: tenant-scoped operations on projects, tasks and
//! comments.

mod comments;
mod projects;
mod tasks;

use std::sync::Arc;

use taskhub_auth::{AuthzError, IdentityContext, Requirement, ResourceMeta, Role, authorize_logged};
use taskhub_core::{CommentId, DomainError, DomainResult, ProjectId, TaskId, TenantScoped};

use crate::{Comment, Project, ResourceStore, Task};

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_COMMENT_LEN: usize = 2000;

const ADMIN_OR_MANAGER: &[Role] = &[Role::Admin, Role::Manager];

pub struct Workspace {
    projects: Arc<dyn ResourceStore<ProjectId, Project>>,
    tasks: Arc<dyn ResourceStore<TaskId, Task>>,
    comments: Arc<dyn ResourceStore<CommentId, Comment>>,
}

impl Workspace {
    pub fn new(
        projects: Arc<dyn ResourceStore<ProjectId, Project>>,
        tasks: Arc<dyn ResourceStore<TaskId, Task>>,
        comments: Arc<dyn ResourceStore<CommentId, Comment>>,
    ) -> Self {
        Self {
            projects,
            tasks,
            comments,
        }
    }
}

/// Run the guard for `resource`, translating the decision into a domain error.
///
/// A tenant mismatch reads exactly like a missing `kind`.
fn guard<R: TenantScoped>(
    ctx: &IdentityContext,
    resource: &R,
    requirement: Requirement,
    kind: &'static str,
) -> DomainResult<()> {
    authorize_logged(ctx, &ResourceMeta::of(resource), requirement).map_err(|e| match e {
        AuthzError::NotFound => DomainError::not_found(kind),
        AuthzError::Forbidden(msg) => DomainError::forbidden(msg),
    })
}

fn require_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    limit_text(field, Some(value), max)
}

fn limit_text(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(DomainError::validation(format!(
            "{field} must not exceed {max} characters"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_limits() {
        assert!(require_text("title", "ok", 5).is_ok());
        assert!(require_text("title", "   ", 5).is_err());
        assert!(require_text("title", "toolong", 5).is_err());
        assert!(limit_text("description", None, 5).is_ok());
        assert!(limit_text("description", Some("ééééé"), 5).is_ok());
    }
}
