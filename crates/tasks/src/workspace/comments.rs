use chrono::{DateTime, Utc};
use tracing::info;

use taskhub_auth::{IdentityContext, Requirement};
use taskhub_core::{CommentId, DomainError, DomainResult, TaskId};

use super::{MAX_COMMENT_LEN, Workspace, guard, require_text};
use crate::{Comment, NewComment};

const COMMENT: &str = "comment";

impl Workspace {
    pub fn add_comment(
        &self,
        ctx: &IdentityContext,
        task_id: TaskId,
        input: NewComment,
        now: DateTime<Utc>,
    ) -> DomainResult<Comment> {
        let task = self.load_task(ctx, task_id, Requirement::TenantMember)?;
        require_text("content", &input.content, MAX_COMMENT_LEN)?;

        let comment = Comment {
            id: CommentId::new(),
            tenant_id: ctx.tenant_id(),
            task_id: task.id,
            author_id: ctx.user_id(),
            author_email: ctx.email().to_string(),
            author_name: input.author_name,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        self.comments.upsert(comment.id, comment.clone())?;

        info!(tenant_id = %comment.tenant_id, task_id = %task.id, comment_id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Comments on a task, newest first.
    pub fn list_comments(&self, ctx: &IdentityContext, task_id: TaskId) -> DomainResult<Vec<Comment>> {
        let task = self.load_task(ctx, task_id, Requirement::TenantMember)?;

        let mut comments: Vec<_> = self
            .comments
            .list(task.tenant_id)?
            .into_iter()
            .filter(|c| c.task_id == task.id)
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    /// The comment's author or any ADMIN.
    pub fn delete_comment(&self, ctx: &IdentityContext, task_id: TaskId, comment_id: CommentId) -> DomainResult<()> {
        let task = self.load_task(ctx, task_id, Requirement::TenantMember)?;

        let comment = self
            .comments
            .get(&comment_id)?
            .filter(|c| c.task_id == task.id)
            .ok_or(DomainError::not_found(COMMENT))?;
        guard(ctx, &comment, Requirement::OwnerOrAdmin, COMMENT)?;

        self.comments.remove(&comment.id)?;
        info!(tenant_id = %comment.tenant_id, comment_id = %comment.id, deleted_by = %ctx.user_id(), "comment deleted");
        Ok(())
    }
}
