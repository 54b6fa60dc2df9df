use chrono::{DateTime, Utc};
use tracing::info;

use taskhub_auth::{IdentityContext, Requirement};
use taskhub_core::{DomainError, DomainResult, ProjectId, TaskId};

use super::{ADMIN_OR_MANAGER, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, Workspace, guard, limit_text, require_text};
use crate::{NewTask, Task, TaskFilter, TaskUpdate};

const TASK: &str = "task";
const PROJECT: &str = "project";

impl Workspace {
    /// ADMIN or MANAGER only.
    ///
    /// The target project is tenant-checked first, so a foreign project is
    /// reported as not found whatever the caller's role.
    pub fn create_task(&self, ctx: &IdentityContext, input: NewTask, now: DateTime<Utc>) -> DomainResult<Task> {
        let project = self.load_project(ctx, input.project_id, Requirement::TenantMember)?;
        guard(ctx, &project, Requirement::AnyRole(ADMIN_OR_MANAGER), PROJECT)?;

        require_text("title", &input.title, MAX_NAME_LEN)?;
        limit_text("description", input.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        let task = Task {
            id: TaskId::new(),
            tenant_id: ctx.tenant_id(),
            project_id: project.id,
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            assignee_id: input.assignee_id,
            created_by: ctx.user_id(),
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        self.tasks.upsert(task.id, task.clone())?;

        info!(tenant_id = %task.tenant_id, project_id = %task.project_id, task_id = %task.id, "task created");
        Ok(task)
    }

    pub fn list_tasks(&self, ctx: &IdentityContext, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        let mut tasks: Vec<_> = self
            .tasks
            .list(ctx.tenant_id())?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        tasks.sort_by_key(|t| t.created_at);
        Ok(tasks)
    }

    pub fn list_project_tasks(&self, ctx: &IdentityContext, project_id: ProjectId) -> DomainResult<Vec<Task>> {
        let project = self.load_project(ctx, project_id, Requirement::TenantMember)?;
        self.list_tasks(
            ctx,
            TaskFilter {
                project_id: Some(project.id),
                ..TaskFilter::default()
            },
        )
    }

    /// Tasks assigned to the caller.
    pub fn my_tasks(&self, ctx: &IdentityContext) -> DomainResult<Vec<Task>> {
        self.list_tasks(
            ctx,
            TaskFilter {
                assignee_id: Some(ctx.user_id()),
                ..TaskFilter::default()
            },
        )
    }

    pub fn get_task(&self, ctx: &IdentityContext, id: TaskId) -> DomainResult<Task> {
        self.load_task(ctx, id, Requirement::TenantMember)
    }

    /// Any user of the task's tenant.
    pub fn update_task(
        &self,
        ctx: &IdentityContext,
        id: TaskId,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> DomainResult<Task> {
        let mut task = self.load_task(ctx, id, Requirement::TenantMember)?;

        if let Some(title) = update.title.as_deref() {
            require_text("title", title, MAX_NAME_LEN)?;
        }
        limit_text("description", update.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        task.apply(update, now);
        self.tasks.upsert(task.id, task.clone())?;

        info!(tenant_id = %task.tenant_id, task_id = %task.id, updated_by = %ctx.user_id(), "task updated");
        Ok(task)
    }

    /// ADMIN or MANAGER only. Removes the task's comments.
    pub fn delete_task(&self, ctx: &IdentityContext, id: TaskId) -> DomainResult<()> {
        let task = self.load_task(ctx, id, Requirement::AnyRole(ADMIN_OR_MANAGER))?;
        self.remove_task_cascade(&task)?;

        info!(tenant_id = %task.tenant_id, task_id = %task.id, "task deleted");
        Ok(())
    }

    pub(super) fn load_task(&self, ctx: &IdentityContext, id: TaskId, requirement: Requirement) -> DomainResult<Task> {
        let task = self.tasks.get(&id)?.ok_or(DomainError::not_found(TASK))?;
        guard(ctx, &task, requirement, TASK)?;
        Ok(task)
    }

    pub(super) fn remove_task_cascade(&self, task: &Task) -> DomainResult<()> {
        for comment in self.comments.list(task.tenant_id)? {
            if comment.task_id == task.id {
                self.comments.remove(&comment.id)?;
            }
        }
        self.tasks.remove(&task.id)?;
        Ok(())
    }
}
