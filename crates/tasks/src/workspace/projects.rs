use chrono::{DateTime, Utc};
use tracing::info;

use taskhub_auth::{IdentityContext, Requirement};
use taskhub_core::{DomainError, DomainResult, ProjectId};

use super::{ADMIN_OR_MANAGER, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, Workspace, guard, limit_text, require_text};
use crate::{NewProject, Project, ProjectUpdate};

const PROJECT: &str = "project";

impl Workspace {
    /// Any user may create a project in their own tenant.
    pub fn create_project(
        &self,
        ctx: &IdentityContext,
        input: NewProject,
        now: DateTime<Utc>,
    ) -> DomainResult<Project> {
        require_text("name", &input.name, MAX_NAME_LEN)?;
        limit_text("description", input.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        let project = Project {
            id: ProjectId::new(),
            tenant_id: ctx.tenant_id(),
            name: input.name,
            description: input.description,
            created_by: ctx.user_id(),
            created_at: now,
            updated_at: now,
        };
        self.projects.upsert(project.id, project.clone())?;

        info!(tenant_id = %project.tenant_id, project_id = %project.id, "project created");
        Ok(project)
    }

    pub fn list_projects(&self, ctx: &IdentityContext) -> DomainResult<Vec<Project>> {
        let mut projects = self.projects.list(ctx.tenant_id())?;
        projects.sort_by_key(|p| p.created_at);
        Ok(projects)
    }

    pub fn get_project(&self, ctx: &IdentityContext, id: ProjectId) -> DomainResult<Project> {
        self.load_project(ctx, id, Requirement::TenantMember)
    }

    pub fn update_project(
        &self,
        ctx: &IdentityContext,
        id: ProjectId,
        update: ProjectUpdate,
        now: DateTime<Utc>,
    ) -> DomainResult<Project> {
        let mut project = self.load_project(ctx, id, Requirement::TenantMember)?;

        if let Some(name) = update.name.as_deref() {
            require_text("name", name, MAX_NAME_LEN)?;
        }
        limit_text("description", update.description.as_deref(), MAX_DESCRIPTION_LEN)?;

        project.apply(update, now);
        self.projects.upsert(project.id, project.clone())?;
        Ok(project)
    }

    /// ADMIN or MANAGER only. Removes the project's tasks and their comments.
    pub fn delete_project(&self, ctx: &IdentityContext, id: ProjectId) -> DomainResult<()> {
        let project = self.load_project(ctx, id, Requirement::AnyRole(ADMIN_OR_MANAGER))?;

        let tasks: Vec<_> = self
            .tasks
            .list(project.tenant_id)?
            .into_iter()
            .filter(|t| t.project_id == project.id)
            .collect();
        for task in &tasks {
            self.remove_task_cascade(task)?;
        }
        self.projects.remove(&project.id)?;

        info!(
            tenant_id = %project.tenant_id,
            project_id = %project.id,
            removed_tasks = tasks.len(),
            "project deleted"
        );
        Ok(())
    }

    pub(super) fn load_project(
        &self,
        ctx: &IdentityContext,
        id: ProjectId,
        requirement: Requirement,
    ) -> DomainResult<Project> {
        let project = self.projects.get(&id)?.ok_or(DomainError::not_found(PROJECT))?;
        guard(ctx, &project, requirement, PROJECT)?;
        Ok(project)
    }
}
