use chrono::{DateTime, Utc};
use serde::Deserialize;

use taskhub_auth::{NewMemberInput, RegisterInput, Role};
use taskhub_core::{ProjectId, UserId};
use taskhub_tasks::{NewProject, NewTask, ProjectUpdate, TaskFilter, TaskPriority, TaskStatus, TaskUpdate};

use crate::app::errors::ApiError;

pub const MIN_PASSWORD_LEN: usize = 6;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub organization_name: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<RegisterInput, ApiError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        required("firstName", &self.first_name)?;
        required("lastName", &self.last_name)?;
        required("organizationName", &self.organization_name)?;

        Ok(RegisterInput {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            organization_name: self.organization_name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        required("email", &self.email)?;
        required("password", &self.password)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_member_role")]
    pub role: Role,
}

fn default_member_role() -> Role {
    Role::Member
}

impl AddUserRequest {
    pub fn validate(self) -> Result<NewMemberInput, ApiError> {
        check_email(&self.email)?;
        check_password(&self.password)?;
        required("firstName", &self.first_name)?;
        required("lastName", &self.last_name)?;

        Ok(NewMemberInput {
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            role: self.role,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

impl From<CreateProjectRequest> for NewProject {
    fn from(body: CreateProjectRequest) -> Self {
        NewProject {
            name: body.name,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateProjectRequest> for ProjectUpdate {
    fn from(body: UpdateProjectRequest) -> Self {
        ProjectUpdate {
            name: body.name,
            description: body.description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(body: CreateTaskRequest) -> Self {
        NewTask {
            project_id: body.project_id,
            title: body.title,
            description: body.description,
            status: body.status,
            priority: body.priority,
            assignee_id: body.assigned_to,
            due_date: body.due_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<UpdateTaskRequest> for TaskUpdate {
    fn from(body: UpdateTaskRequest) -> Self {
        TaskUpdate {
            title: body.title,
            description: body.description,
            status: body.status,
            priority: body.priority,
            assignee_id: body.assigned_to,
            due_date: body.due_date,
        }
    }
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<UserId>,
}

impl From<TaskQuery> for TaskFilter {
    fn from(query: TaskQuery) -> Self {
        TaskFilter {
            status: query.status,
            priority: query.priority,
            project_id: query.project_id,
            assignee_id: query.assignee_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

// -------------------------
// Validation helpers
// -------------------------

fn required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

fn check_email(email: &str) -> Result<(), ApiError> {
    required("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::InvalidInput("email must be a valid email address".to_string())),
    }
}

fn check_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::InvalidInput(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
