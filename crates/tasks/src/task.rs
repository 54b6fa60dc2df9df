use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskhub_core::{DomainError, Entity, ProjectId, TaskId, TenantId, TenantScoped, UserId};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(Self::Todo),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            other => Err(DomainError::validation(format!("unknown task status '{other}'"))),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl FromStr for TaskPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            other => Err(DomainError::validation(format!("unknown task priority '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    #[serde(skip)]
    pub tenant_id: TenantId,
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(rename = "assignedTo")]
    pub assignee_id: Option<UserId>,
    pub created_by: UserId,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for Task {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn owner_id(&self) -> Option<UserId> {
        Some(self.created_by)
    }

    fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub project_id: ProjectId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn apply(&mut self, update: TaskUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(assignee_id) = update.assignee_id {
            self.assignee_id = Some(assignee_id);
        }
        if let Some(due_date) = update.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = now;
    }
}

/// Optional criteria for listing tasks; all given criteria must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<ProjectId>,
    pub assignee_id: Option<UserId>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.project_id.is_none_or(|p| task.project_id == p)
            && self.assignee_id.is_none_or(|a| task.assignee_id == Some(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        let now = Utc::now();
        Task {
            id: TaskId::new(),
            tenant_id: TenantId::new(),
            project_id: ProjectId::new(),
            title: "Write docs".to_string(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            assignee_id: None,
            created_by: UserId::new(),
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn defaults_are_todo_and_medium() {
        let task = task();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn status_and_priority_use_wire_names() {
        assert_eq!(serde_json::to_string(&TaskStatus::InProgress).unwrap(), "\"IN_PROGRESS\"");
        assert_eq!(serde_json::to_string(&TaskPriority::High).unwrap(), "\"HIGH\"");
        assert_eq!("IN_PROGRESS".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("in_progress".parse::<TaskStatus>().is_err());
        assert!("URGENT".parse::<TaskPriority>().is_err());
    }

    #[test]
    fn filter_requires_every_given_criterion() {
        let mut task = task();
        let assignee = UserId::new();
        task.assignee_id = Some(assignee);
        task.status = TaskStatus::Done;

        assert!(TaskFilter::default().matches(&task));
        assert!(
            TaskFilter {
                status: Some(TaskStatus::Done),
                assignee_id: Some(assignee),
                ..TaskFilter::default()
            }
            .matches(&task)
        );
        assert!(
            !TaskFilter {
                status: Some(TaskStatus::Done),
                priority: Some(TaskPriority::High),
                ..TaskFilter::default()
            }
            .matches(&task)
        );
        assert!(
            !TaskFilter {
                assignee_id: Some(UserId::new()),
                ..TaskFilter::default()
            }
            .matches(&task)
        );
    }

    #[test]
    fn apply_updates_status_and_assignee() {
        let mut task = task();
        let assignee = UserId::new();
        task.apply(
            TaskUpdate {
                status: Some(TaskStatus::InProgress),
                assignee_id: Some(assignee),
                ..TaskUpdate::default()
            },
            Utc::now(),
        );
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assignee_id, Some(assignee));
        assert_eq!(task.title, "Write docs");
    }

    #[test]
    fn serialized_task_uses_assigned_to() {
        let mut task = task();
        task.assignee_id = Some(UserId::new());
        let value = serde_json::to_value(&task).unwrap();
        assert!(value.get("assignedTo").is_some());
        assert_eq!(value["status"], "TODO");
    }
}
