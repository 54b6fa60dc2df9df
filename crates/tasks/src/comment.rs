use chrono::{DateTime, Utc};
use serde::Serialize;

use taskhub_core::{CommentId, Entity, TaskId, TenantId, TenantScoped, UserId};

/// A comment on a task. The author is its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(skip)]
    pub tenant_id: TenantId,
    pub task_id: TaskId,
    #[serde(rename = "userId")]
    pub author_id: UserId,
    #[serde(rename = "userEmail")]
    pub author_email: String,
    /// Display name ("First Last") at the time of writing.
    #[serde(rename = "userName")]
    pub author_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub author_name: String,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for Comment {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn owner_id(&self) -> Option<UserId> {
        Some(self.author_id)
    }
}
