//! Tenant-scoped task management resources.
//!
//! Projects, tasks and comments, plus the [`Workspace`] service. Every
//! operation takes the caller's [`taskhub_auth::IdentityContext`] explicitly
//! and passes through the authorization guard before touching a resource.

pub mod comment;
pub mod project;
pub mod store;
pub mod task;
pub mod workspace;

pub use comment::{Comment, NewComment};
pub use project::{NewProject, Project, ProjectUpdate};
pub use store::ResourceStore;
pub use task::{NewTask, Task, TaskFilter, TaskPriority, TaskStatus, TaskUpdate};
pub use workspace::Workspace;
