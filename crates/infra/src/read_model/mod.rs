//! Storage for tenant-scoped resources (projects, tasks, comments).

pub mod tenant_store;

pub use tenant_store::InMemoryResourceStore;
