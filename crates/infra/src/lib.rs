//! Infrastructure layer: credential and resource storage adapters.

pub mod credentials;
pub mod read_model;


pub use credentials::{InMemoryCredentialStore, PostgresCredentialStore};
pub use read_model::InMemoryResourceStore;
