//! Storage abstraction for users and tasks.
//!
//! Traits keep handlers testable against the in-memory implementations and
//! let the service run without PostgreSQL in development.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::auth::identity::Role;
use crate::tasks::model::{NewTask, Task};

pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore, init_schema};

/// Stored credential record. The password hash is opaque (argon2 PHC
/// string) and never serialized outward.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; `created_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint hit (e.g. username taken).
    #[error("{0} already exists")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::Duplicate`] when the
    /// username is taken.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Look up a user by username.
    async fn find(&self, username: &str) -> Result<Option<User>, StoreError>;
}

/// Task store. Ids are store-assigned, unique and monotonically
/// increasing; list results are ordered by id. Updates are atomic per
/// record.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError>;

    /// Replace title and done. Returns the updated task, or None when the
    /// id does not exist.
    async fn update(&self, id: i64, title: &str, done: bool) -> Result<Option<Task>, StoreError>;

    /// Set only the done flag. Returns the updated task, or None when the
    /// id does not exist.
    async fn set_done(&self, id: i64, done: bool) -> Result<Option<Task>, StoreError>;

    /// Delete by id. Returns false when the id does not exist.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
