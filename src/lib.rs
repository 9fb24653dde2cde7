//! taskhive - Multi-Tenant To-Do Service
//!
//! A small task service with a stateless-JWT auth core: users register,
//! authenticate, and manage personal tasks; administrators see and manage
//! all tasks.
//!
//! # Modules
//!
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing setup (rolling file + stdout)
//! - [`db`] - PostgreSQL connection pool
//! - [`auth`] - token codec, session middleware, route gates, auth endpoints
//! - [`tasks`] - task records, ownership policy, task endpoints
//! - [`store`] - user/task store traits with Postgres and in-memory backends
//! - [`gateway`] - router assembly, error taxonomy, health, OpenAPI

// Infrastructure - config first
pub mod config;
pub mod db;
pub mod logging;

// Domain components
pub mod auth;
pub mod store;
pub mod tasks;

// HTTP surface
pub mod gateway;

// Convenient re-exports at crate root
pub use auth::{Claims, Identity, Role, TokenCodec, VerifyError};
pub use config::AppConfig;
pub use gateway::error::{ApiError, ApiResult};
pub use gateway::state::AppState;
pub use store::{
    MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, StoreError, TaskStore, User,
    UserStore,
};
pub use tasks::{Task, TaskAction, TaskData};
