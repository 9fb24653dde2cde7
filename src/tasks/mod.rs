//! Task domain: records, ownership policy, endpoints.
//!
//! ## Components
//! - `model`: `Task` record and wire DTOs
//! - `policy`: owner-or-admin authorization for task mutations
//! - `handlers`: list/create/update/toggle/delete endpoints

pub mod handlers;
pub mod model;
pub mod policy;

// Re-export commonly used types
pub use model::{NewTask, Task, TaskData};
pub use policy::{TaskAction, authorize_task_action};
