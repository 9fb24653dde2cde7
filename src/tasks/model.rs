//! Task records and wire DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Stored task record. `owner` is the owning username, set at creation
/// from the authenticated caller and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub owner: String,
}

/// Insert payload; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub done: bool,
    pub owner: String,
}

/// Task as serialized to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskData {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Buy groceries")]
    pub title: String,
    pub done: bool,
    #[schema(example = "alice")]
    pub owner: String,
}

impl From<Task> for TaskData {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            done: t.done,
            owner: t.owner,
        }
    }
}

/// POST /tasks body. Unknown fields (an attempted `owner`, for instance)
/// are ignored; the owner always comes from the session.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTaskRequest {
    #[schema(example = "Buy groceries")]
    #[validate(custom(function = "validate_not_blank", message = "Title must not be blank"))]
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

/// PUT /tasks/{id} body (full update).
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTaskRequest {
    #[validate(custom(function = "validate_not_blank", message = "Title must not be blank"))]
    pub title: String,
    pub done: bool,
}

/// PATCH /tasks/{id}/done body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleDoneRequest {
    pub done: bool,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_blank"));
    }
    Ok(())
}
