//! Task endpoints. All of them require an authenticated session; delete
//! additionally requires the admin role at the route gate.
//!
//! Mutation checks run in a fixed order: authentication (extractor),
//! payload validation, task lookup, then ownership.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use validator::Validate;

use super::model::{CreateTaskRequest, NewTask, TaskData, ToggleDoneRequest, UpdateTaskRequest};
use super::policy::{TaskAction, authorize_task_action};
use crate::auth::identity::{AdminIdentity, Identity};
use crate::gateway::error::{ApiError, ApiResult};
use crate::gateway::state::AppState;

/// List tasks
///
/// GET /tasks — admins see every task, everyone else only their own.
#[utoipa::path(
    get,
    path = "/tasks",
    responses(
        (status = 200, description = "Visible tasks, ordered by id", body = [TaskData]),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Tasks"
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> ApiResult<Json<Vec<TaskData>>> {
    let tasks = if identity.is_admin() {
        state.task_store.list_all().await?
    } else {
        state.task_store.list_by_owner(&identity.username).await?
    };

    Ok(Json(tasks.into_iter().map(TaskData::from).collect()))
}

/// Create a task
///
/// POST /tasks — the owner is always the authenticated caller; an owner
/// field in the body is ignored.
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "Created task", body = TaskData),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "Tasks"
)]
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<TaskData>> {
    req.validate()?;

    let task = state
        .task_store
        .insert(NewTask {
            title: req.title,
            done: req.done,
            owner: identity.username.clone(),
        })
        .await?;

    tracing::info!("Task {} created by '{}'", task.id, identity.username);

    Ok(Json(task.into()))
}

/// Update a task
///
/// PUT /tasks/{id} — owner or admin.
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task id")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskData),
        (status = 400, description = "Blank title"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "No such task")
    ),
    tag = "Tasks"
)]
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskData>> {
    req.validate()?;

    let task = state
        .task_store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    authorize_task_action(&identity, &task, TaskAction::Update)?;

    // The task can disappear between the check and the write; the store
    // update is atomic, so that just surfaces as 404.
    let updated = state
        .task_store
        .update(id, &req.title, req.done)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(updated.into()))
}

/// Toggle the done flag
///
/// PATCH /tasks/{id}/done — owner or admin.
#[utoipa::path(
    patch,
    path = "/tasks/{id}/done",
    params(("id" = i64, Path, description = "Task id")),
    request_body = ToggleDoneRequest,
    responses(
        (status = 200, description = "Updated task", body = TaskData),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not the owner and not an admin"),
        (status = 404, description = "No such task")
    ),
    tag = "Tasks"
)]
pub async fn toggle_done(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Path(id): Path<i64>,
    Json(req): Json<ToggleDoneRequest>,
) -> ApiResult<Json<TaskData>> {
    let task = state
        .task_store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    authorize_task_action(&identity, &task, TaskAction::ToggleDone)?;

    let updated = state
        .task_store
        .set_done(id, req.done)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    Ok(Json(updated.into()))
}

/// Delete a task
///
/// DELETE /tasks/{id} — admin only. The route gate rejects non-admins; the
/// ownership policy runs as well so the rule lives in one place.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task deleted"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "No such task")
    ),
    tag = "Tasks"
)]
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    AdminIdentity(identity): AdminIdentity,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let task = state
        .task_store
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;
    authorize_task_action(&identity, &task, TaskAction::Delete)?;

    if !state.task_store.delete(id).await? {
        return Err(ApiError::not_found("Task not found"));
    }

    tracing::info!("Task {} deleted by '{}'", id, identity.username);

    Ok(StatusCode::OK)
}
