//! Per-task authorization policy.
//!
//! Pure function over (identity, task, action); no store access, no clock.
//! Route-level gating (authenticated / admin) has already happened by the
//! time this runs, so the only question left is ownership.

use super::model::Task;
use crate::auth::identity::Identity;
use crate::gateway::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Update,
    ToggleDone,
    Delete,
}

impl TaskAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Update | Self::ToggleDone => "update",
            Self::Delete => "delete",
        }
    }
}

/// Allow admins and the task owner; reject everyone else with the
/// action-specific message. Username comparison is case-sensitive.
pub fn authorize_task_action(
    identity: &Identity,
    task: &Task,
    action: TaskAction,
) -> Result<(), ApiError> {
    if identity.is_admin() || identity.username == task.owner {
        return Ok(());
    }
    Err(ApiError::forbidden(format!(
        "You are not allowed to {} this task",
        action.verb()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Role;

    fn identity(username: &str, roles: Vec<Role>) -> Identity {
        Identity {
            username: username.to_string(),
            roles,
        }
    }

    fn task_owned_by(owner: &str) -> Task {
        Task {
            id: 1,
            title: "t".to_string(),
            done: false,
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_owner_may_update() {
        let alice = identity("alice", vec![Role::User]);
        let task = task_owned_by("alice");
        assert!(authorize_task_action(&alice, &task, TaskAction::Update).is_ok());
        assert!(authorize_task_action(&alice, &task, TaskAction::ToggleDone).is_ok());
    }

    #[test]
    fn test_admin_may_touch_any_task() {
        let admin = identity("root", vec![Role::Admin]);
        let task = task_owned_by("alice");
        for action in [TaskAction::Update, TaskAction::ToggleDone, TaskAction::Delete] {
            assert!(authorize_task_action(&admin, &task, action).is_ok());
        }
    }

    #[test]
    fn test_stranger_gets_action_specific_message() {
        let mallory = identity("mallory", vec![Role::User]);
        let task = task_owned_by("alice");

        let err = authorize_task_action(&mallory, &task, TaskAction::Update).unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to update this task");

        let err = authorize_task_action(&mallory, &task, TaskAction::ToggleDone).unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to update this task");

        let err = authorize_task_action(&mallory, &task, TaskAction::Delete).unwrap_err();
        assert_eq!(err.to_string(), "You are not allowed to delete this task");
    }

    #[test]
    fn test_owner_comparison_is_case_sensitive() {
        let alice_upper = identity("Alice", vec![Role::User]);
        let task = task_owned_by("alice");
        assert!(authorize_task_action(&alice_upper, &task, TaskAction::Update).is_err());
    }
}
