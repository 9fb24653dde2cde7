//! In-memory store implementations.
//!
//! Back the test suite and the no-database development mode. DashMap gives
//! per-entry locking, so record updates do not interleave.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use super::{NewUser, StoreError, TaskStore, User, UserStore};
use crate::tasks::model::{NewTask, Task};

/// Thread-safe in-memory credential store keyed by username.
pub struct MemoryUserStore {
    users: DashMap<String, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        match self.users.entry(user.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate("Username".to_string())),
            Entry::Vacant(slot) => {
                let user = User {
                    username: user.username,
                    password_hash: user.password_hash,
                    roles: user.roles,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(username).map(|entry| entry.clone()))
    }
}

/// Thread-safe in-memory task store with an atomic id counter.
pub struct MemoryTaskStore {
    tasks: DashMap<i64, Task>,
    next_id: AtomicI64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn insert(&self, task: NewTask) -> Result<Task, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let task = Task {
            id,
            title: task.title,
            done: task.done,
            owner: task.owner,
        };
        self.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.get(&id).map(|entry| entry.clone()))
    }

    async fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|entry| entry.clone()).collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.clone())
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn update(&self, id: i64, title: &str, done: bool) -> Result<Option<Task>, StoreError> {
        // get_mut holds the entry lock for the whole mutation.
        match self.tasks.get_mut(&id) {
            Some(mut entry) => {
                entry.title = title.to_string();
                entry.done = done;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set_done(&self, id: i64, done: bool) -> Result<Option<Task>, StoreError> {
        match self.tasks.get_mut(&id) {
            Some(mut entry) => {
                entry.done = done;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.tasks.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::Role;

    fn new_task(title: &str, owner: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            done: false,
            owner: owner.to_string(),
        }
    }

    #[tokio::test]
    async fn test_user_insert_and_find() {
        let store = MemoryUserStore::new();
        let user = store
            .insert(NewUser {
                username: "alice".to_string(),
                password_hash: "$argon2id$fake".to_string(),
                roles: vec![Role::User],
            })
            .await
            .unwrap();
        assert_eq!(user.username, "alice");

        let found = store.find("alice").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().roles, vec![Role::User]);

        assert!(store.find("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = MemoryUserStore::new();
        let user = NewUser {
            username: "alice".to_string(),
            password_hash: "h1".to_string(),
            roles: vec![Role::User],
        };
        store.insert(user.clone()).await.unwrap();

        let err = store.insert(user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_task_ids_are_monotonic() {
        let store = MemoryTaskStore::new();
        let a = store.insert(new_task("first", "alice")).await.unwrap();
        let b = store.insert(new_task("second", "alice")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let store = MemoryTaskStore::new();
        store.insert(new_task("a1", "alice")).await.unwrap();
        store.insert(new_task("b1", "bob")).await.unwrap();
        store.insert(new_task("a2", "alice")).await.unwrap();

        let alices = store.list_by_owner("alice").await.unwrap();
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|t| t.owner == "alice"));
        // Ordered by id.
        assert!(alices[0].id < alices[1].id);

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_task_returns_none() {
        let store = MemoryTaskStore::new();
        assert!(store.update(999, "x", true).await.unwrap().is_none());
        assert!(store.set_done(999, true).await.unwrap().is_none());
        assert!(!store.delete(999).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_toggle() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("draft", "alice")).await.unwrap();

        let updated = store
            .update(task.id, "final", true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "final");
        assert!(updated.done);
        // Owner never changes on update.
        assert_eq!(updated.owner, "alice");

        let toggled = store.set_done(task.id, false).await.unwrap().unwrap();
        assert!(!toggled.done);
        assert_eq!(toggled.title, "final");
    }

    #[tokio::test]
    async fn test_delete_removes_task() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("gone soon", "alice")).await.unwrap();
        assert!(store.delete(task.id).await.unwrap());
        assert!(store.get(task.id).await.unwrap().is_none());
    }
}
