//! Round trips to the remote store, applied to the local collection only
//! after the store confirms them.
//!
//! [`SyncController`] is the only writer of its [`TaskStore`]. Its methods
//! take `&self`, so a caller may start several operations at once on one
//! thread; the store borrow is never held across an `.await`, and when two
//! updates for the same task race, whichever response lands last wins.

use crate::codec::{decode_category, decode_task, decode_tasks, encode_draft, encode_task};
use crate::error::AppError;
use crate::model::{Category, Task, TaskDraft, TaskStatus};
use crate::remote::TaskRemote;
use crate::storage::TaskStore;
use std::cell::RefCell;
use std::sync::Arc;

pub struct SyncController<R> {
    remote: R,
    store: RefCell<TaskStore>,
}

impl<R: TaskRemote> SyncController<R> {
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            store: RefCell::new(TaskStore::new()),
        }
    }

    pub fn snapshot(&self) -> Arc<[Task]> {
        self.store.borrow().snapshot()
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.store.borrow().get(id).cloned()
    }

    /// Replaces the whole collection with the store's listing. On any
    /// failure the previous collection is kept as it was.
    pub async fn fetch_all(&self) -> Result<Arc<[Task]>, AppError> {
        let wire = self.remote.list_tasks().await.map_err(|err| {
            tracing::error!(error = %err, "fetching tasks failed");
            AppError::fetch_failed(err.message())
        })?;

        let tasks = decode_tasks(wire).map_err(|err| {
            tracing::error!(error = %err, "decoding task listing failed");
            AppError::fetch_failed(err.message())
        })?;

        tracing::debug!(count = tasks.len(), "loaded tasks");
        let mut store = self.store.borrow_mut();
        store.replace_all(tasks);
        Ok(store.snapshot())
    }

    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, AppError> {
        let payload = encode_draft(draft);
        let created = self
            .remote
            .create_task(&payload)
            .await
            .and_then(decode_task)
            .map_err(|err| {
                tracing::warn!(error = %err, title = %draft.title, "create task failed");
                AppError::create_failed(err.message())
            })?;

        tracing::info!(id = %created.id, "created task");
        self.store.borrow_mut().insert(created.clone());
        Ok(created)
    }

    pub async fn update_task(&self, task: &Task) -> Result<Task, AppError> {
        let payload = encode_task(task);
        let updated = self
            .remote
            .update_task(&task.id, &payload)
            .await
            .and_then(decode_task)
            .map_err(|err| {
                tracing::warn!(error = %err, id = %task.id, "update task failed");
                AppError::update_failed(err.message())
            })?;

        if !self
            .store
            .borrow_mut()
            .replace_by_id(&task.id, updated.clone())
        {
            tracing::warn!(id = %task.id, "updated task is not in the local collection");
        } else {
            tracing::info!(id = %task.id, "updated task");
        }
        Ok(updated)
    }

    /// Returns the removed task, or `None` when the store confirmed the
    /// delete of a task this session never loaded.
    pub async fn delete_task(&self, id: &str) -> Result<Option<Task>, AppError> {
        self.remote.delete_task(id).await.map_err(|err| {
            tracing::warn!(error = %err, id, "delete task failed");
            AppError::delete_failed(err.message())
        })?;

        tracing::info!(id, "deleted task");
        Ok(self.store.borrow_mut().remove_by_id(id))
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let wire = self.remote.list_categories().await.map_err(|err| {
            tracing::error!(error = %err, "fetching categories failed");
            AppError::fetch_failed(err.message())
        })?;

        wire.into_iter()
            .map(decode_category)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| AppError::fetch_failed(err.message()))
    }
}

pub fn next_status(current: TaskStatus) -> TaskStatus {
    match current {
        TaskStatus::Pending => TaskStatus::InProgress,
        TaskStatus::InProgress => TaskStatus::Completed,
        TaskStatus::Completed => TaskStatus::Pending,
    }
}

pub fn with_next_status(task: &Task) -> Task {
    Task {
        status: next_status(task.status),
        ..task.clone()
    }
}

/// Flips `completed` on the item with `item_id`. Unknown ids and tasks
/// without a checklist come back unchanged.
pub fn toggle_checklist_item(task: &Task, item_id: &str) -> Task {
    let checklist_items = task.checklist_items.as_ref().map(|items| {
        items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                if item.id == item_id {
                    item.completed = !item.completed;
                }
                item
            })
            .collect()
    });

    Task {
        checklist_items,
        ..task.clone()
    }
}
