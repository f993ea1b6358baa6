//! Request/response seam to the remote task store.

mod http;

pub use http::{DEFAULT_BASE_URL, HttpTaskRemote};

use crate::codec::{WireCategory, WireTask, WireTaskPayload};
use crate::error::AppError;
use async_trait::async_trait;

/// One method per remote endpoint. Implementations report non-2xx responses
/// and network failures as [`AppError::Transport`] with the response body in
/// the message; the sync layer decides what each failure means.
#[async_trait]
pub trait TaskRemote: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<WireTask>, AppError>;

    async fn create_task(&self, payload: &WireTaskPayload) -> Result<WireTask, AppError>;

    async fn update_task(&self, id: &str, payload: &WireTaskPayload)
    -> Result<WireTask, AppError>;

    async fn delete_task(&self, id: &str) -> Result<(), AppError>;

    async fn list_categories(&self) -> Result<Vec<WireCategory>, AppError>;
}
