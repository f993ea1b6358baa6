use super::TaskRemote;
use crate::codec::{WireCategory, WireTask, WireTaskPayload};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, Response};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Clone)]
pub struct HttpTaskRemote {
    client: Client,
    base_url: String,
}

impl HttpTaskRemote {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

async fn ensure_success(response: Response) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.map_err(|err| err.to_string());
    Err(status_error(status.as_u16(), body))
}

fn status_error(code: u16, body: Result<String, String>) -> AppError {
    match body {
        Ok(body) if body.trim().is_empty() => AppError::transport(format!("HTTP {code}")),
        Ok(body) => AppError::transport(format!("HTTP {code}: {}", body.trim())),
        Err(err) => AppError::transport(format!("HTTP {code} (body unreadable: {err})")),
    }
}

#[async_trait]
impl TaskRemote for HttpTaskRemote {
    #[tracing::instrument(skip_all)]
    async fn list_tasks(&self) -> Result<Vec<WireTask>, AppError> {
        let response = self.client.get(self.url("tasks")).send().await?;
        let tasks = ensure_success(response).await?.json().await?;
        Ok(tasks)
    }

    #[tracing::instrument(skip_all)]
    async fn create_task(&self, payload: &WireTaskPayload) -> Result<WireTask, AppError> {
        let response = self
            .client
            .post(self.url("tasks/create"))
            .json(payload)
            .send()
            .await?;
        let task = ensure_success(response).await?.json().await?;
        Ok(task)
    }

    #[tracing::instrument(skip(self, payload))]
    async fn update_task(
        &self,
        id: &str,
        payload: &WireTaskPayload,
    ) -> Result<WireTask, AppError> {
        let response = self
            .client
            .patch(self.url(&format!("tasks/{id}/update")))
            .json(payload)
            .send()
            .await?;
        let task = ensure_success(response).await?.json().await?;
        Ok(task)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, id: &str) -> Result<(), AppError> {
        let response = self
            .client
            .delete(self.url(&format!("tasks/{id}/delete")))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn list_categories(&self) -> Result<Vec<WireCategory>, AppError> {
        let response = self.client.get(self.url("categories")).send().await?;
        let categories = ensure_success(response).await?.json().await?;
        Ok(categories)
    }
}
