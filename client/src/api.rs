//! REST client for the `/todos` endpoint family.
//!
//! [`TodoApi`] is the seam between the reducer's effects and the network:
//! production uses [`HttpTodoApi`], tests use the in-memory mock.

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use crate::types::{NewTodo, Todo, TodoId, TodoPatch};
use reqwest::{Client, Response};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`TodoApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Remote CRUD operations on todos
///
/// Returns boxed futures instead of using `async fn` so the trait stays
/// usable as `Arc<dyn TodoApi>` inside effects.
pub trait TodoApi: Send + Sync {
    /// `GET /todos`: every todo in server order
    fn list(&self) -> ApiFuture<'_, Vec<Todo>>;

    /// `POST /todos`: returns the created record with its assigned id
    fn create(&self, todo: NewTodo) -> ApiFuture<'_, Todo>;

    /// `PUT /todos/{id}`: only success or failure is reported
    fn update(&self, id: TodoId, patch: TodoPatch) -> ApiFuture<'_, ()>;

    /// `DELETE /todos/{id}`
    fn delete(&self, id: TodoId) -> ApiFuture<'_, ()>;
}

/// [`TodoApi`] over HTTP with `reqwest`
#[derive(Clone, Debug)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// Create a client for the API rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// Use an existing `reqwest` client
    #[must_use]
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn item_url(&self, id: TodoId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }

    /// Turns a non-success status into [`ApiError::Status`]
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl TodoApi for HttpTodoApi {
    fn list(&self) -> ApiFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let response = self
                .client
                .get(self.collection_url())
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            Self::check_status(response)
                .await?
                .json::<Vec<Todo>>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
        })
    }

    fn create(&self, todo: NewTodo) -> ApiFuture<'_, Todo> {
        Box::pin(async move {
            let response = self
                .client
                .post(self.collection_url())
                .json(&todo)
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            Self::check_status(response)
                .await?
                .json::<Todo>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
        })
    }

    fn update(&self, id: TodoId, patch: TodoPatch) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let response = self
                .client
                .put(self.item_url(id))
                .json(&patch)
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            Self::check_status(response).await.map(drop)
        })
    }

    fn delete(&self, id: TodoId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let response = self
                .client
                .delete(self.item_url(id))
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            Self::check_status(response).await.map(drop)
        })
    }
}
