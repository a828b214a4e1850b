//! Trait abstracting the todo backend.
//!
//! Implemented by:
//! - `HttpTodoClient` - real HTTP client
//! - `InMemoryTodoApi` - in-memory backend for tests
//!
//! `TodoSync` is generic over this trait so the same state machine runs
//! against either.

use async_trait::async_trait;

use super::error::FetchError;
use super::model::Todo;

#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Fetches the full list.
    async fn list(&self) -> Result<Vec<Todo>, FetchError>;

    /// Creates a todo from `text`.
    ///
    /// Returns the todo as confirmed by the backend; its id replaces the
    /// locally generated candidate id.
    async fn create(&self, text: &str) -> Result<Todo, FetchError>;

    /// Sets only the `done` flag of the todo with `id`.
    async fn set_status(&self, id: &str, done: bool) -> Result<(), FetchError>;
}
