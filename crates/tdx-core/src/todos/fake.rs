//! In-memory [`TodoApi`] implementation.
//!
//! Behaves like a cooperative backend: it assigns its own ids on create
//! (`srv-1`, `srv-2`, ...) so callers can verify that the server id replaces
//! the local candidate. Failures can be injected per operation kind.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::api::TodoApi;
use super::error::{FetchError, FetchErrorKind};
use super::model::Todo;

#[derive(Debug, Default)]
struct FakeState {
    todos: Vec<Todo>,
    next_id: u64,
    failing: HashSet<FetchErrorKind>,
    calls: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryTodoApi {
    state: Mutex<FakeState>,
}

impl InMemoryTodoApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backend with existing todos.
    pub fn with_todos(todos: Vec<Todo>) -> Self {
        let api = Self::new();
        api.lock().todos = todos;
        api
    }

    /// Makes every call of `kind` fail until turned off again.
    pub fn set_failing(&self, kind: FetchErrorKind, failing: bool) {
        let mut state = self.lock();
        if failing {
            state.failing.insert(kind);
        } else {
            state.failing.remove(&kind);
        }
    }

    /// Snapshot of the backend's todos.
    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    /// Number of calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn begin(&self, kind: FetchErrorKind) -> Result<MutexGuard<'_, FakeState>, FetchError> {
        let mut state = self.lock();
        state.calls += 1;
        if state.failing.contains(&kind) {
            return Err(FetchError::with_details(kind, "simulated network error"));
        }
        Ok(state)
    }
}

#[async_trait]
impl TodoApi for InMemoryTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, FetchError> {
        let state = self.begin(FetchErrorKind::Fetch)?;
        Ok(state.todos.clone())
    }

    async fn create(&self, text: &str) -> Result<Todo, FetchError> {
        let mut state = self.begin(FetchErrorKind::Create)?;
        state.next_id += 1;
        let todo = Todo {
            id: format!("srv-{}", state.next_id),
            text: text.to_string(),
            done: false,
        };
        state.todos.push(todo.clone());
        Ok(todo)
    }

    async fn set_status(&self, id: &str, done: bool) -> Result<(), FetchError> {
        let mut state = self.begin(FetchErrorKind::Update)?;
        let todo = state
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| FetchError::http_status(FetchErrorKind::Update, 404, ""))?;
        todo.done = done;
        Ok(())
    }
}
