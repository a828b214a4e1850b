//! Todo synchronization core.
//!
//! `TodoSync` owns the in-memory list and applies server results to it.
//! Updates are pessimistic: nothing changes locally until the backend has
//! confirmed the operation, so a failure never needs a rollback.
//!
//! ## Lifecycle
//!
//! ```text
//! Loading ──list ok──▶ Loaded ◀─┐ add / mark_done / mark_undone / toggle
//!    │                    └─────┘
//!    └──list err──▶ Errored (terminal)
//! ```
//!
//! ## Late results
//!
//! Every operation is split in two halves: `begin_*` hands out a [`Ticket`]
//! stamped with the current generation, and `complete_*` applies a result
//! only if that generation is still current. `unmount` (or `remount`) bumps
//! the generation, so results arriving for a discarded view are dropped
//! instead of applied. The `async` helpers (`load`, `add`, ...) run both
//! halves around the remote call.

use super::api::TodoApi;
use super::error::FetchError;
use super::model::{Filter, Todo};

/// Observable state of the initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Initial state; one `list()` call is in flight.
    Loading,
    /// The initial load failed. Terminal: there is no automatic retry.
    Errored(String),
    /// Steady state; operations are accepted.
    Loaded,
}

/// Identifies the mount an operation was started under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

#[derive(Debug)]
pub struct TodoSync {
    state: LoadState,
    todos: Vec<Todo>,
    error: Option<String>,
    generation: u64,
}

impl Default for TodoSync {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoSync {
    pub fn new() -> Self {
        Self {
            state: LoadState::Loading,
            todos: Vec::new(),
            error: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    /// Message to show the user: the load failure, or the last failed operation.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            LoadState::Errored(message) => Some(message),
            _ => self.error.as_deref(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    /// Ticket for the current mount.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }

    /// Discards the current mount. Results of in-flight operations are ignored.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(generation = self.generation, "todo view unmounted");
    }

    /// Starts a fresh mount: empty list, `Loading`, new generation.
    /// Returns the ticket for the initial load.
    pub fn remount(&mut self) -> Ticket {
        self.unmount();
        self.state = LoadState::Loading;
        self.todos.clear();
        self.error = None;
        self.ticket()
    }

    fn accepts(&self, ticket: Ticket) -> bool {
        let current = ticket.generation == self.generation;
        if !current {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "dropping result from a previous mount"
            );
        }
        current
    }

    fn record_failure(&mut self, err: &FetchError) {
        tracing::warn!(details = ?err.details, "{err}");
        self.error = Some(err.to_string());
    }

    // ------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------

    /// Applies the result of the initial `list()`.
    /// Returns whether the result was applied.
    pub fn complete_load(&mut self, ticket: Ticket, result: Result<Vec<Todo>, FetchError>) -> bool {
        if !self.accepts(ticket) || self.state != LoadState::Loading {
            return false;
        }
        match result {
            Ok(todos) => {
                tracing::debug!(count = todos.len(), "todos loaded");
                self.todos = todos;
                self.state = LoadState::Loaded;
            }
            Err(err) => {
                tracing::warn!(details = ?err.details, "{err}");
                self.state = LoadState::Errored(err.to_string());
            }
        }
        true
    }

    /// Runs the initial load against `api`.
    pub async fn load<A: TodoApi + ?Sized>(&mut self, api: &A) {
        if self.state != LoadState::Loading {
            return;
        }
        let ticket = self.ticket();
        let result = api.list().await;
        self.complete_load(ticket, result);
    }

    // ------------------------------------------------------------------
    // Add
    // ------------------------------------------------------------------

    /// Validates and trims `text`, returning what to send.
    ///
    /// Returns `None` (a silent no-op) for blank text or when the list is not
    /// loaded.
    pub fn begin_add(&mut self, text: &str) -> Option<(Ticket, String)> {
        let trimmed = text.trim();
        if trimmed.is_empty() || !self.is_loaded() {
            return None;
        }
        self.error = None;
        Some((self.ticket(), trimmed.to_string()))
    }

    /// Appends the server-confirmed todo, or records the failure.
    pub fn complete_add(&mut self, ticket: Ticket, result: Result<Todo, FetchError>) -> bool {
        if !self.accepts(ticket) || !self.is_loaded() {
            return false;
        }
        match result {
            Ok(todo) => self.todos.push(todo),
            Err(err) => self.record_failure(&err),
        }
        true
    }

    /// Creates a todo and appends it once the backend confirms.
    pub async fn add<A: TodoApi + ?Sized>(&mut self, api: &A, text: &str) {
        let Some((ticket, text)) = self.begin_add(text) else {
            return;
        };
        let result = api.create(&text).await;
        self.complete_add(ticket, result);
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// Returns `None` when the list is not loaded.
    pub fn begin_set_status(&mut self) -> Option<Ticket> {
        if !self.is_loaded() {
            return None;
        }
        self.error = None;
        Some(self.ticket())
    }

    /// Merges a confirmed `done` value into the matching todo, leaving its
    /// id, text and position untouched.
    pub fn complete_set_status(
        &mut self,
        ticket: Ticket,
        id: &str,
        done: bool,
        result: Result<(), FetchError>,
    ) -> bool {
        if !self.accepts(ticket) || !self.is_loaded() {
            return false;
        }
        match result {
            Ok(()) => {
                if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
                    todo.done = done;
                }
            }
            Err(err) => self.record_failure(&err),
        }
        true
    }

    async fn set_status<A: TodoApi + ?Sized>(&mut self, api: &A, id: &str, done: bool) {
        let Some(ticket) = self.begin_set_status() else {
            return;
        };
        let result = api.set_status(id, done).await;
        self.complete_set_status(ticket, id, done, result);
    }

    pub async fn mark_done<A: TodoApi + ?Sized>(&mut self, api: &A, id: &str) {
        self.set_status(api, id, true).await;
    }

    pub async fn mark_undone<A: TodoApi + ?Sized>(&mut self, api: &A, id: &str) {
        self.set_status(api, id, false).await;
    }

    /// Flips the todo with `id`: done todos are marked undone and vice versa.
    /// Unknown ids are ignored.
    pub async fn toggle<A: TodoApi + ?Sized>(&mut self, api: &A, id: &str) {
        let Some(done) = self.find(id).map(|t| t.done) else {
            return;
        };
        if done {
            self.mark_undone(api, id).await;
        } else {
            self.mark_done(api, id).await;
        }
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    pub fn find(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Todos matching `filter`, in list order.
    pub fn filtered_view(&self, filter: Filter) -> Vec<&Todo> {
        self.todos.iter().filter(|t| filter.matches(t)).collect()
    }
}
