//! Todo list: model, remote client, and the synchronization core.
//!
//! - `model` - `Todo` and `Filter`
//! - `error` - `FetchError`
//! - `api` - `TodoApi` trait over real/fake backends
//! - `remote` - `HttpTodoClient` (reqwest)
//! - `fake` - `InMemoryTodoApi` (in-memory backend with failure injection)
//! - `sync` - `TodoSync`, the state machine that owns the list

pub mod api;
pub mod error;
pub mod fake;
pub mod model;
pub mod remote;
pub mod sync;

pub use api::TodoApi;
pub use error::{FetchError, FetchErrorKind};
pub use fake::InMemoryTodoApi;
pub use model::{Filter, Todo};
pub use remote::HttpTodoClient;
pub use sync::{LoadState, Ticket, TodoSync};
