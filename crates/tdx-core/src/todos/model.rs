use std::fmt;

use serde::{Deserialize, Serialize};

/// A single task record.
///
/// `id` is fixed once the server has confirmed it; `done` is the only field
/// that changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub done: bool,
}

impl Todo {
    /// A not-yet-confirmed todo with a fresh random id.
    pub fn candidate(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            done: false,
        }
    }
}

/// View filter over the todo collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Done,
    Pending,
}

impl Filter {
    /// Parses a filter name. Unknown names select [`Filter::All`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Filter::All,
            "done" => Filter::Done,
            "pending" => Filter::Pending,
            other => {
                tracing::debug!(filter = other, "unknown filter, showing all");
                Filter::All
            }
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Done => todo.done,
            Filter::Pending => !todo.done,
        }
    }

    /// Label shown above a filtered listing.
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All items",
            Filter::Done => "Done",
            Filter::Pending => "Pending",
        }
    }

    pub fn all() -> &'static [Filter] {
        &[Filter::All, Filter::Done, Filter::Pending]
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Filter::All => "all",
            Filter::Done => "done",
            Filter::Pending => "pending",
        };
        write!(f, "{name}")
    }
}
