//! Todo command handlers.
//!
//! Each command mounts a fresh [`TodoSync`], loads the list, applies at most
//! one change and prints the resulting view.

use anyhow::Result;
use tdx_core::todos::{Filter, HttpTodoClient, LoadState, TodoSync};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Done,
    Undo,
    Toggle,
}

async fn mount(client: &HttpTodoClient) -> Result<TodoSync> {
    let mut sync = TodoSync::new();
    sync.load(client).await;
    if let LoadState::Errored(message) = sync.state() {
        anyhow::bail!("Could not load todos: {message}");
    }
    Ok(sync)
}

fn bail_on_error(sync: &TodoSync) -> Result<()> {
    if let Some(message) = sync.error() {
        anyhow::bail!("{message}");
    }
    Ok(())
}

fn render(sync: &TodoSync, filter: Filter) {
    let view = sync.filtered_view(filter);
    println!("{} ({})", filter.label(), view.len());
    if view.is_empty() {
        println!("  No todos.");
        return;
    }
    for todo in view {
        let mark = if todo.done { "x" } else { " " };
        println!("[{mark}] {}  {}", todo.id, todo.text);
    }
}

pub async fn list(client: &HttpTodoClient, filter: Filter) -> Result<()> {
    let sync = mount(client).await?;
    render(&sync, filter);
    Ok(())
}

pub async fn add(client: &HttpTodoClient, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Todo text cannot be empty");
    }
    let mut sync = mount(client).await?;
    sync.add(client, text).await;
    bail_on_error(&sync)?;
    if let Some(todo) = sync.todos().last() {
        println!("Added {}", todo.id);
    }
    render(&sync, Filter::All);
    Ok(())
}

pub async fn set_status(client: &HttpTodoClient, id: &str, change: StatusChange) -> Result<()> {
    let mut sync = mount(client).await?;
    if sync.find(id).is_none() {
        anyhow::bail!("No todo with id {id}");
    }
    match change {
        StatusChange::Done => sync.mark_done(client, id).await,
        StatusChange::Undo => sync.mark_undone(client, id).await,
        StatusChange::Toggle => sync.toggle(client, id).await,
    }
    bail_on_error(&sync)?;
    render(&sync, Filter::All);
    Ok(())
}
