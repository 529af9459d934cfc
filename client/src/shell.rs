//! Line-oriented terminal front end.
//!
//! Parses one command per line, runs it against a [`ListStore`], waits for
//! the remote call it started and renders the list again.

use crate::filter::FilteredTodos;
use crate::list_store::ListStore;
use crate::types::{Todo, TodoId, TodoListState};
use thiserror::Error;
use todo_sync_runtime::error::StoreError;

/// Shown when no item passes the filter
pub const NOTHING_TO_DO: &str = "Yay! Nothing TODO.";

/// Shown by `help`
pub const HELP: &str = "\
Commands:
  list                        show the list
  reload                      fetch the list from the server
  add <name> | <description>  create a todo
  toggle <id>                 flip completed
  edit <id>                   start editing
  name <text>                 set the edited name
  desc <text>                 set the edited description
  save                        persist the edit
  cancel                      discard the edit
  delete <id>                 remove a todo
  search [query]              filter by name or description
  help                        show this text
  quit                        exit";

/// A parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Re-render the list
    List,
    /// Fetch the list from the server
    Reload,
    /// Create a todo
    Add {
        /// Name
        name: String,
        /// Description
        description: String,
    },
    /// Flip completion
    Toggle(TodoId),
    /// Enter edit mode
    Edit(TodoId),
    /// Change the edited name
    Name(String),
    /// Change the edited description
    Description(String),
    /// Persist the edit in progress
    Save,
    /// Discard the edit in progress
    Cancel,
    /// Remove a todo
    Delete(TodoId),
    /// Change the search query; empty clears it
    Search(String),
    /// Print the command list
    Help,
    /// Leave the shell
    Quit,
}

/// Why a line could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    #[error("Empty command")]
    Empty,

    /// First word is not a command
    #[error("Unknown command: {0} (try `help`)")]
    UnknownCommand(String),

    /// Command needs an argument
    #[error("Missing {0}")]
    MissingArgument(&'static str),

    /// Argument is not a todo id
    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl std::str::FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_lowercase().as_str() {
            "" => Err(ParseError::Empty),
            "list" | "ls" => Ok(Self::List),
            "reload" | "load" => Ok(Self::Reload),
            "add" => parse_add(rest),
            "toggle" | "done" => parse_id(rest).map(Self::Toggle),
            "edit" => parse_id(rest).map(Self::Edit),
            "name" => Ok(Self::Name(rest.to_string())),
            "desc" | "description" => Ok(Self::Description(rest.to_string())),
            "save" => Ok(Self::Save),
            "cancel" => Ok(Self::Cancel),
            "delete" | "rm" => parse_id(rest).map(Self::Delete),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_add(rest: &str) -> Result<Command, ParseError> {
    let (name, description) = rest
        .split_once('|')
        .map_or((rest, ""), |(name, description)| (name, description));

    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::MissingArgument("name"));
    }

    Ok(Command::Add {
        name: name.to_string(),
        description: description.trim().to_string(),
    })
}

fn parse_id(rest: &str) -> Result<TodoId, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::MissingArgument("id"));
    }
    rest.parse()
        .map_err(|_| ParseError::InvalidId(rest.to_string()))
}

/// What the shell should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    /// Print this and read the next line
    Continue(String),
    /// Leave the loop
    Quit,
}

/// Run `command` against `store` and produce the text to print
///
/// Remote calls are awaited so the rendered list includes their outcome.
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store shuts down.
pub async fn execute(store: &ListStore, command: Command) -> Result<Flow, StoreError> {
    let mut handle = match command {
        Command::Help => return Ok(Flow::Continue(HELP.to_string())),
        Command::Quit => return Ok(Flow::Quit),
        Command::List => None,
        Command::Reload => Some(store.load().await?),
        Command::Add { name, description } => {
            store.update_draft(name, description).await?;
            Some(store.submit_draft().await?)
        },
        Command::Toggle(id) => Some(store.toggle_complete(id).await?),
        Command::Edit(id) => Some(store.edit(id).await?),
        Command::Name(value) => Some(store.set_edit_name(value).await?),
        Command::Description(value) => Some(store.set_edit_description(value).await?),
        Command::Save => match store.snapshot().await.edit_cursor() {
            Some(id) => Some(store.save_edit(id).await?),
            None => return Ok(Flow::Continue("Nothing is being edited.".to_string())),
        },
        Command::Cancel => Some(store.cancel_edit().await?),
        Command::Delete(id) => Some(store.delete(id).await?),
        Command::Search(query) => Some(store.set_search(query).await?),
    };

    if let Some(handle) = handle.as_mut() {
        handle.wait().await;
    }

    Ok(Flow::Continue(store.render(render).await))
}

fn row(todo: &Todo) -> String {
    let status = if todo.completed { "✓" } else { " " };
    let mut line = format!("  [{status}] {:>3}  {}", todo.id.get(), todo.name);
    if !todo.description.is_empty() {
        line.push_str(&format!(" - {}", todo.description));
    }
    line
}

/// Text rendering of the list view
#[must_use]
pub fn render(state: &TodoListState, view: FilteredTodos<'_>) -> String {
    let mut out = String::new();

    if !state.search.is_empty() {
        out.push_str(&format!("Search: {}\n", state.search));
    }

    match &view {
        FilteredTodos::NothingToDo => out.push_str(NOTHING_TO_DO),
        FilteredTodos::Items(items) => {
            for todo in items {
                out.push_str(&row(todo));
                out.push('\n');

                if let Some(session) = state.editing.as_ref().filter(|s| s.id == todo.id) {
                    out.push_str(&format!(
                        "        editing: {} - {}\n",
                        session.buffer.name, session.buffer.description
                    ));
                }
            }
            out.push_str(&format!(
                "Completed: {}/{}",
                state.completed_count(),
                state.count()
            ));
        },
    }

    out
}
