use thiserror::Error;

/// Errors reported by the daybook library and CLI.
///
/// The pure transforms in [`crate::task_utils`] never return these; they are
/// produced at the boundaries where text, files or ids come in from outside.
#[derive(Error, Debug)]
pub enum DaybookError {
    #[error("failed to read tasks: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tasks: {0}")]
    Json(#[from] serde_json::Error),

    #[error("task {0} not found")]
    NotFound(u64),

    #[error("no ids left after {0}")]
    IdsExhausted(u64),

    #[error("checklist item {item} not found on task {task}")]
    ChecklistItemNotFound { task: u64, item: u64 },

    #[error("unknown action '{0}'. Supported: select, delete, update, complete")]
    UnknownAction(String),

    #[error("invalid date '{0}'. Use today, tomorrow, inbox or YYYY-MM-DD")]
    InvalidDate(String),

    #[error("invalid view '{0}'. Use today, inbox, all or YYYY-MM-DD")]
    InvalidView(String),

    #[error("invalid priority '{0}'. Supported: low, medium, high")]
    InvalidPriority(String),
}

pub type Result<T> = std::result::Result<T, DaybookError>;
