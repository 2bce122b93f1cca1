//! Task model and list transformations for the daybook task manager.
//!
//! The collection of tasks is owned by the caller (the TUI app or a CLI
//! command). The functions in [`task_utils`] never mutate it; they return a
//! new collection that replaces the old one.

pub mod commands;
pub mod error;
pub mod loaders;
pub mod logging;
pub mod models;
pub mod storage;
pub mod task_utils;
pub mod tui;

pub use error::{DaybookError, Result};
pub use models::{ChecklistItem, Partition, Priority, Tag, Task, TaskAction, TaskPatch, ViewFilter};
