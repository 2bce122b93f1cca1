use std::fs::OpenOptions;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::Result;
use crate::loaders::{inbox_tasks, today_tasks};
use crate::models::{Task, ViewFilter};
use crate::task_utils::assign_checklist_ids;

/// Environment variable naming the task file.
pub const TASKS_ENV: &str = "DAYBOOK_TASKS";

/// Returns the path of the task file to read, if any.
///
/// The path is determined in the following order:
/// 1. The `explicit` path (the `--file` flag).
/// 2. `DAYBOOK_TASKS` environment variable.
/// 3. `~/.local/share/daybook/tasks.json` (on Linux), only if it exists.
///
/// Files are only ever read. Nothing is written back.
pub fn tasks_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    if let Ok(p) = std::env::var(TASKS_ENV) {
        if !p.is_empty() {
            return Some(PathBuf::from(p));
        }
    }
    let mut p = dirs::data_local_dir()?;
    p.push("daybook");
    p.push("tasks.json");
    if p.exists() { Some(p) } else { None }
}

/// Parses a JSON array of tasks from `reader`.
///
/// Checklist items that arrive without an id are given one.
pub fn read_tasks<R: Read>(mut reader: R) -> Result<Vec<Task>> {
    let mut s = String::new();
    reader.read_to_string(&mut s)?;
    let tasks: Vec<Task> = serde_json::from_str(&s)?;
    assign_checklist_ids(&tasks)
}

/// Loads all tasks from the file at `path`.
pub fn load_tasks_from(path: &Path) -> Result<Vec<Task>> {
    let f = OpenOptions::new().read(true).open(path)?;
    let tasks = read_tasks(f)?;
    debug!("loaded {} tasks from {}", tasks.len(), path.display());
    Ok(tasks)
}

/// The built-in collection for a view. The inbox view has its own sample.
pub fn sample_tasks(view: &ViewFilter, today: NaiveDate) -> Vec<Task> {
    match view {
        ViewFilter::Inbox => inbox_tasks(today),
        ViewFilter::Day(_) | ViewFilter::All => today_tasks(today),
    }
}

/// Loads the collection for a session: the resolved task file if there is
/// one, otherwise the sample collection for `view`.
pub fn load_tasks(
    explicit: Option<&Path>,
    view: &ViewFilter,
    today: NaiveDate,
) -> Result<Vec<Task>> {
    match tasks_path(explicit) {
        Some(path) => load_tasks_from(&path),
        None => {
            info!("no task file configured, using sample tasks");
            Ok(sample_tasks(view, today))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_is_used_as_is() {
        let p = PathBuf::from("/tmp/elsewhere/tasks.json");
        assert_eq!(tasks_path(Some(p.as_path())), Some(p));
    }

    #[test]
    fn test_sample_tasks_follow_view() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let inbox = sample_tasks(&ViewFilter::Inbox, today);
        let all = sample_tasks(&ViewFilter::All, today);
        assert!(inbox.iter().all(|t| t.tags.is_empty()));
        assert_eq!(all[0].tags.len(), 1);
    }
}
