//! Pure transformations over a task collection.
//!
//! Every function here takes the collection by reference and returns a fresh
//! value. Callers own the collection and replace it with the result.

use chrono::{Datelike, Local, NaiveDate};
use log::debug;

use crate::error::{DaybookError, Result};
use crate::models::{ChecklistItem, Partition, Task, TaskAction, ViewFilter, parse_day};

/// Splits the tasks shown by `view` into open and completed lists.
///
/// Both lists are ordered by scheduled day, unscheduled tasks last. Tasks on
/// the same day keep their input order.
pub fn classify_by_view(tasks: &[Task], view: &ViewFilter) -> Partition {
    let (mut completed, mut available): (Vec<Task>, Vec<Task>) = tasks
        .iter()
        .filter(|t| view.matches(t))
        .cloned()
        .partition(|t| t.completed);
    sort_by_when(&mut available);
    sort_by_when(&mut completed);
    Partition { available, completed }
}

fn sort_by_when(tasks: &mut [Task]) {
    // sort_by_key is stable
    tasks.sort_by_key(|t| (t.when.is_none(), t.when));
}

/// One past the highest of `ids`, or 1 when there are none.
///
/// Fails instead of wrapping when the highest id is `u64::MAX`, since a
/// wrapped id would reuse one already handed out.
fn id_after<I: Iterator<Item = u64>>(ids: I) -> Result<u64> {
    let max = ids.max().unwrap_or(0);
    max.checked_add(1).ok_or(DaybookError::IdsExhausted(max))
}

/// The id the next created task receives.
pub fn next_id(tasks: &[Task]) -> Result<u64> {
    id_after(tasks.iter().map(|t| t.id))
}

/// Builds a blank task for `tasks` without inserting it.
pub fn create_task(tasks: &[Task], when: Option<NaiveDate>) -> Result<Task> {
    Ok(Task {
        id: next_id(tasks)?,
        name: String::new(),
        completed: false,
        when,
        notes: None,
        tags: Vec::new(),
        checklist: Vec::new(),
        priority: None,
        selected: false,
        expanded: true,
    })
}

/// Returns `tasks` with a blank task appended at the end.
pub fn append_task(tasks: &[Task], when: Option<NaiveDate>) -> Result<Vec<Task>> {
    let task = create_task(tasks, when)?;
    let mut updated = tasks.to_vec();
    updated.push(task);
    Ok(updated)
}

/// Applies `action` and returns the resulting collection.
///
/// An action whose id matches no task returns an unchanged copy. Use
/// [`try_apply_action`] to have that reported.
pub fn apply_action(tasks: &[Task], action: &TaskAction) -> Vec<Task> {
    match action {
        TaskAction::Select(id) => tasks
            .iter()
            .map(|t| Task { selected: t.id == *id, ..t.clone() })
            .collect(),
        TaskAction::Delete(id) => tasks.iter().filter(|t| t.id != *id).cloned().collect(),
        TaskAction::Update(patch) => tasks
            .iter()
            .map(|t| {
                if t.id == patch.id {
                    Task { selected: false, ..patch.merge_into(t) }
                } else {
                    t.clone()
                }
            })
            .collect(),
        TaskAction::Complete { id, completed } => tasks
            .iter()
            .map(|t| {
                if t.id == *id {
                    Task { completed: *completed, ..t.clone() }
                } else {
                    t.clone()
                }
            })
            .collect(),
    }
}

/// Like [`apply_action`], but fails with [`DaybookError::NotFound`] when no
/// task carries the targeted id.
pub fn try_apply_action(tasks: &[Task], action: &TaskAction) -> Result<Vec<Task>> {
    let id = action.target_id();
    if !tasks.iter().any(|t| t.id == id) {
        return Err(DaybookError::NotFound(id));
    }
    debug!("applying {} to task {}", action.name(), id);
    Ok(apply_action(tasks, action))
}

/// The task marked as selected, if any.
pub fn selected_task(tasks: &[Task]) -> Option<&Task> {
    tasks.iter().find(|t| t.selected)
}

/// Returns `task` with a new checklist item appended.
pub fn add_checklist_item(task: &Task, name: impl Into<String>) -> Result<Task> {
    let id = id_after(task.checklist.iter().map(|c| c.id))?;
    let mut updated = task.clone();
    updated.checklist.push(ChecklistItem { id, name: name.into(), completed: false });
    Ok(updated)
}

/// Returns `task` with the checklist item `item_id` marked done or not done.
pub fn set_checklist_item(task: &Task, item_id: u64, completed: bool) -> Result<Task> {
    let mut updated = task.clone();
    let item = updated
        .checklist
        .iter_mut()
        .find(|c| c.id == item_id)
        .ok_or(DaybookError::ChecklistItemNotFound { task: task.id, item: item_id })?;
    item.completed = completed;
    Ok(updated)
}

pub fn remove_checklist_item(task: &Task, item_id: u64) -> Result<Task> {
    if !task.checklist.iter().any(|c| c.id == item_id) {
        return Err(DaybookError::ChecklistItemNotFound { task: task.id, item: item_id });
    }
    let mut updated = task.clone();
    updated.checklist.retain(|c| c.id != item_id);
    Ok(updated)
}

/// Gives every checklist item without an id (id 0) a fresh one.
///
/// Items that already carry an id keep it; new ids continue after the
/// highest id on the task.
pub fn assign_checklist_ids(tasks: &[Task]) -> Result<Vec<Task>> {
    tasks
        .iter()
        .map(|t| {
            let mut task = t.clone();
            if task.checklist.iter().all(|c| c.id != 0) {
                return Ok(task);
            }
            let mut next = Some(id_after(task.checklist.iter().map(|c| c.id))?);
            for item in task.checklist.iter_mut().filter(|c| c.id == 0) {
                let id = next.ok_or(DaybookError::IdsExhausted(u64::MAX))?;
                item.id = id;
                next = id.checked_add(1);
            }
            Ok(task)
        })
        .collect()
}

/// Formats a day relative to the current local day.
pub fn format_display_date(date: Option<NaiveDate>) -> String {
    format_display_date_from(date, Local::now().date_naive())
}

/// Formats `date` relative to `today`:
///
/// - `Today`, `Tomorrow`
/// - the weekday name for 2 to 5 days ahead
/// - `Tue, 5 Mar` for any other day this year
/// - `5 Mar 2030` otherwise
pub fn format_display_date_from(date: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(target) = date else {
        return String::new();
    };
    let days_diff = (target - today).num_days();
    match days_diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=5 => target.format("%A").to_string(),
        _ if target.year() == today.year() => target.format("%a, %-d %b").to_string(),
        _ => target.format("%-d %b %Y").to_string(),
    }
}

/// Formats a day given as text. Unreadable text formats as empty.
pub fn format_display_str(text: &str) -> String {
    format_display_date(parse_day(text).ok().flatten())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sort_keeps_equal_days_in_order() {
        let mut tasks = append_task(&[], None).unwrap();
        tasks = append_task(&tasks, Some(day(2024, 1, 2))).unwrap();
        tasks = append_task(&tasks, Some(day(2024, 1, 1))).unwrap();
        tasks = append_task(&tasks, Some(day(2024, 1, 2))).unwrap();
        sort_by_when(&mut tasks);
        let ids: Vec<u64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_assign_checklist_ids_fills_gaps() {
        let mut task = create_task(&[], None).unwrap();
        task.checklist = vec![
            ChecklistItem { id: 0, name: "a".into(), completed: false },
            ChecklistItem { id: 4, name: "b".into(), completed: false },
            ChecklistItem { id: 0, name: "c".into(), completed: true },
        ];
        let out = assign_checklist_ids(&[task]).unwrap();
        let ids: Vec<u64> = out[0].checklist.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![5, 4, 6]);
    }

    #[test]
    fn test_ids_do_not_wrap_at_max() {
        let mut task = create_task(&[], None).unwrap();
        task.id = u64::MAX;
        let full = [task.clone()];
        assert!(matches!(next_id(&full), Err(DaybookError::IdsExhausted(u64::MAX))));
        assert!(matches!(append_task(&full, None), Err(DaybookError::IdsExhausted(_))));

        let last = ChecklistItem { id: u64::MAX, name: "last".into(), completed: false };
        task.checklist = vec![last];
        assert!(add_checklist_item(&task, "one more").is_err());

        task.checklist.push(ChecklistItem { id: 0, name: "new".into(), completed: false });
        assert!(matches!(assign_checklist_ids(&[task]), Err(DaybookError::IdsExhausted(_))));
    }

    #[test]
    fn test_checklist_backfill_may_take_max_id() {
        let mut task = create_task(&[], None).unwrap();
        task.checklist = vec![
            ChecklistItem { id: u64::MAX - 1, name: "a".into(), completed: false },
            ChecklistItem { id: 0, name: "b".into(), completed: false },
        ];
        let out = assign_checklist_ids(&[task]).unwrap();
        assert_eq!(out[0].checklist[1].id, u64::MAX);
    }

    #[test]
    fn test_format_past_and_far_dates() {
        let today = day(2024, 6, 10);
        assert_eq!(format_display_date_from(Some(day(2024, 6, 9)), today), "Sun, 9 Jun");
        assert_eq!(format_display_date_from(Some(day(2024, 6, 16)), today), "Sun, 16 Jun");
        assert_eq!(format_display_date_from(Some(day(2023, 12, 31)), today), "31 Dec 2023");
        assert_eq!(format_display_date_from(None, today), "");
    }
}
