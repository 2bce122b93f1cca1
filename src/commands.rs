use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use log::info;

use crate::error::{DaybookError, Result};
use crate::models::{parse_when_input, Priority, Tag, Task, TaskAction, TaskPatch, ViewFilter};
use crate::task_utils::{
    add_checklist_item, append_task, classify_by_view, format_display_date_from,
    remove_checklist_item, set_checklist_item, try_apply_action,
};

/// Field edits requested on the command line for `update`.
#[derive(Debug, Default, Clone)]
pub struct UpdateFields {
    pub name: Option<String>,
    pub when: Option<String>,
    pub clear_when: bool,
    pub notes: Option<String>,
    pub clear_notes: bool,
    pub priority: Option<String>,
    pub clear_priority: bool,
    /// Replaces all tags when non-empty.
    pub tags: Vec<String>,
    pub clear_tags: bool,
}

/// Checklist edits on a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecklistOp {
    Add(String),
    Done(u64),
    Undo(u64),
    Remove(u64),
}

/// Serializes the collection the way every mutating command prints it.
pub fn to_json(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

/// Renders the available and completed tables for `view`.
pub fn cmd_list(tasks: &[Task], view: &ViewFilter, today: NaiveDate) -> String {
    let partition = classify_by_view(tasks, view);
    let label = view.label(today);
    if partition.is_empty() {
        return format!("{}: no tasks found.", label);
    }

    let mut out = String::new();
    out.push_str(&format!("{} - available ({})\n", label, partition.available.len()));
    if partition.available.is_empty() {
        out.push_str("Nothing left to do.\n");
    } else {
        out.push_str(&format!("{}\n", task_table(&partition.available, today)));
    }
    out.push_str(&format!("{} - completed ({})\n", label, partition.completed.len()));
    if !partition.completed.is_empty() {
        out.push_str(&format!("{}\n", task_table(&partition.completed, today)));
    }
    out
}

fn task_table(tasks: &[Task], today: NaiveDate) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("When").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Tags").add_attribute(Attribute::Bold),
            Cell::new("Checklist").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let when = if t.when.is_some() {
            format_display_date_from(t.when, today)
        } else {
            "Inbox".to_string()
        };
        let overdue = !t.completed && t.when.is_some_and(|d| d < today);

        let priority_color = match t.priority {
            Some(Priority::High) => Color::Red,
            Some(Priority::Medium) => Color::Yellow,
            Some(Priority::Low) => Color::Green,
            None => Color::Reset,
        };

        let status = if t.completed { "Done" } else { "Open" };
        let status_color = if t.completed { Color::Green } else { Color::Yellow };

        let name = if t.name.is_empty() { "(untitled)".to_string() } else { t.name.clone() };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(name),
            Cell::new(when).fg(if overdue { Color::Red } else { Color::Reset }),
            Cell::new(t.priority.map(|p| p.to_string()).unwrap_or_default()).fg(priority_color),
            Cell::new(tag_list(t)),
            Cell::new(checklist_progress(t)),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}

/// Comma separated tag values.
pub fn tag_list(task: &Task) -> String {
    task.tags.iter().map(|t| t.value.as_str()).collect::<Vec<_>>().join(", ")
}

/// `done/total` for tasks with a checklist, empty otherwise.
pub fn checklist_progress(task: &Task) -> String {
    if task.checklist.is_empty() {
        return String::new();
    }
    let done = task.checklist.iter().filter(|c| c.completed).count();
    format!("{}/{}", done, task.checklist.len())
}

/// Appends a blank task scheduled on `when` (text as accepted by `--when`).
pub fn cmd_new(tasks: &[Task], when: Option<&str>, today: NaiveDate) -> Result<Vec<Task>> {
    let when = match when {
        Some(text) => parse_when_input(text, today)?,
        None => None,
    };
    let updated = append_task(tasks, when)?;
    if let Some(t) = updated.last() {
        info!("created task {}", t.id);
    }
    Ok(updated)
}

/// Applies an action, reporting ids that match no task.
pub fn cmd_action(tasks: &[Task], action: &TaskAction) -> Result<Vec<Task>> {
    try_apply_action(tasks, action)
}

/// Builds an action from its name and a JSON payload, then applies it.
pub fn cmd_apply(tasks: &[Task], name: &str, payload: &str) -> Result<Vec<Task>> {
    let payload: serde_json::Value = serde_json::from_str(payload)?;
    let action = TaskAction::from_parts(name, payload)?;
    cmd_action(tasks, &action)
}

/// Translates command line edits into a patch.
pub fn build_patch(id: u64, fields: UpdateFields, today: NaiveDate) -> Result<TaskPatch> {
    let mut patch = TaskPatch::new(id);
    if let Some(n) = fields.name {
        patch = patch.name(n);
    }
    if fields.clear_when {
        patch = patch.when(None);
    } else if let Some(w) = fields.when {
        patch = patch.when(parse_when_input(&w, today)?);
    }
    if fields.clear_notes {
        patch = patch.notes(None);
    } else if let Some(n) = fields.notes {
        patch = patch.notes(Some(n));
    }
    if fields.clear_priority {
        patch = patch.priority(None);
    } else if let Some(p) = fields.priority {
        patch = patch.priority(Some(p.parse::<Priority>()?));
    }
    if fields.clear_tags {
        patch = patch.tags(Vec::new());
    } else if !fields.tags.is_empty() {
        patch = patch.tags(fields.tags.into_iter().map(Tag::new).collect());
    }
    Ok(patch)
}

/// Edits an existing task's details.
pub fn cmd_update(
    tasks: &[Task],
    id: u64,
    fields: UpdateFields,
    today: NaiveDate,
) -> Result<Vec<Task>> {
    let patch = build_patch(id, fields, today)?;
    cmd_action(tasks, &TaskAction::Update(patch))
}

/// Edits the checklist of task `id`.
pub fn cmd_checklist(tasks: &[Task], id: u64, op: ChecklistOp) -> Result<Vec<Task>> {
    let task = tasks.iter().find(|t| t.id == id).ok_or(DaybookError::NotFound(id))?;
    let updated = match op {
        ChecklistOp::Add(name) => add_checklist_item(task, name)?,
        ChecklistOp::Done(item) => set_checklist_item(task, item, true)?,
        ChecklistOp::Undo(item) => set_checklist_item(task, item, false)?,
        ChecklistOp::Remove(item) => remove_checklist_item(task, item)?,
    };
    let patch = TaskPatch::new(id).checklist(updated.checklist);
    cmd_action(tasks, &TaskAction::Update(patch))
}
