use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{DaybookError, Result};

/// Represents a single to-do entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Unique identifier within the collection.
    pub id: u64,
    /// The name of the task. Empty while a new task is being edited.
    #[serde(default)]
    pub name: String,
    /// Whether the task has been completed.
    #[serde(default)]
    pub completed: bool,
    /// The day the task is scheduled for. `None` means the task sits in the inbox.
    #[serde(default, deserialize_with = "deserialize_when")]
    pub when: Option<NaiveDate>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    #[serde(default)]
    pub priority: Option<Priority>,
    /// View state: the task currently highlighted.
    #[serde(default)]
    pub selected: bool,
    /// View state: the task is open for editing.
    #[serde(default)]
    pub expanded: bool,
}

/// A label attached to a task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tag {
    /// Creates a tag whose id is its own value.
    pub fn new(value: impl Into<String>) -> Tag {
        let value = value.into();
        Tag { id: value.clone(), value, color: None, description: None }
    }
}

/// A sub-item of a task. `id` is stable within the owning task.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    /// Zero means "not assigned yet"; see [`crate::task_utils::assign_checklist_ids`].
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Cycles none -> low -> medium -> high -> none.
    pub fn cycle(current: Option<Priority>) -> Option<Priority> {
        match current {
            None => Some(Priority::Low),
            Some(Priority::Low) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::High),
            Some(Priority::High) => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(DaybookError::InvalidPriority(s.to_string())),
        }
    }
}

/// Which tasks a list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    /// Tasks scheduled for this day. The Today view uses the current day.
    Day(NaiveDate),
    /// Unscheduled tasks.
    Inbox,
    All,
}

impl ViewFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ViewFilter::Day(day) => task.when == Some(*day),
            ViewFilter::Inbox => task.when.is_none(),
            ViewFilter::All => true,
        }
    }

    /// Day assigned to tasks created while this view is shown.
    pub fn default_when(&self) -> Option<NaiveDate> {
        match self {
            ViewFilter::Day(day) => Some(*day),
            ViewFilter::Inbox | ViewFilter::All => None,
        }
    }

    /// Today -> Inbox -> All -> Today. Any other day goes back to Inbox.
    pub fn next(&self, today: NaiveDate) -> ViewFilter {
        match self {
            ViewFilter::Day(_) => ViewFilter::Inbox,
            ViewFilter::Inbox => ViewFilter::All,
            ViewFilter::All => ViewFilter::Day(today),
        }
    }

    pub fn label(&self, today: NaiveDate) -> String {
        match self {
            ViewFilter::Day(day) if *day == today => "Today".to_string(),
            ViewFilter::Day(day) => day.format("%a, %-d %b %Y").to_string(),
            ViewFilter::Inbox => "Inbox".to_string(),
            ViewFilter::All => "All".to_string(),
        }
    }

    /// Parses `today`, `tomorrow`, `inbox`, `all` or a `YYYY-MM-DD` day.
    pub fn parse(text: &str, today: NaiveDate) -> Result<ViewFilter> {
        match text.trim().to_lowercase().as_str() {
            "today" => Ok(ViewFilter::Day(today)),
            "tomorrow" => Ok(ViewFilter::Day(today + Duration::days(1))),
            "inbox" => Ok(ViewFilter::Inbox),
            "all" => Ok(ViewFilter::All),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(ViewFilter::Day)
                .map_err(|_| DaybookError::InvalidView(text.to_string())),
        }
    }
}

/// Result of splitting a view into open and done tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub available: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.available.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field changes merged onto a task by [`TaskAction::Update`].
///
/// Absent entries keep the current value. For optional fields `Some(None)`
/// clears the value; in JSON an explicit `null` clears and an omitted key keeps.
/// Keys that name no task field are rejected, so a whole serialized [`Task`]
/// is a valid patch but a misspelled one is not.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TaskPatch {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "deserialize_when_patch",
        skip_serializing_if = "Option::is_none"
    )]
    pub when: Option<Option<NaiveDate>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Option<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<ChecklistItem>>,
    /// Collapses or opens the task in the view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    /// Accepted so a whole task can be sent; an update always deselects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
}

impl TaskPatch {
    pub fn new(id: u64) -> TaskPatch {
        TaskPatch { id, ..TaskPatch::default() }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn when(mut self, when: Option<NaiveDate>) -> Self {
        self.when = Some(when);
        self
    }

    pub fn notes(mut self, notes: Option<String>) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn checklist(mut self, checklist: Vec<ChecklistItem>) -> Self {
        self.checklist = Some(checklist);
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    /// Returns `task` with every present entry of the patch written over it.
    pub fn merge_into(&self, task: &Task) -> Task {
        let mut merged = task.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(completed) = self.completed {
            merged.completed = completed;
        }
        if let Some(when) = self.when {
            merged.when = when;
        }
        if let Some(notes) = &self.notes {
            merged.notes = notes.clone();
        }
        if let Some(priority) = self.priority {
            merged.priority = priority;
        }
        if let Some(tags) = &self.tags {
            merged.tags = tags.clone();
        }
        if let Some(checklist) = &self.checklist {
            merged.checklist = checklist.clone();
        }
        if let Some(expanded) = self.expanded {
            merged.expanded = expanded;
        }
        merged
    }
}

/// The named mutations a view can apply to a task collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Select(u64),
    Delete(u64),
    Update(TaskPatch),
    Complete { id: u64, completed: bool },
}

#[derive(Deserialize)]
struct IdPayload {
    id: u64,
}

#[derive(Deserialize)]
struct CompletePayload {
    id: u64,
    completed: bool,
}

impl TaskAction {
    /// The id of the task the action targets.
    pub fn target_id(&self) -> u64 {
        match self {
            TaskAction::Select(id) | TaskAction::Delete(id) => *id,
            TaskAction::Update(patch) => patch.id,
            TaskAction::Complete { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TaskAction::Select(_) => "select",
            TaskAction::Delete(_) => "delete",
            TaskAction::Update(_) => "update",
            TaskAction::Complete { .. } => "complete",
        }
    }

    /// Builds an action from its name and a JSON payload.
    ///
    /// `select` and `delete` take a bare id or `{"id": n}`; `update` takes a
    /// [`TaskPatch`]; `complete` takes `{"id": n, "completed": bool}`.
    pub fn from_parts(name: &str, payload: serde_json::Value) -> Result<TaskAction> {
        match name.trim().to_lowercase().as_str() {
            "select" => Ok(TaskAction::Select(id_from_payload(payload)?)),
            "delete" => Ok(TaskAction::Delete(id_from_payload(payload)?)),
            "update" => Ok(TaskAction::Update(serde_json::from_value(payload)?)),
            "complete" => {
                let p: CompletePayload = serde_json::from_value(payload)?;
                Ok(TaskAction::Complete { id: p.id, completed: p.completed })
            }
            _ => Err(DaybookError::UnknownAction(name.to_string())),
        }
    }
}

fn id_from_payload(payload: serde_json::Value) -> Result<u64> {
    if let Some(id) = payload.as_u64() {
        return Ok(id);
    }
    let p: IdPayload = serde_json::from_value(payload)?;
    Ok(p.id)
}

/// Reads a day marker from text, dropping any time of day.
///
/// Accepts an empty string (no day), `YYYY-MM-DD`, a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp, or an RFC 3339 timestamp, which is
/// converted to the local calendar day.
pub fn parse_day(text: &str) -> Result<Option<NaiveDate>> {
    let s = text.trim();
    if s.is_empty() {
        return Ok(None);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(Some(d));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(Some(dt.with_timezone(&Local).date_naive()));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(dt.date()));
    }
    Err(DaybookError::InvalidDate(text.to_string()))
}

/// Reads a day typed by the user: `today`, `tomorrow`, `inbox`/`none`, or
/// anything [`parse_day`] accepts.
pub fn parse_when_input(text: &str, today: NaiveDate) -> Result<Option<NaiveDate>> {
    match text.trim().to_lowercase().as_str() {
        "today" => Ok(Some(today)),
        "tomorrow" => Ok(Some(today + Duration::days(1))),
        "inbox" | "none" => Ok(None),
        _ => parse_day(text),
    }
}

fn deserialize_when<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) => parse_day(&s).map_err(serde::de::Error::custom),
    }
}

fn deserialize_when_patch<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_when(deserializer).map(Some)
}

fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
