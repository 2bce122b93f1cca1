use chrono::NaiveDate;
use ratatui::widgets::TableState;

use crate::models::{parse_when_input, Priority, Tag, Task, TaskAction, TaskPatch, ViewFilter};
use crate::task_utils::{add_checklist_item, append_task, apply_action, classify_by_view};

#[derive(PartialEq, Debug)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(PartialEq, Debug)]
pub enum InputField {
    None,
    Name,
    When,
    Notes,
    Tag,
    ChecklistItem,
}

/// View-layer state. `tasks` is the single owned collection; every change
/// goes through [`apply_action`] and replaces it.
pub struct App {
    pub tasks: Vec<Task>,
    pub view: ViewFilter,
    pub today: NaiveDate,
    /// Rows on screen: available tasks, then completed ones when shown.
    pub display: Vec<Task>,
    pub available_len: usize,
    pub completed_len: usize,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    /// Task appended by `a` whose name has not been entered yet.
    pub pending_new: Option<u64>,
    pub show_completed: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(tasks: Vec<Task>, view: ViewFilter, today: NaiveDate) -> App {
        let mut app = App {
            tasks,
            view,
            today,
            display: Vec::new(),
            available_len: 0,
            completed_len: 0,
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            pending_new: None,
            show_completed: true,
            status: None,
        };
        app.refresh();
        app
    }

    fn rebuild_display(&mut self) {
        let partition = classify_by_view(&self.tasks, &self.view);
        self.available_len = partition.available.len();
        self.completed_len = partition.completed.len();
        self.display = partition.available;
        if self.show_completed {
            self.display.extend(partition.completed);
        }
    }

    /// Recomputes the rows and keeps the table cursor on the selected task.
    /// Selects the first row when the selected task is not on screen.
    pub fn refresh(&mut self) {
        self.rebuild_display();
        if self.display.is_empty() {
            self.state.select(None);
            return;
        }
        match self.display.iter().position(|t| t.selected) {
            Some(i) => self.state.select(Some(i)),
            None => {
                let id = self.display[0].id;
                self.tasks = apply_action(&self.tasks, &TaskAction::Select(id));
                self.rebuild_display();
                self.state.select(Some(0));
            }
        }
    }

    /// Applies `action`, then reselects `keep` since updates clear selection.
    fn commit(&mut self, action: TaskAction, keep: Option<u64>) {
        self.tasks = apply_action(&self.tasks, &action);
        if let Some(id) = keep {
            self.tasks = apply_action(&self.tasks, &TaskAction::Select(id));
        }
        self.refresh();
    }

    pub fn selected(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.display.get(i))
    }

    fn select_index(&mut self, i: usize) {
        if let Some(id) = self.display.get(i).map(|t| t.id) {
            self.commit(TaskAction::Select(id), None);
        }
    }

    pub fn next(&mut self) {
        if self.display.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.display.len() => i + 1,
            _ => 0,
        };
        self.select_index(i);
    }

    pub fn previous(&mut self) {
        if self.display.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.display.len() - 1,
            Some(i) => i - 1,
        };
        self.select_index(i);
    }

    /// Flips completion of the selected task.
    pub fn toggle_complete_selected(&mut self) {
        if let Some((id, completed)) = self.selected().map(|t| (t.id, t.completed)) {
            self.commit(TaskAction::Complete { id, completed: !completed }, None);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected().map(|t| t.id) {
            self.commit(TaskAction::Delete(id), None);
        }
    }

    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.refresh();
    }

    /// Switches Today -> Inbox -> All.
    pub fn cycle_view(&mut self) {
        self.view = self.view.next(self.today);
        self.refresh();
    }

    pub fn cycle_priority(&mut self) {
        if let Some((id, current)) = self.selected().map(|t| (t.id, t.priority)) {
            let patch = TaskPatch::new(id).priority(Priority::cycle(current));
            self.commit(TaskAction::Update(patch), Some(id));
        }
    }

    /// Appends a blank task for the current view and asks for its name.
    pub fn start_add(&mut self) {
        match append_task(&self.tasks, self.view.default_when()) {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => {
                self.status = Some(e.to_string());
                return;
            }
        }
        let id = self.tasks.last().map(|t| t.id);
        if let Some(id) = id {
            self.commit(TaskAction::Select(id), None);
            self.pending_new = Some(id);
            self.start_edit(InputField::Name);
        }
    }

    pub fn start_edit(&mut self, field: InputField) {
        let Some(t) = self.selected() else {
            return;
        };
        let (id, prefill) = match field {
            InputField::Name => (t.id, t.name.clone()),
            InputField::When => (t.id, t.when.map(|d| d.to_string()).unwrap_or_default()),
            InputField::Notes => (t.id, t.notes.clone().unwrap_or_default()),
            InputField::Tag | InputField::ChecklistItem => (t.id, String::new()),
            InputField::None => return,
        };
        self.target_id = Some(id);
        self.input_buffer = prefill;
        self.input_field = field;
        self.input_mode = InputMode::Editing;
        self.status = None;
    }

    /// Leaves editing without applying. A just-added task with no name is dropped.
    pub fn cancel_input(&mut self) {
        if let Some(id) = self.pending_new.take() {
            if self.tasks.iter().any(|t| t.id == id && t.name.is_empty()) {
                self.commit(TaskAction::Delete(id), None);
            }
        }
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Applies the input buffer to the field being edited.
    pub fn handle_input(&mut self) {
        let Some(id) = self.target_id else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let Some(task) = self.tasks.iter().find(|t| t.id == id).cloned() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        let text = self.input_buffer.trim().to_string();

        let unnamed_new = self.pending_new == Some(id) && text.is_empty();
        if self.input_field == InputField::Name && unnamed_new {
            // an added task left without a name is dropped, as on Esc
            self.cancel_input();
            return;
        }

        let patch = match self.input_field {
            InputField::Name => Some(TaskPatch::new(id).name(text)),
            InputField::When => match parse_when_input(&text, self.today) {
                Ok(when) => Some(TaskPatch::new(id).when(when)),
                Err(e) => {
                    self.status = Some(e.to_string());
                    return;
                }
            },
            InputField::Notes => {
                let notes = if text.is_empty() { None } else { Some(text) };
                Some(TaskPatch::new(id).notes(notes))
            }
            InputField::Tag if !text.is_empty() => {
                let mut tags = task.tags.clone();
                tags.push(Tag::new(text));
                Some(TaskPatch::new(id).tags(tags))
            }
            InputField::ChecklistItem if !text.is_empty() => {
                match add_checklist_item(&task, text) {
                    Ok(updated) => Some(TaskPatch::new(id).checklist(updated.checklist)),
                    Err(e) => {
                        self.status = Some(e.to_string());
                        return;
                    }
                }
            }
            _ => None,
        };

        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
        self.pending_new = None;
        if let Some(patch) = patch {
            self.commit(TaskAction::Update(patch), Some(id));
        }
    }
}
