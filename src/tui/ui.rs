use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use crate::commands::{checklist_progress, tag_list};
use crate::models::{Priority, Task};
use crate::task_utils::format_display_date_from;
use super::app::{App, InputField, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(7), // Details
            Constraint::Length(3)  // Help
        ].as_ref())
        .split(f.area());

    let today = app.today;
    let rows: Vec<Row> = app
        .display
        .iter()
        .map(|t| {
            let when = if t.when.is_some() {
                format_display_date_from(t.when, today)
            } else {
                "Inbox".to_string()
            };

            let style = if t.completed {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                match t.priority {
                    Some(Priority::High) => Style::default().fg(Color::Red),
                    Some(Priority::Medium) => Style::default().fg(Color::Yellow),
                    _ => Style::default(),
                }
            };

            Row::new(vec![
                Cell::from(if t.completed { "[x]" } else { "[ ]" }),
                Cell::from(t.name.clone()),
                Cell::from(when),
                Cell::from(t.priority.map(|p| p.to_string()).unwrap_or_default()),
                Cell::from(tag_list(t)),
                Cell::from(checklist_progress(t)),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(6),
    ];

    let title = format!(
        "Daybook - {} ({} open, {} done{})",
        app.view.label(today),
        app.available_len,
        app.completed_len,
        if app.show_completed { "" } else { ", hidden" }
    );

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Name", "When", "Priority", "Tags", "List"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let details = Paragraph::new(detail_lines(app.selected()))
        .block(Block::default().borders(Borders::ALL).title("Details"));
    f.render_widget(details, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => concat!(
            "q: Quit | a: Add | n: Name | w: When | o: Notes | p: Priority | t: Tag | ",
            "x: Checklist | Space: Done | d: Del | c: Toggle Done | v: View"
        ),
        InputMode::Editing => "Enter: Save | Esc: Cancel",
    };
    let help_line = match &app.status {
        Some(msg) => format!("{}  |  {}", msg, help_text),
        None => help_text.to_string(),
    };

    let help = Paragraph::new(help_line)
        .style(Style::default().fg(if app.status.is_some() { Color::Red } else { Color::Gray }))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Editing {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.input_field {
            InputField::Name => "Edit Name",
            InputField::When => "Edit Day (today, tomorrow, inbox, YYYY-MM-DD)",
            InputField::Notes => "Edit Notes",
            InputField::Tag => "Add Tag",
            InputField::ChecklistItem => "Add Checklist Item",
            InputField::None => "Edit",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn detail_lines(task: Option<&Task>) -> Vec<Line<'static>> {
    let Some(t) = task else {
        return vec![Line::from("No task selected.")];
    };
    let mut lines = vec![Line::from(format!("#{} {}", t.id, t.name))];
    if let Some(notes) = &t.notes {
        lines.push(Line::from(format!("Notes: {}", notes)));
    }
    for item in &t.checklist {
        let mark = if item.completed { "[x]" } else { "[ ]" };
        lines.push(Line::from(format!("  {} {}", mark, item.name)));
    }
    lines
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
