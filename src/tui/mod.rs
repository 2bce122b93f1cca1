pub mod app;
pub mod ui;

use std::{error::Error, io};
use chrono::NaiveDate;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use app::{App, InputMode, InputField};
use ui::ui;
use crate::models::{Task, ViewFilter};

/// Runs the interactive view over `tasks`. Changes last for the session only.
pub fn run_tui(tasks: Vec<Task>, view: ViewFilter, today: NaiveDate) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tasks, view, today);
    debug!("tui started with {} tasks", app.tasks.len());

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') => app.toggle_complete_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('n') => app.start_edit(InputField::Name),
                    KeyCode::Char('w') => app.start_edit(InputField::When),
                    KeyCode::Char('o') => app.start_edit(InputField::Notes),
                    KeyCode::Char('t') => app.start_edit(InputField::Tag),
                    KeyCode::Char('x') => app.start_edit(InputField::ChecklistItem),
                    KeyCode::Char('p') => app.cycle_priority(),
                    KeyCode::Char('c') => app.toggle_completed(),
                    KeyCode::Char('v') => app.cycle_view(),
                    _ => {}
                },
                InputMode::Editing => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                }
            }
        }
    }
}
