//! meterlog TUI
//!
//! Terminal user interface: a history table with consumption, a form for
//! new readings, and the clear/export actions.
//!
//! ## Navigation
//!
//! - j/k or ↑/↓: Move selection up/down
//! - gg / G: Jump to first/last row
//! - q: Quit
//!
//! ## Commands
//!
//! - a: Add reading (Tab cycles fields, Space or ←/→ toggles type, Enter saves)
//! - c: Clear history (asks y/n)
//! - e: Export CSV
//! - p: Export printable document
//! - ?: Help

mod app;
mod ui;

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use tracing::info;

use meterlog_core::{Config, JsonFileStore, Ledger, ReadingStore};

use app::{App, FormField, InputMode};

/// Run the TUI application
pub fn run(config: &Config, ledger: &mut Ledger<JsonFileStore>) -> Result<()> {
    let mut app = App::new(ledger)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    info!("TUI started with {} readings", app.history.len());

    let result = run_app(&mut terminal, &mut app, config, ledger);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    config: &Config,
    ledger: &mut Ledger<JsonFileStore>,
) -> Result<()> {
    // Pending 'g' keypress for gg sequence
    let mut pending_g: Option<Instant> = None;

    loop {
        app.check_status_timeout();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            // Only handle key press events (not release)
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if key.code == KeyCode::Char('g') && app.input_mode == InputMode::Normal {
                match pending_g.take() {
                    Some(time) if time.elapsed() < Duration::from_millis(500) => {
                        app.move_to_first();
                    }
                    _ => pending_g = Some(Instant::now()),
                }
                continue;
            }
            pending_g = None;

            if let Err(e) = handle_key(app, config, ledger, key.code, key.modifiers) {
                app.set_action_error(&e);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Dispatch one key press
fn handle_key<S: ReadingStore>(
    app: &mut App,
    config: &Config,
    ledger: &mut Ledger<S>,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    // If error modal is showing, any key dismisses it
    if app.has_error() {
        app.clear_error();
        return Ok(());
    }

    // If help is showing, any key dismisses it
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, config, ledger, code),
        InputMode::Form => handle_form_mode(app, ledger, code),
        InputMode::ConfirmClear => handle_confirm_mode(app, ledger, code),
    }
}

fn handle_normal_mode<S: ReadingStore>(
    app: &mut App,
    config: &Config,
    ledger: &mut Ledger<S>,
    code: KeyCode,
) -> Result<()> {
    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('G') => app.move_to_last(),
        KeyCode::Char('a') => app.open_form(),
        KeyCode::Char('c') => app.request_clear(),
        KeyCode::Char('e') => app.export_csv(config, ledger),
        KeyCode::Char('p') => app.export_printable(config, ledger),
        KeyCode::Char('r') => {
            app.refresh(ledger)?;
            app.set_status("Reloaded");
        }
        KeyCode::Char('?') => app.toggle_help(),
        _ => {}
    }
    Ok(())
}

fn handle_form_mode<S: ReadingStore>(
    app: &mut App,
    ledger: &mut Ledger<S>,
    code: KeyCode,
) -> Result<()> {
    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(ledger)?,
        KeyCode::Tab | KeyCode::Down => app.form.focus = app.form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus = app.form.focus.prev(),
        KeyCode::Left | KeyCode::Right if app.form.focus == FormField::Category => {
            app.form.toggle_category();
        }
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) => app.form.push_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_confirm_mode<S: ReadingStore>(
    app: &mut App,
    ledger: &mut Ledger<S>,
    code: KeyCode,
) -> Result<()> {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear(ledger)?,
        _ => app.cancel_clear(),
    }
    Ok(())
}
