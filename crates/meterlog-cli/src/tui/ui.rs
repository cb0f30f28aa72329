//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use meterlog_core::history::EMPTY_MESSAGE;

use super::app::{App, FormField, InputMode};

/// Main UI rendering function
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    draw_history(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);

    match app.input_mode {
        InputMode::Normal => {}
        InputMode::Form => draw_form(frame, app),
        InputMode::ConfirmClear => draw_confirm_clear(frame),
    }

    if app.show_help {
        draw_help_overlay(frame);
    }

    // Errors go on top of everything else
    if let Some(message) = &app.error_message {
        draw_error(frame, message);
    }
}

/// Draw the history table
fn draw_history(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(format!(" Readings ({}) ", app.history.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    if app.history.is_empty() {
        let paragraph = Paragraph::new(EMPTY_MESSAGE)
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Type", "Date", "Reading (m³)", "Consumption"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .history
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                row.label().to_string(),
                row.reading.date.clone(),
                row.reading.display_value(),
                row.consumption.to_string(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    state.select(Some(app.row_index));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Draw the status bar at the bottom
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        match app.input_mode {
            InputMode::Form => "Tab:next field  Space:toggle type  Enter:save  Esc:cancel",
            InputMode::ConfirmClear => "y:clear all readings  n:cancel",
            InputMode::Normal => "a:add  c:clear  e:csv  p:print  ?:help  q:quit",
        }
        .to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Draw the new reading form
fn draw_form(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect(frame.area(), 44, 7);
    frame.render_widget(Clear, popup_area);

    let form = &app.form;
    let label_style = |field: FormField| {
        if form.focus == field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    };

    const LABEL_WIDTH: u16 = 10;

    let lines = vec![
        Line::from(vec![
            Span::styled("Type:     ", label_style(FormField::Category)),
            Span::raw(format!("< {} >", form.category.label())),
        ]),
        Line::from(vec![
            Span::styled("Date:     ", label_style(FormField::Date)),
            Span::raw(form.date.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Reading:  ", label_style(FormField::Value)),
            Span::raw(form.value.as_str()),
            Span::styled(" m³", Style::default().add_modifier(Modifier::DIM)),
        ]),
    ];

    let block = Block::default()
        .title(" New Reading ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let inner = block.inner(popup_area);
    frame.render_widget(Paragraph::new(lines).block(block), popup_area);

    // Position cursor at the end of the focused text field
    let (row, len) = match form.focus {
        FormField::Category => return,
        FormField::Date => (1, form.date.chars().count()),
        FormField::Value => (2, form.value.chars().count()),
    };
    let cursor_x = (inner.x + LABEL_WIDTH + len as u16).min(inner.right().saturating_sub(1));
    frame.set_cursor_position((cursor_x, inner.y + row));
}

/// Draw the clear confirmation dialog
fn draw_confirm_clear(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 44, 5);
    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Delete all recorded readings?"),
        Line::from(vec![Span::styled(
            "y: yes   n: no",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Clear History ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    frame.render_widget(Paragraph::new(lines).block(block), popup_area);
}

/// Draw a blocking error message
fn draw_error(frame: &mut Frame, message: &str) {
    let popup_area = centered_rect(frame.area(), 60, 9);
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = message.lines().map(|l| Line::from(l.to_string())).collect();
    lines.extend([
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ]);

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Draw help overlay
fn draw_help_overlay(frame: &mut Frame) {
    let popup_area = centered_rect(frame.area(), 50, 20);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg          Jump to first reading"),
        Line::from("  G           Jump to last reading"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a           Add reading"),
        Line::from("  c           Clear history"),
        Line::from("  e           Export CSV"),
        Line::from("  p           Print / export document"),
        Line::from("  r           Reload from disk"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from("Form:"),
        Line::from("  Tab         Next field"),
        Line::from("  Space, ←/→  Toggle water / gas"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Centered popup area, clamped to the frame
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let popup_width = width.min(area.width.saturating_sub(4));
    let popup_height = height.min(area.height.saturating_sub(4));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    Rect::new(popup_x, popup_y, popup_width, popup_height)
}
