//! Layout and status bar

use crate::app::App;
use crate::platform;
use crate::state::{Focus, FormPhase};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the terminal into content and a one-line status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Aggregate phase indicator
    let phase = app.state.form.phase();
    let phase_color = match phase {
        FormPhase::Idle => Color::Gray,
        FormPhase::Valid => Color::Green,
        FormPhase::Invalid => Color::Red,
    };
    spans.push(Span::styled(" ● ", Style::default().fg(phase_color)));
    spans.push(Span::styled(
        format!("{} ({} fields)", phase.label(), app.state.form.len()),
        Style::default().fg(Color::Gray),
    ));

    // Focus-specific hints
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        get_focus_hints(&app.state.focus),
        Style::default().fg(Color::DarkGray),
    ));

    // Status message
    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right
    let quit_hint = format!(" {}  ^C:quit ", platform::COPY_HINT);
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Get keyboard hints for the current focus
fn get_focus_hints(focus: &Focus) -> String {
    match focus {
        Focus::Field(_) => "type to edit  Tab:next  ^R:remove field".to_string(),
        Focus::DraftLabel => "type a label  Tab:next".to_string(),
        Focus::DraftKind | Focus::DraftRequired => "←/→:change  Tab:next".to_string(),
        Focus::AddButton => "Enter:add field  Tab:next".to_string(),
        Focus::SubmitButton => "Enter:submit  Tab:next".to_string(),
    }
}
