//! Form view rendering (field list, add-field panel, submit)

use super::components::render_button;
use super::field_renderer::{draw_choice_box, draw_field, draw_input_box, FIELD_HEIGHT};
use crate::app::App;
use crate::state::Focus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the form view: field list on the left, add-field panel and submit
/// on the right
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Field list
            Constraint::Length(32), // Add-field panel + submit
        ])
        .split(area);

    draw_field_list(frame, main_chunks[0], app);
    draw_side_panel(frame, main_chunks[1], app);
}

fn draw_field_list(frame: &mut Frame, area: Rect, app: &App) {
    let on_fields = matches!(app.state.focus, Focus::Field(_));
    let border_color = if on_fields {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Form ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = app.state.form.fields();
    if fields.is_empty() {
        let hint = Paragraph::new(Line::from(
            "No fields yet. Use the panel on the right to add one.",
        ))
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    let mut constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, field) in fields.iter().enumerate() {
        let id = field.identifier.as_str();
        let value = app.state.form.value(id).unwrap_or("");
        let error = app.state.form.error(id).unwrap_or("");
        let is_active = app.state.focus == Focus::Field(index);
        draw_field(frame, chunks[index], field, value, error, is_active);
    }
}

fn draw_side_panel(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(14), // Add-field panel
            Constraint::Length(3),  // Submit button
            Constraint::Min(0),
        ])
        .split(area);

    draw_add_panel(frame, chunks[0], app);

    render_button(
        frame,
        chunks[1],
        "Submit",
        app.state.focus == Focus::SubmitButton,
        app.state.form.can_submit(),
    );
}

fn draw_add_panel(frame: &mut Frame, area: Rect, app: &App) {
    let on_panel = matches!(
        app.state.focus,
        Focus::DraftLabel | Focus::DraftKind | Focus::DraftRequired | Focus::AddButton
    );
    let border_color = if on_panel {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Add Field ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Label
            Constraint::Length(3), // Kind
            Constraint::Length(3), // Required
            Constraint::Length(3), // Add button
        ])
        .split(inner);

    let draft = app.state.form.draft();

    draw_input_box(
        frame,
        chunks[0],
        "Label",
        &draft.label,
        app.state.focus == Focus::DraftLabel,
    );

    draw_choice_box(
        frame,
        chunks[1],
        "Type",
        draft.kind.label(),
        app.state.focus == Focus::DraftKind,
    );

    draw_choice_box(
        frame,
        chunks[2],
        "Required",
        if draft.required { "Yes" } else { "No" },
        app.state.focus == Focus::DraftRequired,
    );

    render_button(
        frame,
        chunks[3],
        "Add Field",
        app.state.focus == Focus::AddButton,
        app.state.form.can_add_field(),
    );
}
