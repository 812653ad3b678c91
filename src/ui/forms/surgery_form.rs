//! Surgery form rendering (create and edit)

use super::field_renderer::{draw_buttons_row, draw_field};
use super::procedure_select;
use crate::app::App;
use crate::state::{FormState, SurgeryForm};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the surgery create/edit form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let FormState::Surgery(ref form) = app.state.form else {
        return;
    };

    let title = if form.editing.is_some() {
        " Editar Cirurgia "
    } else {
        " Nova Cirurgia "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // fields + procedure selector
            Constraint::Length(3), // buttons row
            Constraint::Length(1), // help text
        ])
        .split(inner);

    draw_body(frame, chunks[0], form);
    draw_buttons_row(
        frame,
        chunks[1],
        form.is_buttons_row_active(),
        form.selected_button,
    );
    draw_help(frame, chunks[2]);
}

/// Registered fields on the left, procedure selector on the right
fn draw_body(frame: &mut Frame, area: Rect, form: &SurgeryForm) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let field_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // hospital
            Constraint::Length(4), // date
            Constraint::Min(4),    // annotation
        ])
        .split(columns[0]);

    for index in 0..SurgeryForm::FIELD_COUNT {
        if let Some(field) = form.registry.field_at(index) {
            draw_field(
                frame,
                field_chunks[index],
                field,
                form.active_field_index == index,
            );
        }
    }

    procedure_select::draw(frame, columns[1], form, form.is_procedure_slot_active());
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": next field  "),
        Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
        Span::raw(": save  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
