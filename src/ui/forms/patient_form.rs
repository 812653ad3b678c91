//! Patient form rendering (create and edit)

use super::field_renderer::{draw_buttons_row, draw_field};
use crate::app::App;
use crate::state::{FormState, PatientForm};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Field rows per column in the two-column grid
const ROWS_PER_COLUMN: usize = 5;

/// Draw the patient create/edit form
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let FormState::Patient(ref form) = app.state.form else {
        return;
    };

    let title = if form.editing.is_some() {
        " Editar Paciente "
    } else {
        " Novo Paciente "
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
            Constraint::Min(ROWS_PER_COLUMN as u16 * 4), // field grid
            Constraint::Length(3),                       // buttons row
            Constraint::Length(1),                       // help text
        ])
        .split(inner);

    draw_field_grid(frame, chunks[0], form);
    draw_buttons_row(
        frame,
        chunks[1],
        form.is_buttons_row_active(),
        form.selected_button,
    );
    draw_help(frame, chunks[2]);
}

/// Fields laid out in two columns, five rows each
fn draw_field_grid(frame: &mut Frame, area: Rect, form: &PatientForm) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (column_index, column_area) in columns.iter().enumerate() {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4); ROWS_PER_COLUMN])
            .split(*column_area);

        for row_index in 0..ROWS_PER_COLUMN {
            let field_index = column_index * ROWS_PER_COLUMN + row_index;
            if let Some(field) = form.registry.field_at(field_index) {
                draw_field(
                    frame,
                    rows[row_index],
                    field,
                    form.active_field_index == field_index,
                );
            }
        }
    }
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Cyan)),
        Span::raw(": next field  "),
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::raw(": option  "),
        Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
        Span::raw(": save  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(": cancel"),
    ]))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}
