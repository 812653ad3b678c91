//! Top-level layout and status bar

use crate::app::App;
use crate::state::View;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the terminal into the main content area and the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Draw the status bar: connection state, feedback message and key hints
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let connection = if app.api_connected {
        Span::styled("● online", Style::default().fg(Color::Green))
    } else {
        Span::styled("● offline", Style::default().fg(Color::Red))
    };

    let hints = match app.state.current_view {
        View::Patients => "Tab: pesquisa  n: novo  Enter: abrir  q: sair",
        View::PatientDetail => "n: nova cirurgia  e: editar  d: excluir  p: paciente  Esc: voltar",
        View::PatientCreate | View::PatientEdit | View::SurgeryCreate | View::SurgeryEdit => {
            "Tab: campo  Ctrl+S: salvar  Esc: cancelar"
        }
    };

    let mut spans = vec![
        connection,
        Span::raw("  "),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ];

    if let Some(ref message) = app.status_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Green),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
