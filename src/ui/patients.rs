//! Patient list view with remote query filter

use crate::app::App;
use crate::state::PatientsFocus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the patient list view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search input
            Constraint::Min(0),    // patient list
        ])
        .split(area);

    draw_search_input(frame, chunks[0], app);
    draw_list(frame, chunks[1], app);
}

fn draw_search_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = matches!(app.state.patients_focus, PatientsFocus::Search);
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let input_text = if app.state.patient_query.is_empty() {
        Span::styled("Pesquisar...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            app.state.patient_query.as_str(),
            Style::default().fg(Color::White),
        )
    };

    let input = Paragraph::new(Line::from(input_text)).block(
        Block::default()
            .title(" Pesquisa ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(input, area);

    if is_focused {
        frame.set_cursor_position((
            area.x + 1 + app.state.patient_query.len() as u16,
            area.y + 1,
        ));
    }
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = matches!(app.state.patients_focus, PatientsFocus::List);
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    if app.state.patients.is_empty() {
        let message = if app.state.patient_query.is_empty() {
            "Nenhum paciente cadastrado. Pressione 'n' para criar."
        } else {
            "Nenhum paciente encontrado."
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Pacientes ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(empty, area);
        return;
    }

    let today = chrono::Local::now().date_naive();
    let items: Vec<ListItem> = app
        .state
        .patients
        .iter()
        .enumerate()
        .map(|(idx, patient)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };

            let age = patient
                .age(today)
                .map(|a| format!("{a} anos"))
                .unwrap_or_default();

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let line = Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(
                    patient.name.clone(),
                    style.add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  {age}"), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("  ({})", patient.helthcare),
                    Style::default().fg(Color::Blue),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let count = app.state.patients.len();
    let list = List::new(items).block(
        Block::default()
            .title(format!(" Pacientes ({}) ", count))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    frame.render_widget(list, area);
}
