//! Patient detail view: patient card, surgery list and surgery detail

use crate::app::App;
use crate::state::{DetailFocus, Patient, Surgery};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the patient detail view
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(ref patient) = app.state.patient else {
        let empty = Paragraph::new("Nenhum paciente selecionado")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // patient card
            Constraint::Length(3), // surgery search
            Constraint::Min(0),    // surgery list
        ])
        .split(columns[0]);

    draw_patient_card(frame, left[0], app, patient);
    draw_surgery_search(frame, left[1], app);
    draw_surgery_list(frame, left[2], app);
    draw_surgery_detail(frame, columns[1], app);
}

fn draw_patient_card(frame: &mut Frame, area: Rect, app: &App, patient: &Patient) {
    let today = chrono::Local::now().date_naive();
    let age = patient
        .age(today)
        .map(|a| format!("{a} anos"))
        .unwrap_or_else(|| "idade desconhecida".to_string());
    let gender = match patient.gender.as_str() {
        "M" => "Masculino",
        "F" => "Feminino",
        other => other,
    };

    let lines = vec![
        Line::from(Span::styled(
            patient.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{age} · {gender}"),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled("Convenio: ", Style::default().fg(Color::DarkGray)),
            Span::raw(patient.helthcare.clone()),
        ]),
        Line::from(vec![
            Span::styled("Alergias: ", Style::default().fg(Color::DarkGray)),
            Span::raw(patient.alergy.clone()),
        ]),
        Line::from(vec![
            Span::styled("Cirurgias: ", Style::default().fg(Color::DarkGray)),
            Span::raw(app.state.surgeries.len().to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "p: editar paciente",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Paciente ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(card, area);
}

fn draw_surgery_search(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = matches!(app.state.detail_focus, DetailFocus::Search);
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let input_text = if app.state.surgery_filter.is_empty() {
        Span::styled("Pesquisar...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            app.state.surgery_filter.as_str(),
            Style::default().fg(Color::White),
        )
    };

    let input = Paragraph::new(Line::from(input_text)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, area);
}

fn draw_surgery_list(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = matches!(app.state.detail_focus, DetailFocus::List);
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let filtered = app.state.filtered_surgeries();
    if filtered.is_empty() {
        let empty = Paragraph::new("Nenhuma cirurgia. Pressione 'n' para criar.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Cirurgias ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|surgery| {
            let is_selected = app.state.selected_surgery_id.as_deref() == Some(&surgery.id);
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(surgery.hospital.clone(), style),
                Span::styled(
                    format!("  {}", surgery.date),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Cirurgias ({}) ", filtered.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(list, area);
}

fn draw_surgery_detail(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Detalhes ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(surgery) = app.state.selected_surgery() else {
        let empty = Paragraph::new("Selecione uma cirurgia")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let lines = detail_lines(surgery);
    let detail = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(detail, area);
}

fn detail_lines(surgery: &Surgery) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            surgery.hospital.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Data: ", Style::default().fg(Color::DarkGray)),
            Span::raw(surgery.date.clone()),
        ]),
        Line::from(vec![
            Span::styled("Procedimentos: ", Style::default().fg(Color::DarkGray)),
            Span::raw(surgery.procedure_names()),
        ]),
        Line::from(""),
    ];

    if !surgery.annotation.is_empty() {
        for annotation_line in surgery.annotation.lines() {
            lines.push(Line::from(annotation_line.to_string()));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "e: editar  d: excluir",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
