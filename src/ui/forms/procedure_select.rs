//! Procedure selector widget (search-as-you-type with toggle select)

use crate::state::SurgeryForm;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the procedure selector: query input, lookup results and the
/// selected set
pub fn draw(frame: &mut Frame, area: Rect, form: &SurgeryForm, is_active: bool) {
    let border_color = if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Procedimentos ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // query input
            Constraint::Min(3),    // lookup results
            Constraint::Length(2), // selected set
        ])
        .split(inner);

    draw_query_input(frame, chunks[0], form, is_active);
    draw_results(frame, chunks[1], form);
    draw_selected(frame, chunks[2], form);
}

fn draw_query_input(frame: &mut Frame, area: Rect, form: &SurgeryForm, is_active: bool) {
    let input_text = if form.procedure_query.is_empty() {
        Span::styled("Pesquisar...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            form.procedure_query.as_str(),
            Style::default().fg(Color::White),
        )
    };

    let cursor = if is_active { "▌" } else { "" };
    let line = Line::from(vec![
        input_text,
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_results(frame: &mut Frame, area: Rect, form: &SurgeryForm) {
    if form.procedure_options.is_empty() {
        return;
    }

    let items: Vec<ListItem> = form
        .procedure_options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let is_cursor = idx == form.procedure_cursor;
            let is_selected = form.procedures.iter().any(|p| p.id == option.id);

            let prefix = if is_cursor { "▸ " } else { "  " };
            let marker = if is_selected { "[x] " } else { "[ ] " };
            let style = if is_cursor {
                Style::default().fg(Color::Cyan)
            } else if is_selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(Line::from(Span::styled(
                format!("{}{}{}", prefix, marker, option.name),
                style,
            )))
        })
        .collect();

    frame.render_widget(List::new(items), area);
}

fn draw_selected(frame: &mut Frame, area: Rect, form: &SurgeryForm) {
    let line = if form.procedures.is_empty() {
        Line::from(Span::styled(
            "Nenhum procedimento selecionado",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let names = form
            .procedures
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Line::from(vec![
            Span::styled("Selecionados: ", Style::default().fg(Color::DarkGray)),
            Span::styled(names, Style::default().fg(Color::Green)),
        ])
    };
    frame.render_widget(Paragraph::new(line), area);
}
