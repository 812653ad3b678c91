//! Field rendering utilities for forms

use crate::state::{FieldValue, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw a form field from the domain layer. A validation error turns
/// the border red and is rendered inline under the value.
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = field.display_value();
    let is_select = matches!(field.value, FieldValue::Select { .. });
    let display_str = if display_value.is_empty() && !is_active {
        if is_select {
            "(selecione)".to_string()
        } else {
            "(vazio)".to_string()
        }
    } else {
        display_value
    };

    let cursor = if is_active && !is_select { "▌" } else { "" };

    let mut lines: Vec<Line> = if field.is_multiline {
        display_str
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect()
    } else {
        vec![Line::from(vec![
            Span::styled(display_str.clone(), style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ])]
    };
    if field.is_multiline && is_active {
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        } else {
            lines.push(Line::from(Span::styled(
                cursor,
                Style::default().fg(Color::Cyan),
            )));
        }
    }

    if let Some(ref error) = field.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

/// Draw the Salvar/Cancelar buttons row shared by the entity forms
pub fn draw_buttons_row(frame: &mut Frame, area: Rect, is_active: bool, selected_button: usize) {
    let labels = ["Salvar", "Cancelar"];
    let colors = [Color::Green, Color::Red];

    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let selected = is_active && selected_button == i;
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(colors[i])
                .add_modifier(ratatui::style::Modifier::BOLD)
        } else {
            Style::default().fg(colors[i])
        };
        spans.push(Span::styled(format!("[ {} ]", label), style));
        spans.push(Span::raw("  "));
    }

    let border_color = if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
