//! Confirmation dialog component for destructive actions

use super::base::centered_area;
use crate::state::PendingDeleteAction;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render a confirmation dialog for a surgery delete action
pub fn render_confirm_dialog(frame: &mut Frame, action: &PendingDeleteAction) {
    let area = frame.area();
    let dialog_area = centered_area(area, 50, 10);

    // Clear the area behind the dialog
    frame.render_widget(Clear, dialog_area);

    let max_display_len = (dialog_area.width.saturating_sub(6)) as usize;
    let display_text = truncate_string(&action.entity_display, max_display_len);

    let mut content = vec![
        Line::from(Span::styled(
            "Excluir Cirurgia",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Tem certeza que deseja excluir essa cirurgia",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(display_text, Style::default().fg(Color::Cyan))),
        Line::from(""),
    ];

    // Options: Não (cancel) first, Sim (confirm) second
    let options = [false, true];
    let labels = ["Não", "Sim"];
    let colors = [Color::White, Color::Red];

    for (i, (&is_confirm, &label)) in options.iter().zip(labels.iter()).enumerate() {
        let is_selected = action.selected_option == is_confirm;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(colors[i]).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        content.push(Line::from(Span::styled(
            format!("{}{}", prefix, label),
            style,
        )));
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(Color::Cyan)),
        Span::styled(" select  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]));

    let dialog = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::new().bg(Color::Black).fg(Color::White));

    frame.render_widget(dialog, dialog_area);
}

/// Truncate a string to a maximum length with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_string("Santa Casa", 20), "Santa Casa");
    }

    #[test]
    fn test_truncate_long_string_adds_ellipsis() {
        assert_eq!(truncate_string("Hospital das Clínicas", 10), "Hospita...");
    }
}
