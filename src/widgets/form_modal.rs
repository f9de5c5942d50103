use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::input::{FieldKind, FormState};
use crate::theme;

pub fn render(form: &FormState, frame: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from("")];
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let value = match field.kind {
            FieldKind::Secret => "•".repeat(field.value.chars().count()),
            FieldKind::Toggle if field.value == "true" => "[x]".to_string(),
            FieldKind::Toggle => "[ ]".to_string(),
            FieldKind::Path if field.value.is_empty() && !focused => "(no file)".to_string(),
            FieldKind::Text | FieldKind::Path => field.value.clone(),
        };
        let label_style = if focused {
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        let mut spans = vec![
            Span::styled(if focused { " ▸ " } else { "   " }, label_style),
            Span::styled(format!("{:<16}", field.label), label_style),
            Span::styled(value, Style::default().fg(theme::TEXT)),
        ];
        if focused && field.kind != FieldKind::Toggle {
            spans.push(Span::styled("_", Style::default().fg(theme::TEXT_MUTED)));
        }
        lines.push(Line::from(spans));
    }

    let height = (lines.len() as u16 + 3).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(format!(" {} ", form.title))
        .style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}
