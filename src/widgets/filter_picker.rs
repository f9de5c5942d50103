use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::app::App;
use crate::theme;

pub fn render(app: &App, focus: usize, frame: &mut Frame, area: Rect) {
    let Some(kind) = app.current_kind() else {
        return;
    };
    let filters = app.visible_filters(kind);
    if filters.is_empty() {
        return;
    }
    let focus = focus % filters.len();
    let query = app.feeds.summary(kind).query;

    let mut lines = vec![Line::from("")];
    for (i, (spec, options)) in filters.iter().enumerate() {
        let focused = i == focus;
        let marker = if focused { " ▸ " } else { "   " };
        let mut spans = vec![
            Span::styled(marker, Style::default().fg(theme::ACCENT)),
            Span::styled(
                format!("{:<12}", spec.label),
                if focused {
                    Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT_DIM)
                },
            ),
        ];
        let current = query.filter(spec.key);
        for opt in options {
            let style = if opt.value == current {
                Style::default()
                    .fg(theme::BG_DARK)
                    .bg(if focused { theme::ACCENT } else { theme::ACCENT_DIM })
            } else {
                Style::default().fg(theme::TEXT_MUTED)
            };
            spans.push(Span::styled(format!(" {} ", opt.label), style));
        }
        lines.push(Line::from(spans));
    }

    let height = (lines.len() as u16 + 3).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(80, height, area);
    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(" Filters ");
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}
