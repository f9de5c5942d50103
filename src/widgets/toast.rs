use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::controller::NoticeLevel;
use crate::theme;

/// Stacks live notices above the footer, newest at the bottom.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let count = app.toasts.len() as u16;
    for (i, (notice, _)) in app.toasts.iter().enumerate() {
        let offset = count - i as u16 + 1;
        if offset > area.height {
            continue;
        }
        let toast_area = Rect {
            x: area.x,
            y: area.y + area.height - offset,
            width: area.width,
            height: 1,
        };

        let (badge, color) = match notice.level {
            NoticeLevel::Success => (" OK ", theme::GREEN),
            NoticeLevel::Error => (" ERROR ", theme::RED),
        };
        let line = Line::from(vec![
            Span::styled(
                badge,
                Style::default()
                    .fg(theme::BG_DARK)
                    .bg(color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", notice.message), Style::default().fg(color)),
        ]);

        frame.render_widget(Clear, toast_area);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().bg(theme::BG_BAR)),
            toast_area,
        );
    }
}
