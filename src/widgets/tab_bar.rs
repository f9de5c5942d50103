use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::ViewType;
use crate::app::{App, SessionStatus, View};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " labdesk ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
    ];

    for (i, tab) in ViewType::ALL.iter().enumerate() {
        let style = if *tab == app.active_tab {
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        left_spans.push(Span::styled(format!("{}", i + 1), Style::default().fg(theme::ACCENT_DIM)));
        left_spans.push(Span::styled(format!(" {}  ", tab.label()), style));
    }

    if app.view == View::RegistrationDetail {
        let name = app
            .registration
            .as_ref()
            .map(|r| r.lab_name.as_str())
            .unwrap_or("...");
        left_spans.push(Span::styled("> ", Style::default().fg(theme::TEXT_MUTED)));
        left_spans.push(Span::styled(name.to_string(), Style::default().fg(theme::TEXT_DIM)));
    }

    let session = match app.session {
        SessionStatus::Active => Span::styled(
            format!("● {}", app.login_email_or("signed in")),
            Style::default().fg(theme::GREEN),
        ),
        SessionStatus::LoggingIn => {
            Span::styled("◌ Signing in...", Style::default().fg(theme::YELLOW))
        }
        SessionStatus::LoggedOut => {
            Span::styled("○ Signed out", Style::default().fg(theme::TEXT_MUTED))
        }
    };
    let right_spans = vec![session, Span::raw(" ")];

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
