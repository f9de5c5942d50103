use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let Some(stats) = app.dashboard else {
        let loading = Paragraph::new(" Loading dashboard...")
            .style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(loading, area);
        return;
    };

    let rows = Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).split(area);
    let cards = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(rows[0]);

    card(frame, cards[0], "Registered Labs", stats.registrations, theme::ACCENT);
    card(frame, cards[1], "Parent Organizations", stats.parents, theme::BLUE);
    card(frame, cards[2], "Tests & Services", stats.tests, theme::GREEN);
}

fn card(frame: &mut Frame, area: Rect, title: &str, count: u64, color: ratatui::style::Color) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", count),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", title),
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::TEXT_MUTED));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
