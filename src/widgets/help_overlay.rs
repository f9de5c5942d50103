use ratatui::style::{Modifier, Style};
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::{centered_rect, section};
use crate::app::View;
use crate::kinds::{kind_spec, KindId};
use crate::theme;

pub fn render(view: &View, frame: &mut Frame, area: Rect) {
    let mut lines = vec![];

    lines.push(Line::from(""));
    lines.push(section("Navigation"));
    lines.push(binding("j / k / Up / Down", "Move selection or scroll"));
    lines.push(binding("gg / G", "Go to top / bottom"));
    lines.push(binding("Ctrl+D / Ctrl+U", "Jump down / up"));
    lines.push(binding("1 .. 5", "Dashboard, tests, labs, parents, profile"));
    if matches!(view, View::RegistrationDetail) {
        lines.push(binding("Esc", "Back to list"));
    }

    if let View::Collection(kind) = view {
        lines.push(Line::from(""));
        lines.push(section("List"));
        lines.push(binding("/ (slash)", "Search as you type"));
        lines.push(binding("f", "Filters"));
        lines.push(binding("[ / ]", "Previous / next page"));
        if *kind == KindId::Registration {
            lines.push(binding("t", "Individual / parent labs"));
        }

        lines.push(Line::from(""));
        lines.push(section("Row Actions"));
        for op in kind_spec(*kind).operations {
            lines.push(Line::from(vec![
                Span::styled(format!("    {:<22}", op.key), Style::default().fg(theme::YELLOW)),
                Span::styled(op.label, Style::default().fg(theme::TEXT)),
            ]));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Commands"));
    lines.push(binding(": (colon)", "Command mode"));
    lines.push(binding(":login / :logout", "Session"));
    lines.push(binding(":q", "Quit"));

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding("Ctrl+R", "Refresh"));
    lines.push(binding("?", "Toggle this help"));

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(
            " Help (? to close) ",
            Style::default().add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, modal_area);
}

fn binding<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {:<22}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc, Style::default().fg(theme::TEXT)),
    ])
}
