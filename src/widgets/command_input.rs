use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::app::App;
use crate::input::commands::{matching_commands, COMMANDS};
use crate::theme;

pub fn render_command_modal(app: &App, frame: &mut Frame, area: Rect) {
    let input_cmd = app.input_buffer.split_whitespace().next().unwrap_or("");
    let matches = if input_cmd.is_empty() {
        COMMANDS.iter().collect()
    } else {
        matching_commands(input_cmd)
    };

    let mut input = vec![
        Span::styled(":", Style::default().fg(theme::YELLOW)),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
    ];
    // Ghost completion for the first match
    if let Some(cmd) = matches.first() {
        if !input_cmd.is_empty() && cmd.name.len() > input_cmd.len() && cmd.name.starts_with(input_cmd) {
            input.push(Span::styled(
                &cmd.name[input_cmd.len()..],
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }
    }
    input.push(Span::styled("_", Style::default().fg(theme::TEXT_MUTED)));

    let mut lines = vec![Line::from(input), Line::from("")];
    if matches.is_empty() {
        lines.push(Line::from(Span::styled(
            " No matching commands",
            Style::default().fg(theme::TEXT_MUTED),
        )));
    }
    for (i, cmd) in matches.iter().enumerate() {
        let name_style = if i == 0 {
            Style::default().fg(theme::ACCENT)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        let mut spans = vec![Span::styled(format!(" :{:<15}", cmd.name), name_style)];
        spans.push(Span::styled(
            cmd.description,
            Style::default().fg(theme::TEXT_MUTED),
        ));
        if !cmd.aliases.is_empty() {
            spans.push(Span::styled(
                format!("  ({})", cmd.aliases.join(", ")),
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }
        lines.push(Line::from(spans));
    }

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let modal_area = centered_rect(50, height, area);
    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::YELLOW))
        .title(" Command ");
    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

pub fn render_search_modal(app: &App, frame: &mut Frame, area: Rect) {
    let modal_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(4),
        width: area.width,
        height: 3.min(area.height),
    };
    frame.render_widget(Clear, modal_area);

    let line = Line::from(vec![
        Span::styled(" /", Style::default().fg(theme::GREEN)),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
        Span::styled("_", Style::default().fg(theme::TEXT_MUTED)),
    ]);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::GREEN))
        .title(" Search (results update as you type) ");
    frame.render_widget(
        Paragraph::new(line)
            .block(block)
            .style(Style::default().bg(theme::BG_SURFACE)),
        modal_area,
    );
}
