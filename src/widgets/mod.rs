pub mod collection;
pub mod command_input;
pub mod confirm_modal;
pub mod dashboard;
pub mod filter_picker;
pub mod footer;
pub mod form_modal;
pub mod help_overlay;
pub mod profile;
pub mod registration_detail;
pub mod tab_bar;
pub mod toast;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

pub(crate) fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}

pub(crate) fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

/// "  Label            value" with a dash for missing values.
pub(crate) fn field_line(label: &str, value: Option<&str>) -> Line<'static> {
    let value = value.filter(|v| !v.is_empty()).unwrap_or("-");
    Line::from(vec![
        Span::styled(
            format!("   {:<22}", label),
            Style::default().fg(theme::TEXT_DIM),
        ),
        Span::styled(value.to_string(), Style::default().fg(theme::TEXT)),
    ])
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
