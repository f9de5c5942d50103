use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::{field_line, section};
use crate::app::App;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let Some(profile) = &app.profile else {
        let loading = Paragraph::new(" Loading profile...")
            .style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(loading, area);
        return;
    };

    let lines = vec![
        Line::from(""),
        section("Admin Profile"),
        field_line("Name", Some(&profile.name)),
        field_line("Email", Some(&profile.email)),
        field_line("Photo", profile.profile_photo.as_deref()),
        Line::from(""),
        Line::styled("   Press e to edit.", Style::default().fg(theme::TEXT_MUTED)),
    ];
    frame.render_widget(Paragraph::new(lines).scroll((app.detail_scroll, 0)), area);
}
