use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::{field_line, section, yes_no};
use crate::app::App;
use crate::domain::Registration;
use crate::kinds::format_date;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let Some(reg) = &app.registration else {
        let loading = Paragraph::new(" Loading registration...")
            .style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(loading, area);
        return;
    };

    let paragraph = Paragraph::new(detail_lines(reg))
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn detail_lines(reg: &Registration) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", reg.lab_name),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ),
            if reg.status {
                Span::styled("  ● Active", Style::default().fg(theme::GREEN))
            } else {
                Span::styled("  ○ Inactive", Style::default().fg(theme::TEXT_MUTED))
            },
        ]),
        Line::from(""),
        section("Lab"),
        field_line("Type", reg.lab_type.as_deref()),
        field_line("Parent", reg.parent.as_ref().map(|p| p.name().unwrap_or(p.id()))),
        field_line("Source", Some(reg.source_label())),
        field_line("Established", reg.establishment_year.as_deref()),
        field_line("Registration No.", reg.registration_number.as_deref()),
        field_line("License", reg.license.as_deref()),
        field_line("Registered", Some(&format_date(reg.created_at.as_ref()))),
    ];
    if let Some(description) = reg.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(field_line("Description", Some(description)));
    }

    lines.push(Line::from(""));
    lines.push(section("Location"));
    lines.push(field_line("Area", reg.area_name.as_deref()));
    lines.push(field_line("Address", reg.full_address.as_deref()));
    lines.push(field_line("City", reg.city.as_deref()));
    lines.push(field_line("State", reg.state.as_deref()));
    lines.push(field_line("Pincode", reg.pincode.as_deref()));

    lines.push(Line::from(""));
    lines.push(section("Contact"));
    lines.push(field_line("Phone", reg.phone.as_deref()));
    lines.push(field_line("Email", reg.email.as_deref()));
    lines.push(field_line("WhatsApp", reg.whatsapp.as_deref()));
    lines.push(field_line("Owner", reg.owner_name.as_deref()));
    lines.push(field_line("Owner Phone", reg.owner_phone.as_deref()));
    lines.push(field_line("Owner Email", reg.owner_email.as_deref()));

    lines.push(Line::from(""));
    lines.push(section("Services"));
    lines.push(field_line("Home Collection", Some(yes_no(reg.home_collection))));
    lines.push(field_line("Open 24x7", Some(yes_no(reg.open_24x7))));
    lines.push(field_line("Emergency", Some(yes_no(reg.emergency))));
    lines.push(field_line("Ambulance", Some(yes_no(reg.ambulance_service))));
    let hours = match (&reg.open_time, &reg.close_time) {
        (Some(open), Some(close)) => Some(format!("{} - {}", open, close)),
        _ => None,
    };
    lines.push(field_line("Hours", hours.as_deref()));
    lines.push(field_line("Weekly Off", reg.weekly_off.as_deref()));
    lines.push(field_line("Staff", reg.staff_count.as_deref()));

    lines.push(Line::from(""));
    lines.push(section("Payments"));
    lines.push(field_line("UPI", reg.upi_id.as_deref()));
    lines.push(field_line("Bank", reg.bank_name.as_deref()));
    lines.push(field_line("Account", reg.account_number.as_deref()));
    lines.push(field_line("IFSC", reg.ifsc_code.as_deref()));

    if !reg.selected_tests.is_empty() || !reg.pricing.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Tests"));
        for test in &reg.selected_tests {
            lines.push(Line::from(format!("   • {}", test.label())));
        }
        for item in &reg.pricing {
            let price = item.price.as_deref().unwrap_or("-");
            lines.push(Line::from(vec![
                Span::styled(format!("   {:<28}", item.name), Style::default().fg(theme::TEXT)),
                Span::styled(format!("₹ {}", price), Style::default().fg(theme::ACCENT)),
            ]));
        }
    }

    if !reg.certifications.is_empty() {
        lines.push(Line::from(""));
        lines.push(section("Certifications"));
        for cert in &reg.certifications {
            lines.push(field_line(&cert.name, cert.file.as_deref()));
        }
    }

    lines.push(Line::from(""));
    lines.push(section("Files"));
    lines.push(field_line("Logo", reg.lab_logo.as_deref()));
    lines.push(field_line("Banner", reg.lab_banner.as_deref()));
    lines.push(field_line("Documents", reg.pathology_docs.as_deref()));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_registration_renders_dashes() {
        let reg: Registration = serde_json::from_value(serde_json::json!({
            "_id": "r1",
            "labName": "Metro Labs",
            "parent": "p1",
            "test": [{"name": "CBC", "price": 250}]
        }))
        .unwrap();
        let text: Vec<String> = detail_lines(&reg).iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Parent") && l.ends_with("p1")));
        assert!(text.iter().any(|l| l.contains("City") && l.ends_with("-")));
        assert!(text.iter().any(|l| l.contains("CBC") && l.contains("250")));
    }
}
