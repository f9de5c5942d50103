use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode, Overlay, View};
use crate::kinds::{kind_spec, KindId};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let hints = match (&app.overlay, &app.input_mode) {
        (Overlay::Form(_), _) => vec![
            hint("Tab/↓", "next field"),
            hint("S-Tab/↑", "prev field"),
            hint("Space", "toggle"),
            hint("Enter", "save"),
            hint("Esc", "cancel"),
        ],
        (Overlay::Filters { .. }, _) => vec![
            hint("j/k", "filter"),
            hint("h/l", "change"),
            hint("Esc", "done"),
        ],
        (Overlay::Confirm(_), _) => vec![hint("y/Enter", "confirm"), hint("n/Esc", "cancel")],
        (_, InputMode::Command) => vec![hint("Esc", "cancel"), hint("Enter", "execute")],
        (_, InputMode::Search) => vec![hint("Esc/Enter", "done")],
        (_, InputMode::PendingG) => vec![hint("g", "top")],
        (_, InputMode::Normal) => match app.view {
            View::Collection(kind) => build_collection_hints(kind),
            View::RegistrationDetail => vec![hint("j/k", "scroll"), hint("Esc", "back")],
            View::Profile => vec![hint("e", "edit"), hint(":logout", "sign out")],
            View::Dashboard => vec![hint("1-5", "views"), hint(":", "cmd")],
        },
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", Style::default()));
        }
        spans.push(Span::styled(key.as_str(), Style::default().fg(theme::ACCENT)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn hint(key: &str, desc: &str) -> (String, String) {
    (key.to_string(), desc.to_string())
}

fn build_collection_hints(kind: KindId) -> Vec<(String, String)> {
    let mut hints = vec![
        hint("j/k", "nav"),
        hint("/", "search"),
        hint("f", "filters"),
        hint("[ ]", "page"),
    ];
    if kind == KindId::Registration {
        hints.push(hint("t", "individual/parent"));
    }
    hints.extend(
        kind_spec(kind)
            .operations
            .iter()
            .map(|op| (op.key.to_string(), op.label.to_string())),
    );
    hints.push(hint("?", "help"));
    hints.push(hint("q", "quit"));
    hints
}
