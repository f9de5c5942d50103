use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::app::{App, FeedSummary};
use crate::kinds::registrations::{PARENT, REG_TYPE};
use crate::kinds::{collection_spec, KindId};
use crate::theme;

pub fn render(app: &mut App, kind: KindId, frame: &mut Frame, area: Rect) {
    let summary = app.feeds.summary(kind);
    let layout = Layout::vertical([
        Constraint::Length(1), // Filter bar
        Constraint::Fill(1),   // Table
        Constraint::Length(1), // Pagination
    ])
    .split(area);

    render_filter_bar(app, kind, &summary, frame, layout[0]);
    render_table(app, kind, &summary, frame, layout[1]);
    render_pagination(&summary, frame, layout[2]);
}

fn render_filter_bar(app: &App, kind: KindId, summary: &FeedSummary, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];

    if kind == KindId::Registration {
        let on_parent = summary.query.filter(REG_TYPE) == PARENT;
        let (individual, parent) = summary
            .stats
            .as_ref()
            .map(|s| (s.individual_count, s.parent_count))
            .unwrap_or_default();
        spans.push(reg_tab(format!("Individual ({})", individual), !on_parent));
        spans.push(Span::raw(" "));
        spans.push(reg_tab(format!("Parent ({})", parent), on_parent));
        spans.push(Span::styled("  │ ", Style::default().fg(theme::TEXT_MUTED)));
    }

    for (spec, options) in app.visible_filters(kind) {
        let value = summary.query.filter(spec.key);
        let label = options
            .iter()
            .find(|opt| opt.value == value)
            .map(|opt| opt.label.clone())
            .unwrap_or_else(|| value.to_string());
        let style = if value.is_empty() {
            Style::default().fg(theme::TEXT_MUTED)
        } else {
            Style::default().fg(theme::ACCENT)
        };
        spans.push(Span::styled(format!("{}: ", spec.label), Style::default().fg(theme::TEXT_DIM)));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw("  "));
    }

    if !summary.query.search_raw.is_empty() {
        spans.push(Span::styled("/", Style::default().fg(theme::GREEN)));
        spans.push(Span::styled(
            summary.query.search_raw.clone(),
            Style::default().fg(theme::TEXT),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn reg_tab(label: String, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!(" {} ", label),
            Style::default()
                .fg(theme::BG_DARK)
                .bg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!(" {} ", label), Style::default().fg(theme::TEXT_DIM))
    }
}

fn render_table(app: &mut App, kind: KindId, summary: &FeedSummary, frame: &mut Frame, area: Rect) {
    let spec = collection_spec(kind);
    let rows = (spec.rows)(app);
    if rows.is_empty() {
        let label = if summary.loading || !summary.loaded {
            spec.loading_label
        } else {
            spec.empty_label
        };
        let placeholder = Paragraph::new(label).style(Style::default().fg(theme::TEXT_MUTED));
        frame.render_widget(placeholder, area);
        return;
    }

    let table = Table::new(rows, (spec.widths)())
        .header(header_row(spec.header))
        .block(Block::default().borders(Borders::NONE))
        .row_highlight_style(
            Style::default()
                .bg(theme::BG_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    let state = (spec.table_state)(app);
    frame.render_stateful_widget(table, area, state);
}

pub fn header_row(labels: &[&'static str]) -> Row<'static> {
    Row::new(
        labels
            .iter()
            .map(|label| Cell::from(*label))
            .collect::<Vec<_>>(),
    )
    .style(
        Style::default()
            .fg(theme::TEXT_DIM)
            .add_modifier(Modifier::BOLD),
    )
    .height(1)
}

fn render_pagination(summary: &FeedSummary, frame: &mut Frame, area: Rect) {
    let showing = match summary.pagination.showing() {
        Some((start, end)) => format!(
            " Showing {} to {} of {} entries",
            start, end, summary.pagination.total
        ),
        None => " No entries".to_string(),
    };
    let nav = |enabled: bool, text: &'static str| {
        let color = if enabled { theme::ACCENT } else { theme::TEXT_MUTED };
        Span::styled(text, Style::default().fg(color))
    };

    let mut spans = vec![Span::styled(showing, Style::default().fg(theme::TEXT_DIM))];
    if summary.loading {
        spans.push(Span::styled("  ◌ loading", Style::default().fg(theme::YELLOW)));
    }
    let right = vec![
        nav(summary.has_prev, "[ prev"),
        Span::styled(
            format!(
                "  Page {} of {}  ",
                summary.query.page,
                summary.pagination.last_page()
            ),
            Style::default().fg(theme::TEXT),
        ),
        nav(summary.has_next, "next ]"),
        Span::raw(" "),
    ];

    let left_width: usize = spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right.iter().map(|s| s.width()).sum();
    let gap = (area.width as usize).saturating_sub(left_width + right_width);
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right);

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}
