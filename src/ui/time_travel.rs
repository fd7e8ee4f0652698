//! Time-travel debugger rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::timeline::TIMELINE;
use crate::pages::TimeTravelPage;
use crate::ui::panel;

pub fn render(frame: &mut Frame, app: &App, page: &TimeTravelPage, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(6)]).split(area);
    render_scrubber(frame, app, page, rows[0]);

    let cols =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).split(rows[1]);
    render_events(frame, app, page, cols[0]);

    let right = if page.edit_mode() {
        Layout::vertical([Constraint::Min(4), Constraint::Length(6)]).split(cols[1])
    } else {
        Layout::vertical([Constraint::Min(4), Constraint::Length(0)]).split(cols[1])
    };
    render_code(frame, app, page, right[0]);
    if page.edit_mode() {
        render_changes(frame, app, page, right[1]);
    }
}

fn render_scrubber(frame: &mut Frame, app: &App, page: &TimeTravelPage, area: Rect) {
    let last = TIMELINE.len() - 1;
    let ratio = page.index() as f64 / last as f64;
    let event = page.selected();
    let state = if page.is_playing() { "▶ playing" } else { "⏸ paused" };
    let branch = if page.branch_created() { " │ branch" } else { "" };

    let gauge = Gauge::default()
        .block(panel(app, format!(" {} │ {}{} ", state, event.timestamp, branch), page.is_playing()))
        .gauge_style(Style::default().fg(app.theme.highlight))
        .ratio(ratio)
        .label(format!("{}/{}", page.index() + 1, TIMELINE.len()));
    frame.render_widget(gauge, area);
}

fn render_events(frame: &mut Frame, app: &App, page: &TimeTravelPage, area: Rect) {
    let items: Vec<ListItem> = TIMELINE
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let mut spans = vec![
                Span::styled(event.status.symbol(), app.theme.event_style(event.status)),
                Span::raw(format!(" {} ", event.timestamp)),
                Span::raw(event.description),
            ];
            if event.checkpoint {
                spans.push(Span::styled(" ◆", Style::default().fg(app.theme.highlight)));
            }
            if page.is_branched(i) {
                spans.push(Span::styled(
                    " ⎇",
                    Style::default().fg(app.theme.warning),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(panel(app, " Timeline ", false))
        .highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(page.index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_code(frame: &mut Frame, app: &App, page: &TimeTravelPage, area: Rect) {
    let event = page.selected();
    let mut lines = vec![
        Line::from(vec![
            Span::styled(event.kind, app.theme.header),
            Span::raw(format!(" #{}", event.id)),
        ]),
        Line::from(""),
    ];
    lines.extend(
        event
            .code
            .lines()
            .map(|l| Line::styled(l, Style::default().fg(app.theme.healthy))),
    );

    frame.render_widget(
        Paragraph::new(lines).block(panel(app, " State ", false)),
        area,
    );
}

fn render_changes(frame: &mut Frame, app: &App, page: &TimeTravelPage, area: Rect) {
    let changes = page.selected().changes;
    let lines: Vec<Line> = if changes.is_empty() {
        vec![Line::styled(
            "No changes recorded",
            Style::default().add_modifier(Modifier::DIM),
        )]
    } else {
        changes
            .iter()
            .map(|c| {
                Line::from(vec![
                    Span::styled(c.user, app.theme.header),
                    Span::raw(format!(" {} ", c.timestamp)),
                    Span::raw(c.note),
                ])
            })
            .collect()
    };

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(app, " Audit Trail ", true)),
        area,
    );
}
