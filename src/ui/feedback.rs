//! Feedback loop rendering: verification task, tests and performance.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::feedback::{average, count_status, TestStatus, PERFORMANCE, TEST_RESULTS};
use crate::data::format::{format_date_safely, format_time_safely};
use crate::pages::feedback::{FeedbackPage, Tab};
use crate::ui::panel;

pub fn render(frame: &mut Frame, app: &App, page: &FeedbackPage, area: Rect) {
    let monitor_height = if page.show_monitor() { 3 } else { 0 };
    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Length(monitor_height),
        Constraint::Length(1),
        Constraint::Min(5),
    ])
    .split(area);

    render_task(frame, app, page, chunks[0]);
    if page.show_monitor() {
        render_monitor(frame, app, chunks[1]);
    }

    let tabs = [Tab::Tests, Tab::Performance, Tab::Details];
    let selected = tabs.iter().position(|t| *t == page.tab()).unwrap_or(0);
    frame.render_widget(
        Tabs::new(tabs.iter().map(|t| Line::from(t.label())))
            .select(selected)
            .style(app.theme.tab_inactive)
            .highlight_style(app.theme.tab_active)
            .divider("|"),
        chunks[2],
    );

    match page.tab() {
        Tab::Tests => render_tests(frame, app, page, chunks[3]),
        Tab::Performance => render_performance(frame, app, chunks[3]),
        Tab::Details => render_details(frame, app, page, chunks[3]),
    }
}

fn render_task(frame: &mut Frame, app: &App, page: &FeedbackPage, area: Rect) {
    let lines = match page.selected_task() {
        Some(task) => vec![
            Line::styled(task.title.clone(), app.theme.header),
            Line::from(task.description.clone()),
            Line::from(vec![
                Span::styled(task.priority.label(), app.theme.priority_style(task.priority)),
                Span::raw(" · "),
                Span::raw(task.category.label()),
                Span::raw(" · "),
                Span::raw(format_date_safely(&task.created_at)),
            ]),
            Line::from(""),
            Line::styled(
                "[a] Accept    [d] Decline & Refine",
                Style::default().fg(app.theme.highlight),
            ),
        ],
        None => vec![Line::styled(
            "No task selected. Choose a test result with Enter.",
            Style::default().add_modifier(Modifier::DIM),
        )],
    };

    let title = format!(" Verification (filter: {}) ", page.filter().label());
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(app, title, page.selected_task().is_some())),
        area,
    );
}

fn render_monitor(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("{} passed", count_status(&TEST_RESULTS, TestStatus::Passed)),
            app.theme.test_style(TestStatus::Passed),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} failed", count_status(&TEST_RESULTS, TestStatus::Failed)),
            app.theme.test_style(TestStatus::Failed),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} running", count_status(&TEST_RESULTS, TestStatus::Running)),
            app.theme.test_style(TestStatus::Running),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(line).block(panel(app, " Test Monitor ", true)),
        area,
    );
}

fn render_tests(frame: &mut Frame, app: &App, page: &FeedbackPage, area: Rect) {
    let header = Row::new(vec!["Test", "Status", "Duration", "Time"])
        .height(1)
        .style(app.theme.header);

    let tests = page.visible_tests();
    let rows: Vec<Row> = tests
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.name),
                Cell::from(t.status.label()).style(app.theme.test_style(t.status)),
                Cell::from(format!("{:.1}s", t.duration)),
                Cell::from(format_time_safely(t.timestamp)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(8),
        Constraint::Length(9),
        Constraint::Length(9),
    ];

    let title = format!(" Test Results ({}/{}) ", tests.len(), TEST_RESULTS.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, title, false))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !tests.is_empty() {
        state.select(Some(page.cursor()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_performance(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["Time", "CPU", "Memory", "Response", "Throughput"])
        .height(1)
        .style(app.theme.header);

    let mut rows: Vec<Row> = PERFORMANCE
        .iter()
        .map(|s| {
            Row::new(vec![
                format_time_safely(s.timestamp),
                format!("{:.0}%", s.cpu),
                format!("{:.0}%", s.memory),
                format!("{:.0}ms", s.response_time),
                format!("{:.0}/s", s.throughput),
            ])
        })
        .collect();

    if let Some(avg) = average(&PERFORMANCE) {
        rows.push(
            Row::new(vec![
                "average".to_string(),
                format!("{:.1}%", avg.cpu),
                format!("{:.1}%", avg.memory),
                format!("{:.1}ms", avg.response_time),
                format!("{:.1}/s", avg.throughput),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
        );
    }

    let widths = [
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    frame.render_widget(
        Table::new(rows, widths)
            .header(header)
            .block(panel(app, " Performance ", false)),
        area,
    );
}

fn render_details(frame: &mut Frame, app: &App, page: &FeedbackPage, area: Rect) {
    let lines = match page.visible_tests().get(page.cursor()) {
        Some(test) => vec![
            Line::styled(test.name, app.theme.header),
            Line::from(vec![
                Span::raw("Status: "),
                Span::styled(test.status.label(), app.theme.test_style(test.status)),
            ]),
            Line::from(format!("Duration: {:.1}s", test.duration)),
            Line::from(format!("Ran at: {}", format_date_safely(test.timestamp))),
            Line::from(format!("Error: {}", test.error.unwrap_or("-"))),
        ],
        None => vec![Line::styled(
            "No test matches the filter",
            Style::default().add_modifier(Modifier::DIM),
        )],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(app, " Details ", false)),
        area,
    );
}
