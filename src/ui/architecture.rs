//! Architecture dashboard rendering.
//!
//! Draws the module ring on a canvas, a per-module health table, the
//! simulation controls and the fixed model performance panel.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Cell, Gauge, Paragraph, Row, Table, TableState,
    },
    Frame,
};

use crate::app::App;
use crate::data::architecture::{circular_layout, LAYOUT_CENTER, LAYOUT_RADIUS, MODULES};
use crate::data::format::{format_count, format_duration};
use crate::pages::architecture::{ArchitecturePage, MODEL_PERFORMANCE};
use crate::ui::panel;

/// Canvas extent in diagram units; wide enough for a ring at maximum zoom.
const CANVAS_MARGIN: f64 = LAYOUT_RADIUS * 2.0 + 40.0;

pub fn render(frame: &mut Frame, app: &App, page: &ArchitecturePage, area: Rect) {
    let chunks =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    render_graph(frame, app, page, chunks[0]);

    let right = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(6),
        Constraint::Length(6),
    ])
    .split(chunks[1]);

    render_controls(frame, app, page, right[0]);
    render_table(frame, app, page, right[1]);
    render_side_panel(frame, app, page, right[2]);
}

fn render_graph(frame: &mut Frame, app: &App, page: &ArchitecturePage, area: Rect) {
    let positions = circular_layout(MODULES.len(), page.zoom());
    let graph = page.graph();
    let selected = page.selected();
    let (cx, cy) = LAYOUT_CENTER;

    let title = format!(" Modules (zoom {:.2}x) ", page.zoom());
    let canvas = Canvas::default()
        .block(panel(app, title, false))
        .marker(Marker::Braille)
        .x_bounds([cx - CANVAS_MARGIN, cx + CANVAS_MARGIN])
        .y_bounds([cy - CANVAS_MARGIN, cy + CANVAS_MARGIN])
        .paint(|ctx| {
            // Screen y grows downward in the layout; the canvas grows upward.
            let flip = |y: f64| 2.0 * cy - y;

            for &(src, dst) in &graph.edges {
                let (x1, y1) = positions[src];
                let (x2, y2) = positions[dst];
                let color = match selected {
                    Some(i) if graph.touches((src, dst), i) => app.theme.highlight,
                    _ => app.theme.border,
                };
                ctx.draw(&CanvasLine {
                    x1,
                    y1: flip(y1),
                    x2,
                    y2: flip(y2),
                    color,
                });
            }
            ctx.layer();

            for (i, module) in MODULES.iter().enumerate() {
                let (x, y) = positions[i];
                let mut style = page
                    .metrics()
                    .get(module.id)
                    .map(|m| app.theme.status_style(m.status))
                    .unwrap_or_default();
                if selected == Some(i) {
                    style = style.add_modifier(Modifier::REVERSED);
                } else if page.cursor() == i {
                    style = style.add_modifier(Modifier::UNDERLINED);
                }
                ctx.print(x, flip(y), Span::styled(module.name, style));
            }
        });

    frame.render_widget(canvas, area);
}

fn render_controls(frame: &mut Frame, app: &App, page: &ArchitecturePage, area: Rect) {
    let params = page.params();
    let state = if page.is_simulating() {
        Span::styled("RUNNING", Style::default().fg(app.theme.healthy).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("STOPPED", Style::default().add_modifier(Modifier::DIM))
    };

    let block = panel(app, " Simulation ", page.is_simulating());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            state,
            Span::raw(format!(
                "  every {}  ticks {}",
                format_duration(page.speed()),
                format_count(page.ticks())
            )),
        ])),
        rows[0],
    );
    frame.render_widget(slider("User load", params.user_load, app), rows[1]);
    frame.render_widget(
        slider("Data complexity", params.data_complexity, app),
        rows[2],
    );
}

fn slider<'a>(label: &'a str, value: u8, app: &App) -> Gauge<'a> {
    Gauge::default()
        .gauge_style(Style::default().fg(app.theme.highlight).bg(Color::Reset))
        .percent(u16::from(value.min(100)))
        .label(format!("{} {}%", label, value))
}

fn render_table(frame: &mut Frame, app: &App, page: &ArchitecturePage, area: Rect) {
    let header = Row::new(vec!["Module", "Latency", "Errors", "Req/s", "Uptime", "Status"])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = MODULES
        .iter()
        .map(|module| match page.metrics().get(module.id) {
            Some(m) => Row::new(vec![
                Cell::from(module.name),
                Cell::from(format!("{}ms", m.latency)),
                Cell::from(format!("{:.3}%", m.error_rate)),
                Cell::from(m.throughput.to_string()),
                Cell::from(format!("{:.2}%", m.reliability)),
                Cell::from(m.status.symbol()).style(app.theme.status_style(m.status)),
            ]),
            None => Row::new(vec![
                Cell::from(module.name),
                Cell::from("-"),
                Cell::from("-"),
                Cell::from("-"),
                Cell::from("-"),
                Cell::from("-"),
            ]),
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(6),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(app, " Module Health ", false))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(page.cursor()));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_side_panel(frame: &mut Frame, app: &App, page: &ArchitecturePage, area: Rect) {
    let lines = match page.selected().and_then(|i| MODULES.get(i)) {
        Some(module) => {
            let join = |names: &[&str]| {
                if names.is_empty() {
                    "-".to_string()
                } else {
                    names.join(", ")
                }
            };
            vec![
                Line::styled(module.name, app.theme.header),
                Line::from(format!("Inputs:  {}", join(module.inputs))),
                Line::from(format!("Outputs: {}", join(module.outputs))),
                Line::from(format!(
                    "External: {}",
                    page.graph().external.join(", ")
                )),
            ]
        }
        None => {
            let perf = MODEL_PERFORMANCE;
            vec![
                Line::from(format!("Response time     {}ms", perf.response_ms)),
                Line::from(format!("CPU usage         {}%", perf.cpu_percent)),
                Line::from(format!("Memory            {:.1}GB", perf.memory_gb)),
                Line::from(format!(
                    "Explainability    {}%",
                    perf.explainability_percent
                )),
            ]
        }
    };

    let title = if page.selected().is_some() {
        " Module "
    } else {
        " Model Performance "
    };
    frame.render_widget(Paragraph::new(lines).block(panel(app, title, false)), area);
}
