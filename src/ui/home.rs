//! Welcome page with the four feature cards.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::panel;

pub const FEATURES: [(&str, &str); 4] = [
    (
        "Prompt Editor",
        "Define system goals and constraints with multi-modal input methods",
    ),
    (
        "Architecture Dashboard",
        "Visualize and analyze system structure and performance",
    ),
    (
        "Time Travel Debugger",
        "Debug and analyze code execution history with detailed audit trails",
    ),
    (
        "Feedback Loop",
        "Train and improve model behavior based on real application scenarios",
    ),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(5),
        Constraint::Min(8),
    ])
    .split(area);

    let intro = vec![
        Line::styled(
            "Welcome to Das Tool",
            app.theme.header.add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from("Your comprehensive development environment for modern software development"),
        Line::from(""),
        Line::styled(
            "[Enter] Get Started    [v] View Architecture",
            Style::default().fg(app.theme.highlight),
        ),
    ];
    frame.render_widget(
        Paragraph::new(intro).alignment(Alignment::Center),
        chunks[1],
    );

    let rows = Layout::vertical([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(chunks[2]);
    for (row, pair) in FEATURES.chunks(2).enumerate() {
        let cols =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).split(rows[row]);
        for (col, (title, description)) in pair.iter().enumerate() {
            let card = Paragraph::new(*description)
                .wrap(Wrap { trim: true })
                .block(panel(app, format!(" {} ", title), false));
            frame.render_widget(card, cols[col]);
        }
    }
}
