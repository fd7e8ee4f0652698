//! Code editor rendering: the confirmation gate, then editor and output.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::pages::code_editor::{
    CodeEditorPage, EditorTheme, GateField, FIRST_PHRASE, SECOND_PHRASE,
};
use crate::ui::{field_lines, panel};

pub fn render(frame: &mut Frame, app: &App, page: &CodeEditorPage, area: Rect) {
    if page.confirmed() {
        render_editor(frame, app, page, area);
    } else {
        render_gate(frame, app, page, area);
    }
}

fn render_gate(frame: &mut Frame, app: &App, page: &CodeEditorPage, area: Rect) {
    let width = 60u16.min(area.width.saturating_sub(4));
    let height = 12u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let gate_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, gate_area);
    let block = panel(app, " Confirm Code Access ", true);
    let inner = block.inner(gate_area);
    frame.render_widget(block, gate_area);

    let mut lines = vec![
        Line::from("Direct code editing bypasses the planning workflow."),
        Line::from(""),
    ];
    for (field, phrase) in [(GateField::First, FIRST_PHRASE), (GateField::Second, SECOND_PHRASE)] {
        let focused = page.gate_focus() == field;
        lines.push(Line::styled(
            format!("Type \"{}\":", phrase),
            if focused {
                app.theme.header
            } else {
                Style::default()
            },
        ));
        let mut input = vec![Span::raw("> ")];
        input.extend(
            field_lines(page.gate_field(field), focused, app)
                .into_iter()
                .flat_map(|l| l.spans),
        );
        lines.push(Line::from(input));
    }
    lines.push(Line::from(""));
    match page.error() {
        Some(error) => lines.push(Line::styled(
            error,
            Style::default().fg(app.theme.critical),
        )),
        None => lines.push(Line::styled(
            "Enter confirm  Tab switch  Esc cancel",
            Style::default().add_modifier(Modifier::DIM),
        )),
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Editor palette for each editor theme choice.
fn editor_style(theme: EditorTheme) -> Style {
    match theme {
        EditorTheme::Dark => Style::default().fg(Color::White).bg(Color::Black),
        EditorTheme::Light => Style::default().fg(Color::Black).bg(Color::White),
        EditorTheme::Dracula => Style::default()
            .fg(Color::Rgb(248, 248, 242))
            .bg(Color::Rgb(40, 42, 54)),
    }
}

fn render_editor(frame: &mut Frame, app: &App, page: &CodeEditorPage, area: Rect) {
    let chunks =
        Layout::vertical([Constraint::Length(1), Constraint::Min(6), Constraint::Length(8)])
            .split(area);

    let run = if page.is_running() {
        Span::styled("running…", Style::default().fg(app.theme.warning))
    } else {
        Span::styled("^R run", Style::default().fg(app.theme.highlight))
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(" language: "),
            Span::styled(page.language().id(), app.theme.header),
            Span::raw("  theme: "),
            Span::styled(page.theme().id(), app.theme.header),
            Span::raw("  "),
            run,
        ])),
        chunks[0],
    );

    let code = Paragraph::new(field_lines(page.code(), true, app))
        .style(editor_style(page.theme()))
        .block(panel(app, " Editor ", true));
    frame.render_widget(code, chunks[1]);

    let output = if page.output().is_empty() {
        Paragraph::new("Run the code to see output")
            .style(Style::default().add_modifier(Modifier::DIM))
    } else {
        Paragraph::new(page.output())
    };
    frame.render_widget(output.block(panel(app, " Output ", false)), chunks[2]);
}
