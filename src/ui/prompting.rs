//! Prompt editor rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::pages::prompting::{GoalField, Persona, PromptingPage};
use crate::ui::{field_lines, panel};

pub fn render(frame: &mut Frame, app: &App, page: &PromptingPage, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(6),
        Constraint::Length(4),
    ])
    .split(area);

    render_persona(frame, app, page, chunks[0]);
    render_goal(frame, app, page, GoalField::Primary, " Primary Goal ", chunks[1]);
    render_goal(frame, app, page, GoalField::Sub, " Sub-goals ", chunks[2]);
    render_voice(frame, app, page, chunks[3]);
}

fn render_persona(frame: &mut Frame, app: &App, page: &PromptingPage, area: Rect) {
    let mut spans = Vec::new();
    for persona in Persona::ALL {
        let style = if persona == page.persona() {
            app.theme.tab_active.add_modifier(Modifier::REVERSED)
        } else {
            app.theme.tab_inactive
        };
        spans.push(Span::styled(format!(" {} ", persona.label()), style));
        spans.push(Span::raw(" "));
    }
    if let Some(task) = page.task() {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            format!("task: {}", task.title),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel(app, " Persona ", false)),
        area,
    );
}

fn render_goal(
    frame: &mut Frame,
    app: &App,
    page: &PromptingPage,
    field: GoalField,
    title: &'static str,
    area: Rect,
) {
    let focused = page.focus() == field;
    let mut title = Line::from(title);
    if page.recording_field() == Some(field) && page.is_recording() {
        title.push_span(Span::styled(
            "● REC ",
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(field_lines(page.field(field), focused, app))
        .wrap(Wrap { trim: false })
        .block(panel(app, title, focused));
    frame.render_widget(paragraph, area);
}

fn render_voice(frame: &mut Frame, app: &App, page: &PromptingPage, area: Rect) {
    let status = if !page.speech_supported() {
        Line::styled(
            "Voice input is not supported by this backend",
            Style::default().add_modifier(Modifier::DIM),
        )
    } else if page.is_recording() {
        Line::styled(
            "Listening... (^R to stop)",
            Style::default().fg(app.theme.critical),
        )
    } else {
        Line::from("^R to start voice input")
    };

    let transcript = if page.transcript().is_empty() {
        Line::styled("No transcript", Style::default().add_modifier(Modifier::DIM))
    } else {
        Line::from(vec![
            Span::styled("Transcript: ", app.theme.header),
            Span::raw(page.transcript().to_string()),
            Span::styled("  (^T to insert)", Style::default().add_modifier(Modifier::DIM)),
        ])
    };

    let title = format!(" Voice ({}) ", page.speech_description());
    frame.render_widget(
        Paragraph::new(vec![status, transcript])
            .wrap(Wrap { trim: true })
            .block(panel(app, title, page.is_recording())),
        area,
    );
}
