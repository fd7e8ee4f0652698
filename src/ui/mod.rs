//! Terminal UI rendering using ratatui.
//!
//! Each page is drawn by its own submodule with a `render` function that
//! reads the mounted page's state. Views never mutate state.
//!
//! ## Submodules
//!
//! - [`home`]: Welcome text and feature cards
//! - [`planning`]: Kanban board columns and the add-task form
//! - [`prompting`]: Goal fields, persona selector and voice input status
//! - [`architecture`]: Module ring, per-module health table and controls
//! - [`time_travel`]: Timeline list, event code and edit-mode notes
//! - [`feedback`]: Test results, performance samples and verification task
//! - [`code_editor`]: Confirmation gate and the editor itself
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Page Content (<page>::render)        │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    common::render_help drawn on top
//! ```

pub mod architecture;
pub mod code_editor;
pub mod common;
pub mod feedback;
pub mod home;
pub mod planning;
pub mod prompting;
pub mod theme;
pub mod time_travel;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{ActivePage, App};
use crate::pages::TextField;

pub use theme::Theme;

/// Minimum terminal size for usable display
pub const MIN_WIDTH: u16 = 80;
pub const MIN_HEIGHT: u16 = 20;

/// Draw one frame of the whole dashboard.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!(
            "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
            area.width, area.height, MIN_WIDTH, MIN_HEIGHT
        );
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow));
        let top = (area.height / 2).saturating_sub(2);
        let centered = Rect::new(0, top, area.width, 5u16.min(area.height - top));
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header bar
        Constraint::Length(1), // Tabs
        Constraint::Min(8),    // Page content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    common::render_header(frame, app, chunks[0]);
    common::render_tabs(frame, app, chunks[1]);

    match &app.page {
        ActivePage::Home => home::render(frame, app, chunks[2]),
        ActivePage::Planning(page) => planning::render(frame, app, page, chunks[2]),
        ActivePage::Prompting(page) => prompting::render(frame, app, page, chunks[2]),
        ActivePage::Architecture(page) => architecture::render(frame, app, page, chunks[2]),
        ActivePage::TimeTravel(page) => time_travel::render(frame, app, page, chunks[2]),
        ActivePage::Feedback(page) => feedback::render(frame, app, page, chunks[2]),
        ActivePage::CodeEditor(page) => code_editor::render(frame, app, page, chunks[2]),
    }

    common::render_status_bar(frame, app, chunks[3]);

    if app.show_help {
        common::render_help(frame, app, area);
    }
}

/// A bordered block in the theme's style.
pub(crate) fn panel<'a>(app: &App, title: impl Into<Line<'a>>, focused: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.panel_border(focused))
}

/// Lines of a text field, with a block cursor drawn when focused.
pub(crate) fn field_lines(field: &TextField, focused: bool, app: &App) -> Vec<Line<'static>> {
    let text = field.text();
    if !focused {
        return text.split('\n').map(|l| Line::from(l.to_string())).collect();
    }

    let cursor = field.cursor();
    let mut lines = Vec::new();
    let mut spans = Vec::new();
    let mut current = String::new();
    let cursor_style = Style::default().bg(app.theme.highlight).fg(Color::Black);

    for (i, c) in text.chars().enumerate() {
        if i == cursor {
            spans.push(Span::raw(std::mem::take(&mut current)));
            let shown = if c == '\n' { ' ' } else { c };
            spans.push(Span::styled(shown.to_string(), cursor_style));
            if c == '\n' {
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            continue;
        }
        if c == '\n' {
            spans.push(Span::raw(std::mem::take(&mut current)));
            lines.push(Line::from(std::mem::take(&mut spans)));
        } else {
            current.push(c);
        }
    }
    spans.push(Span::raw(current));
    if cursor >= text.chars().count() {
        spans.push(Span::styled(" ", cursor_style));
    }
    lines.push(Line::from(spans));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    use crate::app::View;
    use crate::capability::Unsupported;
    use crate::config::{Settings, ThemeChoice};

    fn app() -> App {
        let mut settings = Settings::default();
        settings.ui.theme = ThemeChoice::Dark;
        settings.simulation.seed = Some(1);
        App::new(settings, Box::new(Unsupported))
    }

    fn screen(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_every_page_renders() {
        let mut app = app();
        for view in View::ALL {
            app.set_view(view);
            let text = screen(&app, 120, 40);
            assert!(text.contains("DAS TOOL"), "header missing on {:?}", view);
        }
    }

    #[test]
    fn test_home_shows_feature_cards() {
        let text = screen(&app(), 120, 40);
        assert!(text.contains("Prompt Editor"));
        assert!(text.contains("Feedback Loop"));
    }

    #[test]
    fn test_small_terminal_message() {
        let text = screen(&app(), 40, 10);
        assert!(text.contains("Terminal too small"));
    }

    #[test]
    fn test_field_lines_cursor_at_end() {
        let app = app();
        let field = TextField::multiline().with_text("ab\nc");
        let lines = field_lines(&field, true, &app);
        assert_eq!(lines.len(), 2);
        let unfocused = field_lines(&field, false, &app);
        assert_eq!(unfocused.len(), 2);
    }
}
