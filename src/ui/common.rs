//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{ActivePage, App, View};
use crate::data::ModuleStatus;
use crate::events::is_text_input;

/// Render the header bar with the current route and simulator overview.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" DAS TOOL ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(app.route.to_string(), Style::default().fg(app.theme.highlight)),
    ];

    if let ActivePage::Architecture(ref page) = app.page {
        let counts = page.status_counts();
        let worst = counts.worst().unwrap_or(ModuleStatus::Normal);
        let state = if page.is_simulating() { "running" } else { "paused" };
        spans.extend([
            Span::raw(" │ "),
            Span::styled("●", app.theme.status_style(worst)),
            Span::raw(format!(" sim {} │ ", state)),
            Span::styled(
                counts.normal.to_string(),
                Style::default().fg(app.theme.healthy),
            ),
            Span::raw(" ok "),
            if counts.warning > 0 {
                Span::styled(
                    counts.warning.to_string(),
                    Style::default().fg(app.theme.warning),
                )
            } else {
                Span::styled("0", Style::default().add_modifier(Modifier::DIM))
            },
            Span::raw(" warn "),
            if counts.error > 0 {
                Span::styled(
                    counts.error.to_string(),
                    Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled("0", Style::default().add_modifier(Modifier::DIM))
            },
            Span::raw(" err"),
        ]);
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled(
        app.speech_description().to_string(),
        Style::default().add_modifier(Modifier::DIM),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn tab_title(view: View) -> String {
    format!("{}:{}", view.shortcut(), view.label())
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(tab_title(*v))).collect();
    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// The tab under a column of the tab row.
///
/// Mirrors the tab layout: one space of padding either side of each title,
/// with a one-column divider between tabs.
pub fn tab_at(column: u16) -> Option<View> {
    let mut x = 0u16;
    for view in View::ALL {
        let width = tab_title(view).chars().count() as u16 + 2;
        if column < x + width {
            return Some(view);
        }
        x += width + 1;
        if column < x {
            return None;
        }
    }
    None
}

/// Context-sensitive key hints for the mounted page.
fn controls(app: &App) -> &'static str {
    match &app.page {
        ActivePage::Home => "Enter:get started v:architecture 0-6:page Tab:next ?:help q:quit",
        ActivePage::Planning(p) if p.form().is_some() => {
            "Tab:field ^P:priority ^T:type Enter/^S:add Esc:cancel"
        }
        ActivePage::Planning(p) if p.grabbed().is_some() => {
            "←→↑↓:target Space:drop Esc:cancel"
        }
        ActivePage::Planning(_) => {
            "←→↑↓:move Enter:open Space:grab H/L:shift a:add x:export ?:help"
        }
        ActivePage::Prompting(_) => "Tab:field ^R:record ^T:insert ^P:persona Esc:back",
        ActivePage::Architecture(_) => {
            "Space:sim [/]:speed l/L:load c/C:complexity +/-:zoom Enter:select x:export"
        }
        ActivePage::TimeTravel(_) => "←→:step Space:play m:edit b:branch Home/End ?:help",
        ActivePage::Feedback(_) => "↑↓:move Enter:select f:filter m:monitor t:tab a:accept d:decline",
        ActivePage::CodeEditor(p) if !p.confirmed() => "Tab:field Enter:confirm Esc:cancel",
        ActivePage::CodeEditor(_) => "^R:run ^L:language ^T:theme Esc:back",
    }
}

/// Render the status bar at the bottom.
///
/// Shows the history depth and available controls, or a temporary status
/// message when one is active.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let mode = if is_text_input(app) { "INSERT" } else { "NAV" };
    let status = format!(
        " {} | {} | back:{} | {}",
        app.current_view().label(),
        mode,
        app.history.len(),
        controls(app)
    );

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  0-6         Jump to page"),
        Line::from("  Tab/S-Tab   Next/previous page"),
        Line::from("  Ctrl+←/→    Switch page from text fields"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Architecture"),
        Line::from("  Space       Start/stop simulation"),
        Line::from("  [ ]         Slower/faster"),
        Line::from("  l/L c/C     Load and complexity -/+5"),
        Line::from(""),
        section(" Planning"),
        Line::from("  Enter       Open task"),
        Line::from("  Space       Grab/drop task"),
        Line::from("  a           Add task"),
        Line::from(""),
        section(" General"),
        Line::from("  x           Export page state to JSON"),
        Line::from("  F1 ?        Toggle help"),
        Line::from("  q Ctrl+Q    Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 48u16.min(area.width.saturating_sub(4));
    let help_height = 28u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_at_matches_layout() {
        // " 0:Home " occupies columns 0..8, then the divider.
        assert_eq!(tab_at(0), Some(View::Home));
        assert_eq!(tab_at(7), Some(View::Home));
        assert_eq!(tab_at(8), None);
        assert_eq!(tab_at(9), Some(View::Planning));
        assert_eq!(tab_at(500), None);
    }
}
