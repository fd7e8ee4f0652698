//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::config::ThemeChoice;
use crate::data::feedback::TestStatus;
use crate::data::timeline::EventStatus;
use crate::data::{ModuleStatus, Priority};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level status.
    pub warning: Color,
    /// Color for error-level status.
    pub critical: Color,
    /// Color for normal status.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Resolve a configured theme choice.
    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// Get style for a module status
    pub fn status_style(&self, status: ModuleStatus) -> Style {
        match status {
            ModuleStatus::Normal => Style::default().fg(self.healthy),
            ModuleStatus::Warning => Style::default().fg(self.warning),
            ModuleStatus::Error => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn priority_style(&self, priority: Priority) -> Style {
        match priority {
            Priority::Low => Style::default().fg(self.healthy),
            Priority::Medium => Style::default().fg(self.warning),
            Priority::High => Style::default().fg(self.critical),
        }
    }

    pub fn event_style(&self, status: EventStatus) -> Style {
        match status {
            EventStatus::Success => Style::default().fg(self.healthy),
            EventStatus::Warning => Style::default().fg(self.warning),
            EventStatus::Error => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn test_style(&self, status: TestStatus) -> Style {
        match status {
            TestStatus::Passed => Style::default().fg(self.healthy),
            TestStatus::Running => Style::default().fg(self.highlight),
            TestStatus::Failed => Style::default().fg(self.critical),
        }
    }

    /// Block border style, highlighted when the panel has focus.
    pub fn panel_border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.highlight)
        } else {
            Style::default().fg(self.border)
        }
    }
}
