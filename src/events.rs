use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{ActivePage, App, View};
use crate::data::Route;
use crate::pages::architecture::Action as ArchAction;
use crate::pages::code_editor::Action as EditorAction;
use crate::pages::feedback::Action as FeedbackAction;
use crate::pages::planning::{Action as PlanningAction, FormField};
use crate::pages::prompting::Action as PromptAction;
use crate::pages::time_travel::Action as TimeAction;
use crate::pages::{
    ArchitecturePage, CodeEditorPage, FeedbackPage, Page, PlanningPage, PromptingPage,
    TimeTravelPage,
};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Whether the mounted page is capturing typed text.
pub fn is_text_input(app: &App) -> bool {
    match &app.page {
        ActivePage::Prompting(_) | ActivePage::CodeEditor(_) => true,
        ActivePage::Planning(p) => p.form().is_some(),
        _ => false,
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Keys that work everywhere, including text fields
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.quit();
            return;
        }
        KeyCode::F(1) => {
            app.toggle_help();
            return;
        }
        KeyCode::Right if ctrl => {
            app.next_view();
            return;
        }
        KeyCode::Left if ctrl => {
            app.prev_view();
            return;
        }
        _ => {}
    }

    if !is_text_input(app) {
        match key.code {
            KeyCode::Char('q') => return app.quit(),
            KeyCode::Char('?') => return app.toggle_help(),
            KeyCode::Tab => return app.next_view(),
            KeyCode::BackTab => return app.prev_view(),
            KeyCode::Char('x') => return export(app),
            KeyCode::Char(c @ '0'..='6') => {
                if let Some(view) = View::ALL.iter().find(|v| v.shortcut() == c) {
                    app.set_view(*view);
                }
                return;
            }
            _ => {}
        }
    }

    let route = match &mut app.page {
        ActivePage::Home => match key.code {
            KeyCode::Enter => Some(Route::new(View::Prompting)),
            KeyCode::Char('v') => Some(Route::new(View::Architecture)),
            _ => None,
        },
        ActivePage::Planning(page) => planning_key(page, key),
        ActivePage::Prompting(page) => prompting_key(page, key),
        ActivePage::Architecture(page) => architecture_key(page, key),
        ActivePage::TimeTravel(page) => time_travel_key(page, key),
        ActivePage::Feedback(page) => feedback_key(page, key),
        ActivePage::CodeEditor(page) => code_editor_key(page, key),
    };

    match route {
        Some(route) => app.navigate(route),
        None if key.code == KeyCode::Esc && !consumes_escape(app) => app.go_back(),
        None => {}
    }
}

/// Pages that use Esc themselves rather than for navigating back.
fn consumes_escape(app: &App) -> bool {
    match &app.page {
        ActivePage::Planning(p) => p.form().is_some() || p.grabbed().is_some(),
        ActivePage::CodeEditor(p) => !p.confirmed(),
        _ => false,
    }
}

fn export(app: &mut App) {
    let export_path = std::path::PathBuf::from("das-tool-export.json");
    match app.export_state(&export_path) {
        Ok(()) => {
            app.set_status_message(format!("Exported to {}", export_path.display()));
        }
        Err(e) => {
            app.set_status_message(format!("Export failed: {}", e));
        }
    }
}

fn planning_key(page: &mut PlanningPage, key: KeyEvent) -> Option<Route> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if let Some(form) = page.form_mut() {
        let focus = form.focus;
        let action = match key.code {
            KeyCode::Esc => PlanningAction::CloseForm,
            KeyCode::Tab | KeyCode::BackTab => PlanningAction::FormNextField,
            KeyCode::Char('p') if ctrl => PlanningAction::CyclePriority,
            KeyCode::Char('t') if ctrl => PlanningAction::CycleCategory,
            KeyCode::Char('s') if ctrl => PlanningAction::SubmitForm,
            KeyCode::Enter if focus == FormField::Title => PlanningAction::SubmitForm,
            _ => {
                form.focused_field_mut().handle_key(key);
                return None;
            }
        };
        return page.update(action);
    }

    let (column, index) = page.cursor();
    let action = match key.code {
        KeyCode::Left | KeyCode::Char('h') => PlanningAction::CursorLeft,
        KeyCode::Right | KeyCode::Char('l') => PlanningAction::CursorRight,
        KeyCode::Up | KeyCode::Char('k') => PlanningAction::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => PlanningAction::CursorDown,
        KeyCode::Enter => PlanningAction::OpenTask { column, index },
        KeyCode::Char(' ') => PlanningAction::GrabOrDrop,
        KeyCode::Esc if page.grabbed().is_some() => PlanningAction::CancelGrab,
        KeyCode::Char('a') => PlanningAction::OpenForm(column),
        KeyCode::Char('H') | KeyCode::Char('L') => {
            let target = if key.code == KeyCode::Char('H') {
                column.index().checked_sub(1)
            } else {
                Some(column.index() + 1)
            };
            let to = target.and_then(crate::data::ColumnId::from_index)?;
            let task_id = page.board().column(column).tasks.get(index)?.id.clone();
            PlanningAction::MoveTask {
                task_id,
                from: column,
                to,
            }
        }
        _ => return None,
    };
    page.update(action)
}

fn prompting_key(page: &mut PromptingPage, key: KeyEvent) -> Option<Route> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let focus = page.focus();
    let action = match key.code {
        KeyCode::Tab | KeyCode::BackTab => PromptAction::FocusNext,
        KeyCode::Char('r') if ctrl => PromptAction::ToggleRecording(focus),
        KeyCode::Char('t') if ctrl => PromptAction::InsertTranscript(focus),
        KeyCode::Char('p') if ctrl => PromptAction::CyclePersona,
        _ => {
            page.focused_field_mut().handle_key(key);
            return None;
        }
    };
    page.update(action)
}

fn architecture_key(page: &mut ArchitecturePage, key: KeyEvent) -> Option<Route> {
    let params = page.params();
    let action = match key.code {
        KeyCode::Char(' ') | KeyCode::Char('s') => ArchAction::ToggleSimulation,
        KeyCode::Up | KeyCode::Char('k') => ArchAction::CursorPrev,
        KeyCode::Down | KeyCode::Char('j') => ArchAction::CursorNext,
        KeyCode::Enter => ArchAction::SelectModule(page.cursor()),
        KeyCode::Char('[') => ArchAction::SetSpeed(page.speed_step(false)),
        KeyCode::Char(']') => ArchAction::SetSpeed(page.speed_step(true)),
        KeyCode::Char('L') => ArchAction::SetUserLoad(params.user_load.saturating_add(5)),
        KeyCode::Char('l') => ArchAction::SetUserLoad(params.user_load.saturating_sub(5)),
        KeyCode::Char('C') => {
            ArchAction::SetDataComplexity(params.data_complexity.saturating_add(5))
        }
        KeyCode::Char('c') => {
            ArchAction::SetDataComplexity(params.data_complexity.saturating_sub(5))
        }
        KeyCode::Char('+') | KeyCode::Char('=') => ArchAction::ZoomIn,
        KeyCode::Char('-') => ArchAction::ZoomOut,
        _ => return None,
    };
    page.update(action)
}

fn time_travel_key(page: &mut TimeTravelPage, key: KeyEvent) -> Option<Route> {
    let action = match key.code {
        KeyCode::Left | KeyCode::Char('h') => TimeAction::StepBack,
        KeyCode::Right | KeyCode::Char('l') => TimeAction::StepForward,
        KeyCode::Home => TimeAction::JumpTo(0),
        KeyCode::End => TimeAction::JumpTo(crate::data::timeline::TIMELINE.len() - 1),
        KeyCode::Char(' ') | KeyCode::Char('p') => TimeAction::TogglePlay,
        KeyCode::Char('m') => TimeAction::ToggleEditMode,
        KeyCode::Char('b') => TimeAction::CreateBranch,
        _ => return None,
    };
    page.update(action)
}

fn feedback_key(page: &mut FeedbackPage, key: KeyEvent) -> Option<Route> {
    let action = match key.code {
        KeyCode::Up | KeyCode::Char('k') => FeedbackAction::CursorUp,
        KeyCode::Down | KeyCode::Char('j') => FeedbackAction::CursorDown,
        KeyCode::Enter => FeedbackAction::SelectTest(page.cursor()),
        KeyCode::Char('f') => FeedbackAction::CycleFilter,
        KeyCode::Char('m') => FeedbackAction::ToggleMonitor,
        KeyCode::Char('t') => FeedbackAction::NextTab,
        KeyCode::Char('a') => FeedbackAction::Accept,
        KeyCode::Char('d') => FeedbackAction::DeclineAndRefine,
        _ => return None,
    };
    page.update(action)
}

fn code_editor_key(page: &mut CodeEditorPage, key: KeyEvent) -> Option<Route> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if !page.confirmed() {
        let action = match key.code {
            KeyCode::Esc => EditorAction::Cancel,
            KeyCode::Enter => EditorAction::Confirm,
            KeyCode::Tab | KeyCode::BackTab => EditorAction::GateNextField,
            _ => {
                if page.focused_gate_field_mut().handle_key(key) {
                    EditorAction::GateEdited
                } else {
                    return None;
                }
            }
        };
        return page.update(action);
    }

    let action = match key.code {
        KeyCode::Char('r') if ctrl => EditorAction::Run,
        KeyCode::Char('l') if ctrl => EditorAction::CycleLanguage,
        KeyCode::Char('t') if ctrl => EditorAction::CycleTheme,
        KeyCode::Tab => {
            page.code_mut().insert_str("  ");
            return None;
        }
        _ => {
            page.code_mut().handle_key(key);
            return None;
        }
    };
    page.update(action)
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel
        MouseEventKind::ScrollUp => scroll(app, true),
        MouseEventKind::ScrollDown => scroll(app, false),

        // Tab clicks (row 1, after header)
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            if let Some(view) = crate::ui::common::tab_at(mouse.column) {
                app.set_view(view);
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

fn scroll(app: &mut App, up: bool) {
    match &mut app.page {
        ActivePage::Planning(page) => {
            page.update(if up {
                PlanningAction::CursorUp
            } else {
                PlanningAction::CursorDown
            });
        }
        ActivePage::Architecture(page) => {
            page.update(if up {
                ArchAction::CursorPrev
            } else {
                ArchAction::CursorNext
            });
        }
        ActivePage::TimeTravel(page) => {
            page.update(if up {
                TimeAction::StepBack
            } else {
                TimeAction::StepForward
            });
        }
        ActivePage::Feedback(page) => {
            page.update(if up {
                FeedbackAction::CursorUp
            } else {
                FeedbackAction::CursorDown
            });
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Unsupported;
    use crate::config::{Settings, ThemeChoice};

    fn app() -> App {
        let mut settings = Settings::default();
        settings.ui.theme = ThemeChoice::Dark;
        App::new(settings, Box::new(Unsupported))
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_digit_shortcuts_switch_pages() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view(), View::Architecture);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view(), View::TimeTravel);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view(), View::Architecture);
    }

    #[test]
    fn test_q_types_in_text_pages() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        type_str(&mut app, "q1");
        assert!(app.running);
        let ActivePage::Prompting(ref page) = app.page else {
            panic!("prompting page not mounted");
        };
        assert_eq!(page.field(crate::pages::prompting::GoalField::Primary).text(), "q1");

        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_planning_enter_opens_prompting() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.current_view(), View::Prompting);
        assert_eq!(
            app.route.task.as_ref().unwrap().title,
            "Implement voice recognition"
        );
    }

    #[test]
    fn test_planning_add_task_via_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "qa pass");
        press(&mut app, KeyCode::Enter);

        let ActivePage::Planning(ref page) = app.page else {
            panic!("planning page not mounted");
        };
        let backlog = &page.board().column(crate::data::ColumnId::Backlog).tasks;
        assert_eq!(backlog.last().unwrap().title, "qa pass");
        assert!(page.form().is_none());
        assert!(app.running);
    }

    #[test]
    fn test_code_editor_gate_escape_goes_back() {
        let mut app = app();
        press(&mut app, KeyCode::Char('4'));
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.current_view(), View::CodeEditor);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view(), View::TimeTravel);
    }

    #[test]
    fn test_help_overlay_swallows_next_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
    }
}
