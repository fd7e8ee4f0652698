//! Toy code editor behind a typed confirmation gate.

use std::time::Duration;

use tracing::debug;

use crate::data::Route;
use crate::pages::{Page, TextField};
use crate::scheduler::Scheduler;

pub const FIRST_PHRASE: &str = "i want to code";
pub const SECOND_PHRASE: &str = "i can code";
pub const PHRASE_ERROR: &str = "Please type the exact verification phrases";

/// Delay before a mock run prints its output.
pub const RUN_DELAY: Duration = Duration::from_millis(1200);

pub const INITIAL_CODE: &str = "// Write your code here\nfunction helloWorld() {\n  console.log(\"Hello, world!\");\n}\n\nhelloWorld();";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    Python,
    Html,
    Css,
}

impl Language {
    pub fn id(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Html => "html",
            Language::Css => "css",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Language::JavaScript => Language::TypeScript,
            Language::TypeScript => Language::Python,
            Language::Python => Language::Html,
            Language::Html => Language::Css,
            Language::Css => Language::JavaScript,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorTheme {
    #[default]
    Dark,
    Light,
    Dracula,
}

impl EditorTheme {
    pub fn id(&self) -> &'static str {
        match self {
            EditorTheme::Dark => "dark",
            EditorTheme::Light => "light",
            EditorTheme::Dracula => "dracula",
        }
    }

    pub fn next(self) -> Self {
        match self {
            EditorTheme::Dark => EditorTheme::Light,
            EditorTheme::Light => EditorTheme::Dracula,
            EditorTheme::Dracula => EditorTheme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GateField {
    #[default]
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A gate field changed; clears any error.
    GateEdited,
    GateNextField,
    Confirm,
    Cancel,
    CycleLanguage,
    CycleTheme,
    Run,
    /// Delivered by the run timer.
    RunFinished,
}

#[derive(Debug)]
pub struct CodeEditorPage {
    scheduler: Scheduler<Action>,
    back: Route,
    confirmed: bool,
    first: TextField,
    second: TextField,
    gate_focus: GateField,
    error: Option<&'static str>,
    code: TextField,
    language: Language,
    theme: EditorTheme,
    output: String,
    running: bool,
}

impl CodeEditorPage {
    /// `back` is where cancelling the gate returns to.
    pub fn new(back: Route) -> Self {
        Self {
            scheduler: Scheduler::new(),
            back,
            confirmed: false,
            first: TextField::new(),
            second: TextField::new(),
            gate_focus: GateField::First,
            error: None,
            code: TextField::multiline().with_text(INITIAL_CODE),
            language: Language::default(),
            theme: EditorTheme::default(),
            output: String::new(),
            running: false,
        }
    }

    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn gate_field(&self, field: GateField) -> &TextField {
        match field {
            GateField::First => &self.first,
            GateField::Second => &self.second,
        }
    }

    pub fn gate_focus(&self) -> GateField {
        self.gate_focus
    }

    pub fn focused_gate_field_mut(&mut self) -> &mut TextField {
        match self.gate_focus {
            GateField::First => &mut self.first,
            GateField::Second => &mut self.second,
        }
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn code(&self) -> &TextField {
        &self.code
    }

    pub fn code_mut(&mut self) -> &mut TextField {
        &mut self.code
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn theme(&self) -> EditorTheme {
        self.theme
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    fn phrases_match(&self) -> bool {
        self.first.text().trim().to_lowercase() == FIRST_PHRASE
            && self.second.text().trim().to_lowercase() == SECOND_PHRASE
    }
}

impl Page for CodeEditorPage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::GateEdited => self.error = None,
            Action::GateNextField => {
                self.gate_focus = match self.gate_focus {
                    GateField::First => GateField::Second,
                    GateField::Second => GateField::First,
                };
            }
            Action::Confirm => {
                if self.phrases_match() {
                    self.error = None;
                    self.confirmed = true;
                } else {
                    self.error = Some(PHRASE_ERROR);
                }
            }
            Action::Cancel => return Some(self.back.clone()),
            Action::CycleLanguage => self.language = self.language.next(),
            Action::CycleTheme => self.theme = self.theme.next(),
            Action::Run => {
                if !self.running {
                    self.running = true;
                    self.output.clear();
                    self.scheduler.schedule_once(RUN_DELAY, Action::RunFinished);
                    debug!(language = self.language.id(), "running code");
                }
            }
            Action::RunFinished => {
                self.output = format!(
                    "Running {} code...\n\nOutput:\nHello, world!\n\nExecution completed in 0.12s",
                    self.language.id()
                );
                self.running = false;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::View;

    fn page() -> CodeEditorPage {
        CodeEditorPage::new(Route::new(View::Planning))
    }

    fn type_phrases(page: &mut CodeEditorPage, first: &str, second: &str) {
        page.focused_gate_field_mut().set_text(first);
        page.update(Action::GateNextField);
        page.focused_gate_field_mut().set_text(second);
        page.update(Action::GateEdited);
    }

    #[test]
    fn test_gate_rejects_wrong_phrases() {
        let mut page = page();
        type_phrases(&mut page, "i want to code", "maybe");
        page.update(Action::Confirm);
        assert!(!page.confirmed());
        assert_eq!(page.error(), Some(PHRASE_ERROR));

        page.update(Action::GateEdited);
        assert_eq!(page.error(), None);
    }

    #[test]
    fn test_gate_accepts_trimmed_case_insensitive() {
        let mut page = page();
        type_phrases(&mut page, "  I Want To Code ", "I CAN CODE");
        page.update(Action::Confirm);
        assert!(page.confirmed());
    }

    #[test]
    fn test_cancel_goes_back() {
        let mut page = page();
        assert_eq!(page.update(Action::Cancel), Some(Route::new(View::Planning)));
    }

    #[test]
    fn test_run_output_after_delay() {
        let mut page = page();
        page.update(Action::CycleLanguage);
        page.update(Action::Run);
        assert!(page.is_running());

        // A second run while running is ignored.
        page.update(Action::Run);
        page.tick(Duration::from_millis(1_199));
        assert_eq!(page.output(), "");

        page.tick(Duration::from_millis(1_200));
        assert!(!page.is_running());
        assert_eq!(
            page.output(),
            "Running typescript code...\n\nOutput:\nHello, world!\n\nExecution completed in 0.12s"
        );
        page.tick(Duration::from_secs(10));
        assert_eq!(page.scheduler_mut().pending(), 0);
    }

    #[test]
    fn test_cycles() {
        let mut page = page();
        for _ in 0..5 {
            page.update(Action::CycleLanguage);
        }
        assert_eq!(page.language(), Language::JavaScript);
        page.update(Action::CycleTheme);
        assert_eq!(page.theme().id(), "light");
        assert!(page.code().text().starts_with("// Write your code here"));
    }
}
