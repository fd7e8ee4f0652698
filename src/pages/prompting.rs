//! Prompt editor state.
//!
//! Two goal fields, a persona selector and voice input through the speech
//! capability. A recognized transcript is held until the user inserts it at
//! the cursor of the field that was listening.

use std::time::Duration;

use tracing::{debug, warn};

use crate::capability::{SpeechEvent, SpeechRecognizer};
use crate::data::{Route, TaskPayload};
use crate::pages::{Page, TextField};
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Persona {
    #[default]
    Default,
    Expert,
    Beginner,
}

impl Persona {
    pub const ALL: [Persona; 3] = [Persona::Default, Persona::Expert, Persona::Beginner];

    pub fn label(&self) -> &'static str {
        match self {
            Persona::Default => "Default",
            Persona::Expert => "Expert",
            Persona::Beginner => "Beginner",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Persona::Default => Persona::Expert,
            Persona::Expert => Persona::Beginner,
            Persona::Beginner => Persona::Default,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoalField {
    #[default]
    Primary,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetPersona(Persona),
    CyclePersona,
    FocusNext,
    /// Start or stop listening for the given field.
    ToggleRecording(GoalField),
    /// Insert the held transcript at the field's cursor.
    InsertTranscript(GoalField),
    Speech(SpeechEvent),
}

#[derive(Debug)]
pub struct PromptingPage {
    scheduler: Scheduler<Action>,
    speech: Box<dyn SpeechRecognizer>,
    persona: Persona,
    primary_goal: TextField,
    sub_goal: TextField,
    focus: GoalField,
    recording: bool,
    recording_field: Option<GoalField>,
    transcript: String,
    task: Option<TaskPayload>,
}

impl PromptingPage {
    pub fn new(task: Option<TaskPayload>, speech: Box<dyn SpeechRecognizer>) -> Self {
        let mut primary_goal = TextField::multiline();
        let mut sub_goal = TextField::multiline();
        if let Some(ref task) = task {
            primary_goal.set_text(format!("Task: {}\n\n{}", task.title, task.description));
            sub_goal.set_text(format!(
                "Priority: {}\nType: {}",
                task.priority.label(),
                task.category.label()
            ));
        }

        Self {
            scheduler: Scheduler::new(),
            speech,
            persona: Persona::Default,
            primary_goal,
            sub_goal,
            focus: GoalField::Primary,
            recording: false,
            recording_field: None,
            transcript: String::new(),
            task,
        }
    }

    /// Tear the page down, handing the recognizer back to the caller.
    pub fn into_speech(mut self) -> Box<dyn SpeechRecognizer> {
        if self.recording {
            self.speech.stop();
        }
        self.speech
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn task(&self) -> Option<&TaskPayload> {
        self.task.as_ref()
    }

    pub fn field(&self, field: GoalField) -> &TextField {
        match field {
            GoalField::Primary => &self.primary_goal,
            GoalField::Sub => &self.sub_goal,
        }
    }

    pub fn field_mut(&mut self, field: GoalField) -> &mut TextField {
        match field {
            GoalField::Primary => &mut self.primary_goal,
            GoalField::Sub => &mut self.sub_goal,
        }
    }

    pub fn focus(&self) -> GoalField {
        self.focus
    }

    pub fn focused_field_mut(&mut self) -> &mut TextField {
        self.field_mut(self.focus)
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn recording_field(&self) -> Option<GoalField> {
        self.recording_field
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn speech_supported(&self) -> bool {
        self.speech.supported()
    }

    pub fn speech_description(&self) -> &str {
        self.speech.description()
    }

    fn toggle_recording(&mut self, field: GoalField) {
        if !self.speech.supported() {
            warn!("speech recognition not supported");
            return;
        }

        self.recording_field = Some(field);
        if self.recording {
            self.speech.stop();
            self.recording = false;
            debug!("listening stopped");
            return;
        }

        match self.speech.start() {
            Ok(()) => {
                self.recording = true;
                debug!(?field, "listening");
            }
            Err(e) => warn!(error = %e, "could not start speech recognition"),
        }
    }

    fn insert_transcript(&mut self, field: GoalField) {
        if self.transcript.is_empty() || self.recording_field != Some(field) {
            return;
        }
        let transcript = std::mem::take(&mut self.transcript);
        self.field_mut(field).insert_str(&transcript);
    }
}

impl Page for PromptingPage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::SetPersona(persona) => self.persona = persona,
            Action::CyclePersona => self.persona = self.persona.next(),
            Action::FocusNext => {
                self.focus = match self.focus {
                    GoalField::Primary => GoalField::Sub,
                    GoalField::Sub => GoalField::Primary,
                };
            }
            Action::ToggleRecording(field) => self.toggle_recording(field),
            Action::InsertTranscript(field) => self.insert_transcript(field),
            Action::Speech(SpeechEvent::Result(text)) => self.transcript = text,
            Action::Speech(SpeechEvent::Error(e)) => {
                warn!(error = %e, "speech recognition error");
                self.recording = false;
            }
            Action::Speech(SpeechEvent::End) => self.recording = false,
        }
        None
    }

    fn tick(&mut self, elapsed: Duration) -> Option<Route> {
        while let Some(event) = self.speech.poll_event() {
            self.update(Action::Speech(event));
        }
        self.scheduler.advance_clock(elapsed);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    use crate::capability::{SpeechError, Unsupported};
    use crate::data::board::{Category, Priority};

    /// Recognizer that replays a fixed script on every start.
    #[derive(Debug, Default)]
    struct Scripted {
        script: Vec<SpeechEvent>,
        pending: VecDeque<SpeechEvent>,
        starts: usize,
    }

    impl SpeechRecognizer for Scripted {
        fn supported(&self) -> bool {
            true
        }

        fn description(&self) -> &str {
            "scripted"
        }

        fn start(&mut self) -> Result<(), SpeechError> {
            self.starts += 1;
            self.pending = self.script.iter().cloned().collect();
            Ok(())
        }

        fn stop(&mut self) {
            self.pending.clear();
        }

        fn poll_event(&mut self) -> Option<SpeechEvent> {
            self.pending.pop_front()
        }
    }

    fn scripted(events: Vec<SpeechEvent>) -> Box<dyn SpeechRecognizer> {
        Box::new(Scripted {
            script: events,
            ..Scripted::default()
        })
    }

    fn payload() -> TaskPayload {
        TaskPayload {
            title: "Add gesture controls".to_string(),
            description: "Implement hand gesture recognition".to_string(),
            category: Category::Feature,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_prefill_from_task() {
        let page = PromptingPage::new(Some(payload()), Box::new(Unsupported));
        assert_eq!(
            page.field(GoalField::Primary).text(),
            "Task: Add gesture controls\n\nImplement hand gesture recognition"
        );
        assert_eq!(page.field(GoalField::Sub).text(), "Priority: medium\nType: feature");
    }

    #[test]
    fn test_no_task_leaves_fields_empty() {
        let page = PromptingPage::new(None, Box::new(Unsupported));
        assert!(page.field(GoalField::Primary).is_empty());
        assert!(page.field(GoalField::Sub).is_empty());
    }

    #[test]
    fn test_unsupported_speech_does_nothing() {
        let mut page = PromptingPage::new(None, Box::new(Unsupported));
        page.update(Action::ToggleRecording(GoalField::Primary));
        assert!(!page.is_recording());
        assert_eq!(page.recording_field(), None);
    }

    #[test]
    fn test_transcript_inserted_at_cursor() {
        let events = vec![
            SpeechEvent::Result("hello".to_string()),
            SpeechEvent::Result("hello there".to_string()),
        ];
        let mut page = PromptingPage::new(None, scripted(events));
        page.field_mut(GoalField::Primary).set_text("Say: !");
        page.field_mut(GoalField::Primary).move_left();

        page.update(Action::ToggleRecording(GoalField::Primary));
        assert!(page.is_recording());
        page.tick(Duration::from_millis(100));
        assert_eq!(page.transcript(), "hello there");

        // Only the listening field accepts the transcript.
        page.update(Action::InsertTranscript(GoalField::Sub));
        assert!(page.field(GoalField::Sub).is_empty());

        page.update(Action::InsertTranscript(GoalField::Primary));
        assert_eq!(page.field(GoalField::Primary).text(), "Say: hello there!");
        assert_eq!(page.transcript(), "");
    }

    #[test]
    fn test_error_and_end_stop_recording() {
        let mut page = PromptingPage::new(
            None,
            scripted(vec![SpeechEvent::Error("no-speech".to_string())]),
        );
        page.update(Action::ToggleRecording(GoalField::Sub));
        page.tick(Duration::ZERO);
        assert!(!page.is_recording());

        let mut page = PromptingPage::new(None, scripted(vec![SpeechEvent::End]));
        page.update(Action::ToggleRecording(GoalField::Sub));
        page.tick(Duration::ZERO);
        assert!(!page.is_recording());
    }

    #[test]
    fn test_toggle_stops_listening() {
        let mut page = PromptingPage::new(None, scripted(vec![]));
        page.update(Action::ToggleRecording(GoalField::Primary));
        page.update(Action::ToggleRecording(GoalField::Primary));
        assert!(!page.is_recording());
    }

    #[test]
    fn test_persona_cycle() {
        let mut page = PromptingPage::new(None, Box::new(Unsupported));
        page.update(Action::CyclePersona);
        assert_eq!(page.persona(), Persona::Expert);
        page.update(Action::SetPersona(Persona::Beginner));
        page.update(Action::CyclePersona);
        assert_eq!(page.persona(), Persona::Default);
    }
}
