//! Application state and navigation logic.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::json;
use tracing::info;

use crate::capability::{SpeechRecognizer, Unsupported};
use crate::config::Settings;
use crate::data::{Board, Route, StatusCounts};
use crate::pages::{
    ArchitecturePage, CodeEditorPage, FeedbackPage, Page, PlanningPage, PromptingPage,
    TimeTravelPage,
};
use crate::ui::Theme;

/// Maximum number of routes kept for going back.
pub const MAX_HISTORY: usize = 32;

/// The pages of the dashboard, in sidebar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Welcome screen with feature cards.
    Home,
    /// Kanban board with auto-progressing tasks.
    Planning,
    /// Prompt editor with voice input.
    Prompting,
    /// Module graph and health simulator.
    Architecture,
    /// Execution timeline scrubber.
    TimeTravel,
    /// Test results and verification.
    Feedback,
    /// Gated toy code editor.
    CodeEditor,
}

impl View {
    pub const ALL: [View; 7] = [
        View::Home,
        View::Planning,
        View::Prompting,
        View::Architecture,
        View::TimeTravel,
        View::Feedback,
        View::CodeEditor,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Planning => "Planning",
            View::Prompting => "Prompting",
            View::Architecture => "Architecture",
            View::TimeTravel => "Time Travel",
            View::Feedback => "Feedback",
            View::CodeEditor => "Code Editor",
        }
    }

    /// Route path segment; empty for home.
    pub fn slug(&self) -> &'static str {
        match self {
            View::Home => "",
            View::Planning => "planning",
            View::Prompting => "prompting",
            View::Architecture => "architecture",
            View::TimeTravel => "time-travel",
            View::Feedback => "feedback",
            View::CodeEditor => "code-editor",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.slug() == slug)
    }

    /// Digit shortcut, `0` for home.
    pub fn shortcut(&self) -> char {
        char::from(b'0' + self.position() as u8)
    }
}

/// The mounted page and its state.
#[derive(Debug)]
pub enum ActivePage {
    Home,
    Planning(PlanningPage),
    Prompting(PromptingPage),
    Architecture(ArchitecturePage),
    TimeTravel(TimeTravelPage),
    Feedback(FeedbackPage),
    CodeEditor(CodeEditorPage),
}

impl ActivePage {
    pub fn view(&self) -> View {
        match self {
            ActivePage::Home => View::Home,
            ActivePage::Planning(_) => View::Planning,
            ActivePage::Prompting(_) => View::Prompting,
            ActivePage::Architecture(_) => View::Architecture,
            ActivePage::TimeTravel(_) => View::TimeTravel,
            ActivePage::Feedback(_) => View::Feedback,
            ActivePage::CodeEditor(_) => View::CodeEditor,
        }
    }

    /// Advance the page's timers to `elapsed` since mount.
    fn tick(&mut self, elapsed: Duration) -> Option<Route> {
        match self {
            ActivePage::Home => None,
            ActivePage::Planning(p) => p.tick(elapsed),
            ActivePage::Prompting(p) => p.tick(elapsed),
            ActivePage::Architecture(p) => p.tick(elapsed),
            ActivePage::TimeTravel(p) => p.tick(elapsed),
            ActivePage::Feedback(p) => p.tick(elapsed),
            ActivePage::CodeEditor(p) => p.tick(elapsed),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub route: Route,
    pub page: ActivePage,
    mounted_at: Instant,
    /// Routes to return to, most recent last.
    pub history: Vec<Route>,
    pub settings: Settings,
    /// Speech backend, lent to the prompting page while it is mounted.
    speech: Option<Box<dyn SpeechRecognizer>>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create an app showing the home page.
    pub fn new(settings: Settings, speech: Box<dyn SpeechRecognizer>) -> Self {
        let theme = Theme::from_choice(settings.ui.theme);
        Self {
            running: true,
            show_help: false,
            route: Route::new(View::Home),
            page: ActivePage::Home,
            mounted_at: Instant::now(),
            history: Vec::new(),
            settings,
            speech: Some(speech),
            theme,
            status_message: None,
        }
    }

    pub fn current_view(&self) -> View {
        self.page.view()
    }

    /// Whether the mounted page has a working speech backend.
    pub fn speech_description(&self) -> &str {
        match (&self.page, &self.speech) {
            (ActivePage::Prompting(p), _) => p.speech_description(),
            (_, Some(speech)) => speech.description(),
            (_, None) => "speech: unavailable",
        }
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Unmount the current page and mount the page for `route`.
    ///
    /// The previous route is pushed onto the history stack, which keeps at
    /// most [`MAX_HISTORY`] routes.
    pub fn navigate(&mut self, route: Route) {
        let previous = std::mem::replace(&mut self.route, route);
        self.mount(Some(previous));
    }

    fn mount(&mut self, previous: Option<Route>) {
        let old = std::mem::replace(&mut self.page, ActivePage::Home);
        let old_view = old.view();
        if let ActivePage::Prompting(page) = old {
            self.speech = Some(page.into_speech());
        }
        if old_view != View::Home {
            info!(page = old_view.label(), "page unmounted");
        }

        let back = previous
            .clone()
            .or_else(|| self.history.last().cloned())
            .unwrap_or_else(|| Route::new(View::Home));
        if let Some(previous) = previous {
            self.history.push(previous);
            if self.history.len() > MAX_HISTORY {
                let excess = self.history.len() - MAX_HISTORY;
                self.history.drain(..excess);
            }
        }

        let task = self.route.task.clone();
        self.page = match self.route.view {
            View::Home => ActivePage::Home,
            View::Planning => ActivePage::Planning(PlanningPage::new(&self.settings)),
            View::Prompting => {
                let speech = self
                    .speech
                    .take()
                    .unwrap_or_else(|| Box::new(Unsupported));
                ActivePage::Prompting(PromptingPage::new(task, speech))
            }
            View::Architecture => {
                ActivePage::Architecture(ArchitecturePage::new(&self.settings))
            }
            View::TimeTravel => {
                ActivePage::TimeTravel(TimeTravelPage::new(self.settings.playback_period()))
            }
            View::Feedback => ActivePage::Feedback(FeedbackPage::new(task)),
            View::CodeEditor => ActivePage::CodeEditor(CodeEditorPage::new(back)),
        };
        self.mounted_at = Instant::now();
        info!(route = %self.route, "page mounted");
    }

    /// Return to the previous route, or home when there is none.
    pub fn go_back(&mut self) {
        let route = self.history.pop().unwrap_or_else(|| Route::new(View::Home));
        self.route = route;
        self.mount(None);
    }

    /// Switch to a page without a task payload.
    pub fn set_view(&mut self, view: View) {
        if view != self.current_view() || self.route.task.is_some() {
            self.navigate(Route::new(view));
        }
    }

    /// Switch to the next page.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view().next());
    }

    /// Switch to the previous page.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view().prev());
    }

    /// Run timers that came due since the page was mounted.
    pub fn tick(&mut self) {
        let elapsed = self.mounted_at.elapsed();
        self.tick_elapsed(elapsed);
    }

    /// Run timers due at `elapsed` since mount, following any navigation
    /// they request.
    pub fn tick_elapsed(&mut self, elapsed: Duration) {
        if let Some(route) = self.page.tick(elapsed) {
            self.navigate(route);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the mounted page's live state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let (architecture, board) = match &self.page {
            ActivePage::Architecture(p) => (Some(p), None),
            ActivePage::Planning(p) => (None, Some(p.board())),
            _ => anyhow::bail!("Nothing to export on the {} page", self.current_view().label()),
        };
        write_snapshot(path, &snapshot(&self.route, architecture, board))
    }
}

/// Build the JSON export for a route plus optional simulator and board state.
pub fn snapshot(
    route: &Route,
    architecture: Option<&ArchitecturePage>,
    board: Option<&Board>,
) -> serde_json::Value {
    let mut export = serde_json::Map::new();
    export.insert("route".to_string(), json!(route.to_string()));

    if let Some(page) = architecture {
        let counts: StatusCounts = page.status_counts();
        export.insert(
            "summary".to_string(),
            json!({
                "total_modules": page.metrics().len(),
                "normal": counts.normal,
                "warning": counts.warning,
                "error": counts.error,
            }),
        );
        export.insert(
            "simulation".to_string(),
            json!({
                "simulating": page.is_simulating(),
                "user_load": page.params().user_load,
                "data_complexity": page.params().data_complexity,
                "speed_ms": page.speed_ms(),
                "ticks": page.ticks(),
            }),
        );
        export.insert("metrics".to_string(), json!(page.metrics()));
    }

    if let Some(board) = board {
        export.insert("board".to_string(), json!(board.columns()));
    }

    serde_json::Value::Object(export)
}

/// Write a JSON value to `path`, pretty-printed.
pub fn write_snapshot(path: &Path, value: &serde_json::Value) -> Result<()> {
    use std::io::Write;

    let json = serde_json::to_string_pretty(value)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThemeChoice;
    use crate::data::board::ColumnId;
    use crate::data::TaskPayload;

    fn app() -> App {
        let mut settings = Settings::default();
        settings.ui.theme = ThemeChoice::Dark;
        settings.simulation.seed = Some(5);
        App::new(settings, Box::new(Unsupported))
    }

    #[test]
    fn test_view_cycle_and_slugs() {
        assert_eq!(View::Home.next(), View::Planning);
        assert_eq!(View::Home.prev(), View::CodeEditor);
        for view in View::ALL {
            assert_eq!(View::from_slug(view.slug()), Some(view));
        }
        assert_eq!(View::TimeTravel.shortcut(), '4');
    }

    #[test]
    fn test_navigate_mounts_page_with_task() {
        let mut app = app();
        app.navigate(Route::parse(
            "/prompting?task=%7B%22title%22%3A%22Fix%22%2C%22description%22%3A%22Now%22%7D",
        ));

        let ActivePage::Prompting(ref page) = app.page else {
            panic!("prompting page not mounted");
        };
        assert_eq!(page.task().unwrap().title, "Fix");
        assert_eq!(app.history, vec![Route::new(View::Home)]);
    }

    #[test]
    fn test_go_back_restores_previous_route() {
        let mut app = app();
        app.set_view(View::Planning);
        app.set_view(View::Architecture);
        app.go_back();
        assert_eq!(app.current_view(), View::Planning);
        app.go_back();
        assert_eq!(app.current_view(), View::Home);
        app.go_back();
        assert_eq!(app.current_view(), View::Home);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut app = app();
        for _ in 0..(MAX_HISTORY * 3) {
            app.next_view();
        }
        assert_eq!(app.history.len(), MAX_HISTORY);

        // The most recent route is still the one we go back to.
        let before = app.current_view();
        app.go_back();
        assert_eq!(app.current_view(), before.prev());
    }

    #[test]
    fn test_leaving_planning_discards_timers() {
        let mut app = app();
        app.set_view(View::Planning);
        app.tick_elapsed(Duration::from_secs(5));
        let ActivePage::Planning(ref page) = app.page else {
            panic!("planning page not mounted");
        };
        assert!(page.board().column(ColumnId::Todo).tasks.is_empty());

        // Remount: fresh board, timers re-armed from zero.
        app.set_view(View::Home);
        app.set_view(View::Planning);
        app.tick_elapsed(Duration::from_secs(4));
        let ActivePage::Planning(ref page) = app.page else {
            panic!("planning page not mounted");
        };
        assert_eq!(page.board().column(ColumnId::Todo).tasks.len(), 1);
    }

    #[test]
    fn test_speech_backend_returns_after_prompting() {
        let mut app = app();
        app.set_view(View::Prompting);
        assert!(app.speech.is_none());
        app.set_view(View::Feedback);
        assert!(app.speech.is_some());
    }

    #[test]
    fn test_feedback_decline_navigates_with_task() {
        let mut app = app();
        let payload = TaskPayload {
            title: "Test speech recognition".to_string(),
            description: String::new(),
            category: Default::default(),
            priority: Default::default(),
        };
        app.navigate(Route::with_task(View::Feedback, payload));
        let ActivePage::Feedback(ref mut page) = app.page else {
            panic!("feedback page not mounted");
        };
        let route = page.update(crate::pages::feedback::Action::DeclineAndRefine).unwrap();
        app.navigate(route);

        assert_eq!(app.current_view(), View::Prompting);
        assert_eq!(app.route.task.as_ref().unwrap().title, "Test speech recognition");
    }

    #[test]
    fn test_export_architecture_state() {
        let mut app = app();
        app.set_view(View::Architecture);
        if let ActivePage::Architecture(ref mut page) = app.page {
            page.update(crate::pages::architecture::Action::ToggleSimulation);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["route"], "/architecture");
        assert_eq!(value["summary"]["total_modules"], 8);
        assert!(value["metrics"]["parser"]["latency"].is_number());
    }

    #[test]
    fn test_export_on_home_fails() {
        let app = app();
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("x.json")).is_err());
    }
}
