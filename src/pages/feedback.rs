//! Feedback loop state: verification tasks, test results and performance.

use tracing::info;

use crate::app::View;
use crate::data::board::Task;
use crate::data::feedback::{TestResult, TypeFilter, TEST_RESULTS};
use crate::data::{Route, TaskPayload};
use crate::pages::Page;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Tests,
    Performance,
    Details,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Tests => Tab::Performance,
            Tab::Performance => Tab::Details,
            Tab::Details => Tab::Tests,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Tests => "Test Results",
            Tab::Performance => "Performance",
            Tab::Details => "Details",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CycleFilter,
    ToggleMonitor,
    NextTab,
    CursorUp,
    CursorDown,
    /// Select the visible test at this position as the verification task.
    SelectTest(usize),
    /// Send the selected task back to planning.
    Accept,
    /// Send the selected task to the prompt editor for refinement.
    DeclineAndRefine,
}

#[derive(Debug)]
pub struct FeedbackPage {
    scheduler: Scheduler<Action>,
    selected_task: Option<Task>,
    filter: TypeFilter,
    show_monitor: bool,
    tab: Tab,
    cursor: usize,
}

impl FeedbackPage {
    pub fn new(task: Option<TaskPayload>) -> Self {
        let selected_task = task.map(|p| {
            Task::new(String::new(), p.title, p.description, p.priority, p.category, String::new())
        });
        Self {
            scheduler: Scheduler::new(),
            selected_task,
            filter: TypeFilter::All,
            show_monitor: false,
            tab: Tab::Tests,
            cursor: 0,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task.as_ref()
    }

    pub fn filter(&self) -> TypeFilter {
        self.filter
    }

    pub fn show_monitor(&self) -> bool {
        self.show_monitor
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Tests whose verification task matches the type filter.
    pub fn visible_tests(&self) -> Vec<&'static TestResult> {
        TEST_RESULTS
            .iter()
            .filter(|t| self.filter.matches(t.to_task().category))
            .collect()
    }
}

impl Page for FeedbackPage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::CycleFilter => {
                self.filter = self.filter.next();
                self.cursor = 0;
            }
            Action::ToggleMonitor => self.show_monitor = !self.show_monitor,
            Action::NextTab => self.tab = self.tab.next(),
            Action::CursorUp => self.cursor = self.cursor.saturating_sub(1),
            Action::CursorDown => {
                let max = self.visible_tests().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(max);
            }
            Action::SelectTest(index) => {
                if let Some(test) = self.visible_tests().get(index) {
                    self.cursor = index;
                    self.selected_task = Some(test.to_task());
                }
            }
            Action::Accept => {
                let task = self.selected_task.as_ref()?;
                info!(task = %task.title, "verification accepted");
                return Some(Route::new(View::Planning));
            }
            Action::DeclineAndRefine => {
                let task = self.selected_task.as_ref()?;
                info!(task = %task.title, "verification declined");
                return Some(Route::with_task(View::Prompting, TaskPayload::from(task)));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::board::{Category, Priority};
    use crate::data::format::{format_date_safely, INVALID_DATE};

    #[test]
    fn test_accept_without_selection_stays() {
        let mut page = FeedbackPage::new(None);
        assert!(page.update(Action::Accept).is_none());
        assert!(page.update(Action::DeclineAndRefine).is_none());
    }

    #[test]
    fn test_select_failed_test() {
        let mut page = FeedbackPage::new(None);
        page.update(Action::SelectTest(1));

        let task = page.selected_task().unwrap();
        assert_eq!(task.title, "Microphone Permission Handling");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(format_date_safely(&task.created_at), "2024-03-20 10:30:05");
    }

    #[test]
    fn test_decline_routes_to_prompting_with_task() {
        let mut page = FeedbackPage::new(None);
        page.update(Action::SelectTest(0));
        let route = page.update(Action::DeclineAndRefine).unwrap();

        assert_eq!(route.view, View::Prompting);
        let payload = route.task.unwrap();
        assert_eq!(payload.title, "Speech Recognition Accuracy");
        assert_eq!(payload.category, Category::Bug);
    }

    #[test]
    fn test_accept_routes_to_planning() {
        let payload = TaskPayload {
            title: "Test speech recognition".to_string(),
            description: "Verify accuracy".to_string(),
            category: Category::Feedback,
            priority: Priority::High,
        };
        let mut page = FeedbackPage::new(Some(payload));
        assert_eq!(
            format_date_safely(&page.selected_task().unwrap().created_at),
            INVALID_DATE
        );

        let route = page.update(Action::Accept).unwrap();
        assert_eq!(route, Route::new(View::Planning));
    }

    #[test]
    fn test_filter_narrows_tests() {
        let mut page = FeedbackPage::new(None);
        assert_eq!(page.visible_tests().len(), 3);

        page.update(Action::CycleFilter);
        assert_eq!(page.filter().label(), "feature");
        assert!(page.visible_tests().is_empty());
        page.update(Action::SelectTest(0));
        assert!(page.selected_task().is_none());

        page.update(Action::CycleFilter);
        assert_eq!(page.visible_tests().len(), 3);
    }

    #[test]
    fn test_cursor_bounds() {
        let mut page = FeedbackPage::new(None);
        for _ in 0..5 {
            page.update(Action::CursorDown);
        }
        assert_eq!(page.cursor(), 2);
        page.update(Action::ToggleMonitor);
        assert!(page.show_monitor());
    }
}
