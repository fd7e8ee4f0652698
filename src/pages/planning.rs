//! Planning board state and the task auto-progression timers.
//!
//! On mount the page arms a one-shot timer that moves the first `todo` task
//! to the end of `in-progress`. When that timer fires it arms a second
//! one-shot that moves the first `in-progress` task to the end of `verify`.
//! An empty source column makes the move a no-op; nothing is retried.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::app::View;
use crate::config::Settings;
use crate::data::board::{Board, ColumnId, TaskDraft};
use crate::data::{Route, TaskPayload};
use crate::pages::{Page, TextField};
use crate::scheduler::Scheduler;

/// Which add-task form field has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

/// The inline add-task form for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub column: ColumnId,
    pub title: TextField,
    pub description: TextField,
    pub draft: TaskDraft,
    pub focus: FormField,
}

impl TaskForm {
    fn new(column: ColumnId) -> Self {
        Self {
            column,
            title: TextField::new(),
            description: TextField::multiline(),
            draft: TaskDraft::default(),
            focus: FormField::Title,
        }
    }

    pub fn focused_field_mut(&mut self) -> &mut TextField {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.text().to_string(),
            description: self.description.text().to_string(),
            ..self.draft.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// First delayed move: `todo` → `in-progress`.
    AutoAdvanceTodo,
    /// Second delayed move: `in-progress` → `verify`.
    AutoAdvanceVerify,
    MoveTask {
        task_id: String,
        from: ColumnId,
        to: ColumnId,
    },
    Reorder {
        from: ColumnId,
        from_index: usize,
        to: ColumnId,
        to_index: usize,
    },
    OpenTask {
        column: ColumnId,
        index: usize,
    },
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Pick up the task under the cursor, or drop the held task there.
    GrabOrDrop,
    CancelGrab,
    OpenForm(ColumnId),
    CloseForm,
    FormNextField,
    CyclePriority,
    CycleCategory,
    SubmitForm,
}

#[derive(Debug)]
pub struct PlanningPage {
    scheduler: Scheduler<Action>,
    board: Board,
    verify_delay: Duration,
    cursor_column: ColumnId,
    cursor_index: usize,
    grabbed: Option<(ColumnId, usize)>,
    form: Option<TaskForm>,
}

impl PlanningPage {
    /// Mount the page with the seed board and arm the first timer.
    pub fn new(settings: &Settings) -> Self {
        Self::with_board(Board::seed(), settings.todo_delay(), settings.verify_delay())
    }

    pub fn with_board(board: Board, todo_delay: Duration, verify_delay: Duration) -> Self {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_once(todo_delay, Action::AutoAdvanceTodo);
        Self {
            scheduler,
            board,
            verify_delay,
            cursor_column: ColumnId::Backlog,
            cursor_index: 0,
            grabbed: None,
            form: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cursor(&self) -> (ColumnId, usize) {
        (self.cursor_column, self.cursor_index)
    }

    pub fn grabbed(&self) -> Option<(ColumnId, usize)> {
        self.grabbed
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.form.as_mut()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    fn auto_advance(&mut self, from: ColumnId, to: ColumnId) {
        match self.board.advance_first(from, to) {
            Some(task_id) => info!(task = %task_id, from = from.slug(), to = to.slug(), "task advanced"),
            None => debug!(from = from.slug(), "nothing to advance"),
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let len = self.board.column(self.cursor_column).tasks.len();
        self.cursor_index = self.cursor_index.min(len.saturating_sub(1));
    }

    fn shift_column(&mut self, forward: bool) {
        let index = self.cursor_column.index();
        let next = if forward {
            (index + 1).min(ColumnId::ALL.len() - 1)
        } else {
            index.saturating_sub(1)
        };
        if let Some(column) = ColumnId::from_index(next) {
            self.cursor_column = column;
            self.clamp_cursor();
        }
    }

    /// Route for opening a task, or `None` for columns that do not open.
    fn open_route(&self, column: ColumnId, index: usize) -> Option<Route> {
        let task = self.board.column(column).tasks.get(index)?;
        let payload = TaskPayload::from(task);
        match column {
            ColumnId::InProgress => None,
            ColumnId::Verify => Some(Route::with_task(View::Feedback, payload)),
            _ => Some(Route::with_task(View::Prompting, payload)),
        }
    }

    /// Add the form's task to its column at `now`. Blank titles are ignored
    /// and leave the form open.
    pub fn submit_form(&mut self, now: DateTime<Utc>) {
        let Some(form) = self.form.as_ref() else {
            return;
        };
        let column = form.column;
        let draft = form.to_draft();
        if let Some(task) = self.board.add_task(column, &draft, now) {
            info!(task = %task.id, column = column.slug(), "task added");
            self.form = None;
        }
    }
}

impl Page for PlanningPage {
    type Action = Action;

    fn scheduler_mut(&mut self) -> &mut Scheduler<Action> {
        &mut self.scheduler
    }

    fn update(&mut self, action: Action) -> Option<Route> {
        match action {
            Action::AutoAdvanceTodo => {
                self.auto_advance(ColumnId::Todo, ColumnId::InProgress);
                self.scheduler
                    .schedule_once(self.verify_delay, Action::AutoAdvanceVerify);
            }
            Action::AutoAdvanceVerify => {
                self.auto_advance(ColumnId::InProgress, ColumnId::Verify);
            }
            Action::MoveTask { task_id, from, to } => {
                if self.board.move_task(&task_id, from, to) {
                    debug!(task = %task_id, from = from.slug(), to = to.slug(), "task moved");
                }
                self.clamp_cursor();
            }
            Action::Reorder {
                from,
                from_index,
                to,
                to_index,
            } => {
                if self.board.reorder(from, from_index, to, to_index) {
                    self.cursor_column = to;
                    self.cursor_index = to_index.min(self.board.column(to).tasks.len() - 1);
                }
            }
            Action::OpenTask { column, index } => return self.open_route(column, index),
            Action::CursorLeft => self.shift_column(false),
            Action::CursorRight => self.shift_column(true),
            Action::CursorUp => self.cursor_index = self.cursor_index.saturating_sub(1),
            Action::CursorDown => {
                self.cursor_index += 1;
                self.clamp_cursor();
            }
            Action::GrabOrDrop => match self.grabbed.take() {
                Some((from, from_index)) => {
                    return self.update(Action::Reorder {
                        from,
                        from_index,
                        to: self.cursor_column,
                        to_index: self.cursor_index,
                    });
                }
                None => {
                    if self.cursor_index < self.board.column(self.cursor_column).tasks.len() {
                        self.grabbed = Some((self.cursor_column, self.cursor_index));
                    }
                }
            },
            Action::CancelGrab => self.grabbed = None,
            Action::OpenForm(column) => self.form = Some(TaskForm::new(column)),
            Action::CloseForm => self.form = None,
            Action::FormNextField => {
                if let Some(form) = self.form.as_mut() {
                    form.focus = match form.focus {
                        FormField::Title => FormField::Description,
                        FormField::Description => FormField::Title,
                    };
                }
            }
            Action::CyclePriority => {
                if let Some(form) = self.form.as_mut() {
                    form.draft.priority = form.draft.priority.next();
                }
            }
            Action::CycleCategory => {
                if let Some(form) = self.form.as_mut() {
                    form.draft.category = form.draft.category.next();
                }
            }
            Action::SubmitForm => self.submit_form(Utc::now()),
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::board::{Category, Priority, Task};

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn single_todo_board() -> Board {
        let mut board = Board::empty();
        board.push_back(
            ColumnId::Todo,
            Task::new("t", "Only", "", Priority::Low, Category::Feature, "2024-03-20"),
        );
        board
    }

    fn page_with(board: Board) -> PlanningPage {
        PlanningPage::with_board(board, secs(5), secs(8))
    }

    fn ids(page: &PlanningPage, column: ColumnId) -> Vec<String> {
        page.board()
            .column(column)
            .tasks
            .iter()
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn test_auto_progression_timeline() {
        let mut page = page_with(single_todo_board());

        page.tick(Duration::from_millis(4_999));
        assert_eq!(ids(&page, ColumnId::Todo), vec!["t"]);

        page.tick(secs(5));
        assert!(ids(&page, ColumnId::Todo).is_empty());
        assert_eq!(ids(&page, ColumnId::InProgress), vec!["t"]);

        page.tick(Duration::from_millis(12_999));
        assert_eq!(ids(&page, ColumnId::InProgress), vec!["t"]);

        page.tick(secs(13));
        assert!(ids(&page, ColumnId::InProgress).is_empty());
        assert_eq!(ids(&page, ColumnId::Verify), vec!["t"]);
        assert_eq!(page.board().task_count(), 1);
    }

    #[test]
    fn test_auto_progression_runs_once() {
        let mut board = single_todo_board();
        board.push_back(
            ColumnId::Todo,
            Task::new("u", "Second", "", Priority::Low, Category::Bug, "2024-03-20"),
        );
        let mut page = page_with(board);

        page.tick(secs(60));
        assert_eq!(ids(&page, ColumnId::Todo), vec!["u"]);
        assert_eq!(ids(&page, ColumnId::Verify), vec!["t"]);
        assert_eq!(page.pending_timers(), 0);
    }

    #[test]
    fn test_empty_todo_is_noop() {
        let mut page = page_with(Board::empty());
        let before = page.board().clone();

        page.tick(secs(5));
        assert_eq!(page.board(), &before);
        page.tick(secs(13));
        assert_eq!(page.board(), &before);
    }

    #[test]
    fn test_seed_board_progression() {
        let mut page = PlanningPage::new(&Settings::default());
        page.tick(secs(13));

        assert!(ids(&page, ColumnId::Todo).is_empty());
        // The task already in progress moves first.
        assert_eq!(ids(&page, ColumnId::InProgress), vec!["3"]);
        assert_eq!(ids(&page, ColumnId::Verify), vec!["5", "4"]);
    }

    #[test]
    fn test_delays_are_chained_one_shots() {
        let mut page = page_with(single_todo_board());
        assert_eq!(page.pending_timers(), 1);

        page.tick(secs(5));
        assert_eq!(page.pending_timers(), 1);

        page.tick(secs(13));
        assert_eq!(page.pending_timers(), 0);

        // Nothing re-arms once both moves have run.
        page.tick(secs(60));
        assert_eq!(page.pending_timers(), 0);
        assert_eq!(ids(&page, ColumnId::Verify), vec!["t"]);
    }

    #[test]
    fn test_open_task_routes() {
        let mut page = PlanningPage::new(&Settings::default());

        let route = page
            .update(Action::OpenTask {
                column: ColumnId::Backlog,
                index: 0,
            })
            .unwrap();
        assert_eq!(route.view, View::Prompting);
        assert_eq!(route.task.unwrap().title, "Implement voice recognition");

        let route = page
            .update(Action::OpenTask {
                column: ColumnId::Verify,
                index: 0,
            })
            .unwrap();
        assert_eq!(route.view, View::Feedback);

        assert!(page
            .update(Action::OpenTask {
                column: ColumnId::InProgress,
                index: 0,
            })
            .is_none());
        assert!(page
            .update(Action::OpenTask {
                column: ColumnId::Done,
                index: 9,
            })
            .is_none());
    }

    #[test]
    fn test_keyboard_drag_and_drop() {
        let mut page = PlanningPage::new(&Settings::default());
        page.update(Action::GrabOrDrop);
        assert_eq!(page.grabbed(), Some((ColumnId::Backlog, 0)));

        page.update(Action::CursorRight);
        page.update(Action::GrabOrDrop);

        assert_eq!(page.grabbed(), None);
        assert_eq!(ids(&page, ColumnId::Backlog), vec!["2"]);
        assert_eq!(ids(&page, ColumnId::Todo), vec!["1", "3"]);
        assert_eq!(page.cursor(), (ColumnId::Todo, 0));
    }

    #[test]
    fn test_move_task_action() {
        let mut page = PlanningPage::new(&Settings::default());
        page.update(Action::MoveTask {
            task_id: "6".to_string(),
            from: ColumnId::Done,
            to: ColumnId::Backlog,
        });
        assert_eq!(ids(&page, ColumnId::Backlog), vec!["1", "2", "6"]);
    }

    #[test]
    fn test_add_task_form() {
        let mut page = page_with(Board::empty());
        page.update(Action::OpenForm(ColumnId::Backlog));

        // Blank title keeps the form open.
        page.submit_form(Utc::now());
        assert!(page.form().is_some());

        let form = page.form_mut().unwrap();
        form.title.set_text("New idea");
        page.update(Action::FormNextField);
        page.form_mut().unwrap().focused_field_mut().set_text("Details");
        page.update(Action::CyclePriority);
        page.update(Action::CycleCategory);
        page.submit_form(Utc::now());

        assert!(page.form().is_none());
        let task = &page.board().column(ColumnId::Backlog).tasks[0];
        assert_eq!(task.title, "New idea");
        assert_eq!(task.description, "Details");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Category::Bug);

        // A fresh form starts from the defaults again.
        page.update(Action::OpenForm(ColumnId::Backlog));
        let draft = &page.form().unwrap().draft;
        assert_eq!(draft.priority, Priority::Medium);
        assert_eq!(draft.category, Category::Feature);
    }
}
