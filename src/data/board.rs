//! Kanban board model for the planning page.
//!
//! A [`Board`] owns five fixed [`Column`]s. Every [`Task`] lives in exactly
//! one column; all moves remove the task from its source before inserting it
//! at the destination, so a task is never duplicated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Cycle low → medium → high → low.
    pub fn next(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

/// Task category, serialized as `type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Feature,
    Bug,
    Feedback,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Feature => "feature",
            Category::Bug => "bug",
            Category::Feedback => "feedback",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Category::Feature => Category::Bug,
            Category::Bug => Category::Feedback,
            Category::Feedback => Category::Feature,
        }
    }
}

/// One of the five fixed workflow stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnId {
    Backlog,
    Todo,
    InProgress,
    Verify,
    Done,
}

impl ColumnId {
    /// All columns in display order.
    pub const ALL: [ColumnId; 5] = [
        ColumnId::Backlog,
        ColumnId::Todo,
        ColumnId::InProgress,
        ColumnId::Verify,
        ColumnId::Done,
    ];

    pub fn index(self) -> usize {
        match self {
            ColumnId::Backlog => 0,
            ColumnId::Todo => 1,
            ColumnId::InProgress => 2,
            ColumnId::Verify => 3,
            ColumnId::Done => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn title(self) -> &'static str {
        match self {
            ColumnId::Backlog => "Backlog",
            ColumnId::Todo => "To Do",
            ColumnId::InProgress => "In Progress",
            ColumnId::Verify => "Verify",
            ColumnId::Done => "Done",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ColumnId::Backlog => "backlog",
            ColumnId::Todo => "todo",
            ColumnId::InProgress => "in-progress",
            ColumnId::Verify => "verify",
            ColumnId::Done => "done",
        }
    }
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    #[serde(rename = "type")]
    pub category: Category,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        category: Category,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            priority,
            category,
            created_at: created_at.into(),
        }
    }
}

/// The add-task form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
}

/// An ordered bucket of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: &'static str,
    pub tasks: Vec<Task>,
}

impl Column {
    fn empty(id: ColumnId) -> Self {
        Self {
            id,
            title: id.title(),
            tasks: Vec::new(),
        }
    }
}

/// The planning board: five columns, fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    columns: Vec<Column>,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// A board with all five columns and no tasks.
    pub fn empty() -> Self {
        Self {
            columns: ColumnId::ALL.iter().map(|id| Column::empty(*id)).collect(),
        }
    }

    /// The board a freshly mounted planning page starts with.
    pub fn seed() -> Self {
        let mut board = Self::empty();
        let tasks = [
            (
                ColumnId::Backlog,
                Task::new(
                    "1",
                    "Implement voice recognition",
                    "Add speech-to-text functionality for prompt input",
                    Priority::High,
                    Category::Feature,
                    "2024-03-20",
                ),
            ),
            (
                ColumnId::Backlog,
                Task::new(
                    "2",
                    "Fix microphone permissions",
                    "Handle browser permission requests for microphone access",
                    Priority::Medium,
                    Category::Bug,
                    "2024-03-19",
                ),
            ),
            (
                ColumnId::Todo,
                Task::new(
                    "3",
                    "Add gesture controls",
                    "Implement hand gesture recognition for navigation",
                    Priority::Medium,
                    Category::Feature,
                    "2024-03-18",
                ),
            ),
            (
                ColumnId::InProgress,
                Task::new(
                    "4",
                    "Improve UI feedback",
                    "Add visual feedback for speech recognition status",
                    Priority::High,
                    Category::Feature,
                    "2024-03-17",
                ),
            ),
            (
                ColumnId::Verify,
                Task::new(
                    "5",
                    "Test speech recognition",
                    "Verify accuracy and performance of speech-to-text",
                    Priority::High,
                    Category::Feedback,
                    "2024-03-16",
                ),
            ),
            (
                ColumnId::Done,
                Task::new(
                    "6",
                    "Setup project structure",
                    "Initialize Next.js project with TypeScript",
                    Priority::High,
                    Category::Feature,
                    "2024-03-15",
                ),
            ),
        ];

        for (column, task) in tasks {
            board.push_back(column, task);
        }
        board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> &Column {
        &self.columns[id.index()]
    }

    fn column_mut(&mut self, id: ColumnId) -> &mut Column {
        &mut self.columns[id.index()]
    }

    /// Total number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Locate a task by id.
    pub fn find(&self, task_id: &str) -> Option<(ColumnId, usize, &Task)> {
        self.columns.iter().find_map(|c| {
            c.tasks
                .iter()
                .position(|t| t.id == task_id)
                .map(|i| (c.id, i, &c.tasks[i]))
        })
    }

    /// Remove and return the first task of a column.
    pub fn take_first(&mut self, id: ColumnId) -> Option<Task> {
        let tasks = &mut self.column_mut(id).tasks;
        if tasks.is_empty() {
            None
        } else {
            Some(tasks.remove(0))
        }
    }

    /// Append a task to the end of a column.
    pub fn push_back(&mut self, id: ColumnId, task: Task) {
        self.column_mut(id).tasks.push(task);
    }

    /// Move the first task of `from` to the end of `to`.
    ///
    /// Returns the moved task's id, or `None` when `from` is empty.
    pub fn advance_first(&mut self, from: ColumnId, to: ColumnId) -> Option<String> {
        let task = self.take_first(from)?;
        let id = task.id.clone();
        self.push_back(to, task);
        Some(id)
    }

    /// Move a task by id from `from` to the end of `to`.
    ///
    /// Returns `false` if the task is not in `from`.
    pub fn move_task(&mut self, task_id: &str, from: ColumnId, to: ColumnId) -> bool {
        let source = &mut self.column_mut(from).tasks;
        let Some(index) = source.iter().position(|t| t.id == task_id) else {
            return false;
        };
        let task = source.remove(index);
        self.push_back(to, task);
        true
    }

    /// Drag-and-drop reorder: take the task at `from_index` in `from` and
    /// insert it at `to_index` in `to`.
    ///
    /// An out-of-range source index is a no-op; the destination index is
    /// clamped to the destination length after removal.
    pub fn reorder(
        &mut self,
        from: ColumnId,
        from_index: usize,
        to: ColumnId,
        to_index: usize,
    ) -> bool {
        let source = &mut self.column_mut(from).tasks;
        if from_index >= source.len() {
            return false;
        }
        let task = source.remove(from_index);
        let dest = &mut self.column_mut(to).tasks;
        let index = to_index.min(dest.len());
        dest.insert(index, task);
        true
    }

    /// Add a task built from `draft` to the end of `column`.
    ///
    /// A draft with a blank title is ignored. The id is the creation time in
    /// milliseconds, bumped until it is unique on the board.
    pub fn add_task(
        &mut self,
        column: ColumnId,
        draft: &TaskDraft,
        now: DateTime<Utc>,
    ) -> Option<&Task> {
        let title = draft.title.trim();
        if title.is_empty() {
            return None;
        }

        let mut millis = now.timestamp_millis();
        while self.find(&millis.to_string()).is_some() {
            millis += 1;
        }

        let task = Task::new(
            millis.to_string(),
            title,
            draft.description.clone(),
            draft.priority,
            draft.category,
            now.to_rfc3339(),
        );
        self.push_back(column, task);
        self.column(column).tasks.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ids(board: &Board, column: ColumnId) -> Vec<&str> {
        board.column(column).tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_seed_board_layout() {
        let board = Board::seed();
        assert_eq!(ids(&board, ColumnId::Backlog), vec!["1", "2"]);
        assert_eq!(ids(&board, ColumnId::Todo), vec!["3"]);
        assert_eq!(ids(&board, ColumnId::InProgress), vec!["4"]);
        assert_eq!(ids(&board, ColumnId::Verify), vec!["5"]);
        assert_eq!(ids(&board, ColumnId::Done), vec!["6"]);
        assert_eq!(board.column(ColumnId::Todo).title, "To Do");
    }

    #[test]
    fn test_advance_first_transfers_ownership() {
        let mut board = Board::seed();
        let moved = board.advance_first(ColumnId::Todo, ColumnId::InProgress);

        assert_eq!(moved.as_deref(), Some("3"));
        assert!(board.column(ColumnId::Todo).tasks.is_empty());
        assert_eq!(ids(&board, ColumnId::InProgress), vec!["4", "3"]);
        assert_eq!(board.task_count(), 6);
    }

    #[test]
    fn test_advance_first_empty_is_noop() {
        let mut board = Board::empty();
        let before = board.clone();
        assert_eq!(board.advance_first(ColumnId::Todo, ColumnId::InProgress), None);
        assert_eq!(board, before);
    }

    #[test]
    fn test_move_task_appends() {
        let mut board = Board::seed();
        assert!(board.move_task("1", ColumnId::Backlog, ColumnId::Done));
        assert_eq!(ids(&board, ColumnId::Done), vec!["6", "1"]);
        assert!(!board.move_task("1", ColumnId::Backlog, ColumnId::Done));
    }

    #[test]
    fn test_reorder_within_column() {
        let mut board = Board::seed();
        assert!(board.reorder(ColumnId::Backlog, 0, ColumnId::Backlog, 1));
        assert_eq!(ids(&board, ColumnId::Backlog), vec!["2", "1"]);
    }

    #[test]
    fn test_reorder_across_columns_clamps_index() {
        let mut board = Board::seed();
        assert!(board.reorder(ColumnId::Backlog, 1, ColumnId::Verify, 99));
        assert_eq!(ids(&board, ColumnId::Verify), vec!["5", "2"]);
        assert!(board.reorder(ColumnId::Backlog, 0, ColumnId::Verify, 0));
        assert_eq!(ids(&board, ColumnId::Verify), vec!["1", "5", "2"]);
        assert!(board.column(ColumnId::Backlog).tasks.is_empty());
    }

    #[test]
    fn test_reorder_out_of_range_is_noop() {
        let mut board = Board::seed();
        let before = board.clone();
        assert!(!board.reorder(ColumnId::Todo, 5, ColumnId::Done, 0));
        assert_eq!(board, before);
    }

    #[test]
    fn test_add_task_ignores_blank_title() {
        let mut board = Board::seed();
        let draft = TaskDraft {
            title: "   ".to_string(),
            ..TaskDraft::default()
        };
        assert!(board.add_task(ColumnId::Backlog, &draft, Utc::now()).is_none());
        assert_eq!(board.task_count(), 6);
    }

    #[test]
    fn test_add_task_unique_ids() {
        let mut board = Board::empty();
        let now = Utc.with_ymd_and_hms(2024, 3, 21, 9, 0, 0).unwrap();
        let draft = TaskDraft {
            title: " Write docs ".to_string(),
            description: "Usage guide".to_string(),
            priority: Priority::High,
            category: Category::Bug,
        };

        let first = board.add_task(ColumnId::Todo, &draft, now).unwrap().clone();
        let second = board.add_task(ColumnId::Todo, &draft, now).unwrap().clone();

        assert_eq!(first.title, "Write docs");
        assert_eq!(first.id, now.timestamp_millis().to_string());
        assert_ne!(first.id, second.id);
        assert_eq!(first.priority, Priority::High);
        assert_eq!(first.category, Category::Bug);
    }

    #[test]
    fn test_task_serializes_with_type_field() {
        let task = Board::seed().column(ColumnId::Verify).tasks[0].clone();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["type"], "feedback");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["createdAt"], "2024-03-16");
    }

    #[test]
    fn test_column_id_roundtrip_index() {
        for id in ColumnId::ALL {
            assert_eq!(ColumnId::from_index(id.index()), Some(id));
        }
        assert_eq!(serde_json::to_value(ColumnId::InProgress).unwrap(), "in-progress");
    }
}
