//! Test results and performance samples shown on the feedback page.

use serde::Serialize;

use crate::data::board::{Category, Priority, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Running,
}

impl TestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Running => "running",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub id: &'static str,
    pub name: &'static str,
    pub status: TestStatus,
    /// Seconds.
    pub duration: f64,
    pub error: Option<&'static str>,
    pub timestamp: &'static str,
}

impl TestResult {
    /// The verification task this test result becomes when selected.
    pub fn to_task(&self) -> Task {
        Task::new(
            self.id,
            self.name,
            self.error.unwrap_or("No description available"),
            if self.status == TestStatus::Failed {
                Priority::High
            } else {
                Priority::Medium
            },
            Category::Bug,
            self.timestamp,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSample {
    pub cpu: f64,
    pub memory: f64,
    pub response_time: f64,
    pub throughput: f64,
    pub timestamp: &'static str,
}

pub const TEST_RESULTS: [TestResult; 3] = [
    TestResult {
        id: "1",
        name: "Speech Recognition Accuracy",
        status: TestStatus::Passed,
        duration: 2.5,
        error: None,
        timestamp: "2024-03-20T10:30:00Z",
    },
    TestResult {
        id: "2",
        name: "Microphone Permission Handling",
        status: TestStatus::Failed,
        duration: 1.8,
        error: Some("Permission denied in Chrome browser"),
        timestamp: "2024-03-20T10:30:05Z",
    },
    TestResult {
        id: "3",
        name: "UI Feedback Updates",
        status: TestStatus::Running,
        duration: 0.0,
        error: None,
        timestamp: "2024-03-20T10:30:10Z",
    },
];

pub const PERFORMANCE: [PerformanceSample; 3] = [
    PerformanceSample {
        cpu: 45.0,
        memory: 60.0,
        response_time: 120.0,
        throughput: 850.0,
        timestamp: "2024-03-20T10:30:00Z",
    },
    PerformanceSample {
        cpu: 52.0,
        memory: 65.0,
        response_time: 135.0,
        throughput: 820.0,
        timestamp: "2024-03-20T10:30:05Z",
    },
    PerformanceSample {
        cpu: 48.0,
        memory: 62.0,
        response_time: 125.0,
        throughput: 840.0,
        timestamp: "2024-03-20T10:30:10Z",
    },
];

/// Mean of every field across `samples`; `None` when empty.
pub fn average(samples: &[PerformanceSample]) -> Option<PerformanceSample> {
    if samples.is_empty() {
        return None;
    }
    let n = samples.len() as f64;
    let sum = samples.iter().fold((0.0, 0.0, 0.0, 0.0), |acc, s| {
        (
            acc.0 + s.cpu,
            acc.1 + s.memory,
            acc.2 + s.response_time,
            acc.3 + s.throughput,
        )
    });
    Some(PerformanceSample {
        cpu: sum.0 / n,
        memory: sum.1 / n,
        response_time: sum.2 / n,
        throughput: sum.3 / n,
        timestamp: "",
    })
}

/// Count of tests with the given status.
pub fn count_status(results: &[TestResult], status: TestStatus) -> usize {
    results.iter().filter(|t| t.status == status).count()
}

/// Type filter for the verification list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(Category),
}

impl TypeFilter {
    pub fn next(self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Only(Category::Feature),
            TypeFilter::Only(Category::Feature) => TypeFilter::Only(Category::Bug),
            TypeFilter::Only(Category::Bug) => TypeFilter::Only(Category::Feedback),
            TypeFilter::Only(Category::Feedback) => TypeFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Only(c) => c.label(),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(c) => *c == category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_test_becomes_high_priority_bug() {
        let task = TEST_RESULTS[1].to_task();
        assert_eq!(task.title, "Microphone Permission Handling");
        assert_eq!(task.description, "Permission denied in Chrome browser");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, Category::Bug);
        assert_eq!(task.created_at, "2024-03-20T10:30:05Z");
    }

    #[test]
    fn test_passing_test_gets_placeholder_description() {
        let task = TEST_RESULTS[0].to_task();
        assert_eq!(task.description, "No description available");
        assert_eq!(task.priority, Priority::Medium);
    }

    #[test]
    fn test_performance_average() {
        let avg = average(&PERFORMANCE).unwrap();
        assert!((avg.cpu - 48.333).abs() < 0.01);
        assert!((avg.memory - 62.333).abs() < 0.01);
        assert!((avg.response_time - 126.666).abs() < 0.01);
        assert!((avg.throughput - 836.666).abs() < 0.01);
        assert!(average(&[]).is_none());
    }

    #[test]
    fn test_status_counts() {
        assert_eq!(count_status(&TEST_RESULTS, TestStatus::Passed), 1);
        assert_eq!(count_status(&TEST_RESULTS, TestStatus::Failed), 1);
    }

    #[test]
    fn test_filter_cycle() {
        let mut f = TypeFilter::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(f.label());
            f = f.next();
        }
        assert_eq!(seen, vec!["all", "feature", "bug", "feedback"]);
        assert_eq!(f, TypeFilter::All);
        assert!(TypeFilter::Only(Category::Bug).matches(Category::Bug));
        assert!(!TypeFilter::Only(Category::Bug).matches(Category::Feature));
    }
}
