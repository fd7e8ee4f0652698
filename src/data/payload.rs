//! Navigation payloads.
//!
//! Pages hand a task to each other through a route of the form
//! `/<page>?task=<percent-encoded JSON>`. Encoding always succeeds; decoding
//! returns a typed error, and [`task_from_query`] turns any failure into
//! "no task selected" after logging it.

use std::fmt;
use std::string::FromUtf8Error;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::app::View;
use crate::data::board::{Category, Priority, Task};

/// The subset of a [`Task`] carried between pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
}

impl From<&Task> for TaskPayload {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            priority: task.priority,
        }
    }
}

/// Errors produced while decoding a `task` query parameter.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("empty task parameter")]
    Empty,

    #[error("invalid percent-encoding: {0}")]
    Encoding(#[from] FromUtf8Error),

    #[error("invalid task JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialize a payload to its percent-encoded JSON query value.
pub fn encode_task(payload: &TaskPayload) -> String {
    // Serializing plain strings and unit enums cannot fail.
    let json = serde_json::to_string(payload).unwrap_or_default();
    urlencoding::encode(&json).into_owned()
}

/// Decode a percent-encoded JSON query value.
pub fn decode_task(param: &str) -> Result<TaskPayload, PayloadError> {
    if param.trim().is_empty() {
        return Err(PayloadError::Empty);
    }
    let json = urlencoding::decode(param)?;
    Ok(serde_json::from_str(&json)?)
}

/// Decode an optional `task` parameter, degrading to `None` on any failure.
pub fn task_from_query(param: Option<&str>) -> Option<TaskPayload> {
    let param = param?;
    match decode_task(param) {
        Ok(payload) => Some(payload),
        Err(e) => {
            warn!(error = %e, "ignoring malformed task payload");
            None
        }
    }
}

/// A page plus an optional task handed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub view: View,
    pub task: Option<TaskPayload>,
}

impl Route {
    pub fn new(view: View) -> Self {
        Self { view, task: None }
    }

    pub fn with_task(view: View, task: TaskPayload) -> Self {
        Self {
            view,
            task: Some(task),
        }
    }

    /// Parse a route string. Unknown pages fall back to home; a malformed
    /// task parameter leaves the route without a task.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (path, query) = match s.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (s, None),
        };

        let slug = path.trim_matches('/');
        let view = View::from_slug(slug).unwrap_or_else(|| {
            if !slug.is_empty() {
                warn!(page = slug, "unknown page, showing home");
            }
            View::Home
        });

        let param = query.and_then(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "task")
                .map(|(_, value)| value)
        });

        Self {
            view,
            task: task_from_query(param),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.view.slug())?;
        if let Some(ref task) = self.task {
            write!(f, "?task={}", encode_task(task))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskPayload {
        TaskPayload {
            title: "Fix microphone permissions".to_string(),
            description: "Handle browser permission requests & \"quotes\" ?=/".to_string(),
            category: Category::Bug,
            priority: Priority::Medium,
        }
    }

    #[test]
    fn test_payload_roundtrip() {
        let payload = sample();
        let encoded = encode_task(&payload);
        assert!(!encoded.contains('&'));
        assert!(!encoded.contains('?'));
        assert_eq!(decode_task(&encoded).unwrap(), payload);
    }

    #[test]
    fn test_route_roundtrip() {
        let route = Route::with_task(View::Prompting, sample());
        let text = route.to_string();
        assert!(text.starts_with("/prompting?task="));
        assert_eq!(Route::parse(&text), route);
    }

    #[test]
    fn test_corrupt_payload_yields_none() {
        assert!(task_from_query(Some("%7B%22title")).is_none());
        assert!(task_from_query(Some("not-json")).is_none());
        assert!(task_from_query(Some("%FF%FE")).is_none());
        assert!(task_from_query(Some("")).is_none());
        assert!(task_from_query(None).is_none());
    }

    #[test]
    fn test_decode_error_kinds() {
        assert!(matches!(decode_task(""), Err(PayloadError::Empty)));
        assert!(matches!(decode_task("%FF"), Err(PayloadError::Encoding(_))));
        assert!(matches!(decode_task("%5B%5D"), Err(PayloadError::Json(_))));
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let payload = decode_task("%7B%22title%22%3A%22Only%20title%22%7D").unwrap();
        assert_eq!(payload.title, "Only title");
        assert_eq!(payload.priority, Priority::Medium);
        assert_eq!(payload.category, Category::Feature);
    }

    #[test]
    fn test_parse_route_fallbacks() {
        assert_eq!(Route::parse("/nowhere").view, View::Home);
        assert_eq!(Route::parse("/").view, View::Home);
        assert_eq!(Route::parse("").view, View::Home);

        let route = Route::parse("/feedback?task=garbage");
        assert_eq!(route.view, View::Feedback);
        assert!(route.task.is_none());
    }

    #[test]
    fn test_payload_from_task() {
        let task = Task::new("9", "T", "D", Priority::High, Category::Feedback, "2024-01-01");
        let payload = TaskPayload::from(&task);
        assert_eq!(payload.title, "T");
        assert_eq!(payload.priority, Priority::High);
        assert_eq!(payload.category, Category::Feedback);
    }
}
