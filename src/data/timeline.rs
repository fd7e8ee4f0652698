//! Recorded execution history shown by the time-travel debugger.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Success,
    Warning,
    Error,
}

impl EventStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            EventStatus::Success => "✓",
            EventStatus::Warning => "!",
            EventStatus::Error => "✗",
        }
    }
}

/// A reviewer note attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChangeNote {
    pub user: &'static str,
    pub timestamp: &'static str,
    pub note: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub id: u32,
    pub timestamp: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
    pub status: EventStatus,
    /// Checkpoints are eligible for branch creation.
    pub checkpoint: bool,
    pub code: &'static str,
    pub changes: &'static [ChangeNote],
}

/// Index selected when the page mounts.
pub const INITIAL_INDEX: usize = 3;

/// Events at or after this index belong to a created branch.
pub const BRANCH_START: usize = 4;

pub const TIMELINE: [TimelineEvent; 8] = [
    TimelineEvent {
        id: 1,
        timestamp: "09:32:14.456",
        kind: "initialization",
        description: "System initialized",
        status: EventStatus::Success,
        checkpoint: true,
        code: "function initialize() {\n  console.log(\"System startup\");\n  return { status: \"ready\" };\n}",
        changes: &[],
    },
    TimelineEvent {
        id: 2,
        timestamp: "09:32:15.128",
        kind: "data_load",
        description: "Training data loaded",
        status: EventStatus::Success,
        checkpoint: false,
        code: "function loadData() {\n  const data = fetchTrainingData();\n  return data.length > 0;\n}",
        changes: &[],
    },
    TimelineEvent {
        id: 3,
        timestamp: "09:32:17.834",
        kind: "model_init",
        description: "Model parameters initialized",
        status: EventStatus::Success,
        checkpoint: false,
        code: "function initializeModel(config) {\n  const model = new Model(config);\n  model.setLearningRate(0.01);\n  return model;\n}",
        changes: &[],
    },
    TimelineEvent {
        id: 4,
        timestamp: "09:32:21.573",
        kind: "execution",
        description: "First inference pass",
        status: EventStatus::Warning,
        checkpoint: true,
        code: "function inference(model, input) {\n  const result = model.predict(input);\n  if (result.confidence < 0.6) {\n    console.warn(\"Low confidence prediction\");\n  }\n  return result;\n}",
        changes: &[ChangeNote {
            user: "Emma Chen",
            timestamp: "09:45:32",
            note: "Adjusted confidence threshold to 0.5",
        }],
    },
    TimelineEvent {
        id: 5,
        timestamp: "09:32:25.128",
        kind: "adjustment",
        description: "Parameter optimization",
        status: EventStatus::Success,
        checkpoint: false,
        code: "function optimize(model, loss) {\n  const optimizer = new SGDOptimizer();\n  optimizer.step(model, loss);\n  return model.getParameters();\n}",
        changes: &[],
    },
    TimelineEvent {
        id: 6,
        timestamp: "09:32:28.834",
        kind: "execution",
        description: "Second inference pass",
        status: EventStatus::Error,
        checkpoint: true,
        code: "function secondInference(model, input) {\n  const result = model.predict(input);\n  // Error: Division by zero\n  const normalized = result.value / result.normFactor;\n  return normalized;\n}",
        changes: &[
            ChangeNote {
                user: "Lucas Wong",
                timestamp: "09:46:18",
                note: "Added null check for normFactor",
            },
            ChangeNote {
                user: "Olivia Smith",
                timestamp: "09:47:05",
                note: "Changed algorithm to prevent division",
            },
        ],
    },
    TimelineEvent {
        id: 7,
        timestamp: "09:32:31.523",
        kind: "recovery",
        description: "Error recovery process",
        status: EventStatus::Success,
        checkpoint: false,
        code: "function errorRecovery(model) {\n  model.resetState();\n  model.loadCheckpoint(\"last_stable\");\n  return model.isValid();\n}",
        changes: &[],
    },
    TimelineEvent {
        id: 8,
        timestamp: "09:32:35.712",
        kind: "execution",
        description: "Alternative approach",
        status: EventStatus::Success,
        checkpoint: true,
        code: "function alternativeApproach(model, input) {\n  // Using a different algorithm\n  const result = model.predictWithEnsemble(input);\n  return result.confidence > 0.8;\n}",
        changes: &[ChangeNote {
            user: "Emma Chen",
            timestamp: "09:48:44",
            note: "Suggested ensemble approach",
        }],
    },
];

/// Indices of checkpoint events.
pub fn checkpoints() -> impl Iterator<Item = usize> {
    TIMELINE
        .iter()
        .enumerate()
        .filter(|(_, e)| e.checkpoint)
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_ids_are_sequential() {
        for (i, event) in TIMELINE.iter().enumerate() {
            assert_eq!(event.id as usize, i + 1);
        }
    }

    #[test]
    fn test_checkpoints() {
        assert_eq!(checkpoints().collect::<Vec<_>>(), vec![0, 3, 5, 7]);
    }

    #[test]
    fn test_initial_event_is_first_inference() {
        let event = &TIMELINE[INITIAL_INDEX];
        assert_eq!(event.description, "First inference pass");
        assert_eq!(event.status, EventStatus::Warning);
        assert_eq!(event.changes.len(), 1);
    }
}
