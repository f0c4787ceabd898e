//! Configuration errors raised while building a transition table.

use thiserror::Error;

/// A single problem found in a machine definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("States not declared. Call .states(set, initial) before .build()")]
    MissingStates,

    #[error("Events not declared. Call .events(set) before .build()")]
    MissingEvents,

    #[error("States declared more than once")]
    StatesRedeclared,

    #[error("Events declared more than once")]
    EventsRedeclared,

    #[error("State set is empty")]
    EmptyStates,

    #[error("Event set is empty")]
    EmptyEvents,

    #[error("Duplicate state '{0}'")]
    DuplicateState(String),

    #[error("Duplicate event '{0}'")]
    DuplicateEvent(String),

    #[error("Initial state '{0}' is not a declared state")]
    UndeclaredInitial(String),

    #[error("Transition {index} has no source state. Call .source(state)")]
    MissingSource { index: usize },

    #[error("Transition {index} has no target state. Call .target(state)")]
    MissingTarget { index: usize },

    #[error("Transition {index} has no event. Call .event(event)")]
    MissingEvent { index: usize },

    #[error("Transition '{transition}' references undeclared source state '{state}'")]
    UndeclaredSource { transition: String, state: String },

    #[error("Transition '{transition}' references undeclared target state '{state}'")]
    UndeclaredTarget { transition: String, state: String },

    #[error("Transition '{transition}' references undeclared event '{event}'")]
    UndeclaredEvent { transition: String, event: String },

    #[error("Internal transition '{transition}' must have the same source and target")]
    InternalEndpointsDiffer { transition: String },

    #[error(
        "Ambiguous transitions from '{state}' on '{event}': \
         {} candidates and at least one has no guard",
        .candidates.len()
    )]
    UnguardedDuplicate {
        state: String,
        event: String,
        candidates: Vec<String>,
    },
}

/// A machine definition failed validation.
///
/// Carries every issue found, not just the first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid state machine configuration: {}", render(.issues))]
pub struct ConfigError {
    issues: Vec<ConfigIssue>,
}

impl ConfigError {
    pub(crate) fn new(issues: Vec<ConfigIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    pub fn contains(&self, issue: &ConfigIssue) -> bool {
        self.issues.contains(issue)
    }
}

fn render(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
