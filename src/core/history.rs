//! State transition history tracking.
//!
//! Every transition a machine fires is recorded as an immutable
//! [`StateTransition`]. Histories can be exported with serde.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
///
/// # Example
///
/// ```rust
/// use statewise::core::StateTransition;
/// use statewise::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum TaskState { Pending, Running }
/// }
///
/// event_enum! {
///     enum TaskEvent { Start }
/// }
///
/// let transition = StateTransition {
///     from: TaskState::Pending,
///     to: TaskState::Running,
///     event: TaskEvent::Start,
///     timestamp: Utc::now(),
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, E: Event> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// The event that triggered the transition
    pub event: E,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of state transitions.
///
/// `record` is pure and returns a new history. Machines append in place
/// with a retention limit.
///
/// # Example
///
/// ```rust
/// use statewise::core::{StateHistory, StateTransition};
/// use statewise::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum WorkState { Start, Middle, End }
/// }
///
/// event_enum! {
///     enum Step { Next }
/// }
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: WorkState::Start,
///         to: WorkState::Middle,
///         event: Step::Next,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: WorkState::Middle,
///         to: WorkState::End,
///         event: Step::Next,
///         timestamp: Utc::now(),
///     });
///
/// let path = history.get_path();
/// assert_eq!(path.len(), 3); // Start -> Middle -> End
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    transitions: Vec<StateTransition<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// This does not mutate the existing history.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a transition in place, dropping the oldest records beyond `limit`.
    pub(crate) fn push(&mut self, transition: StateTransition<S, E>, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            if excess > 0 {
                self.transitions.drain(..excess);
            }
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the first recorded `from`
    /// state, then the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Events in the order they fired.
    pub fn events(&self) -> Vec<&E> {
        self.transitions.iter().map(|t| &t.event).collect()
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition<S, E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
