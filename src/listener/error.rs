//! Non-fatal listener failures.

use crate::core::BoxError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Notification point a listener was called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hook {
    StateEntry,
    StateExit,
    TransitionStart,
    TransitionEnd,
    EventNotAccepted,
    MachineStarted,
    MachineStopped,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StateEntry => "on_state_entry",
            Self::StateExit => "on_state_exit",
            Self::TransitionStart => "on_transition_start",
            Self::TransitionEnd => "on_transition_end",
            Self::EventNotAccepted => "on_event_not_accepted",
            Self::MachineStarted => "on_machine_started",
            Self::MachineStopped => "on_machine_stopped",
        };
        f.write_str(name)
    }
}

/// A listener callback failed.
///
/// Listener errors are observational: they are attached as warnings to the
/// [`EventResult`](crate::engine::EventResult) and never change the outcome
/// of the transition.
#[derive(Debug, Error)]
#[error("Listener '{listener}' failed in {hook}: {source}")]
pub struct ListenerError {
    pub listener: String,
    pub hook: Hook,
    #[source]
    pub source: BoxError,
}
