//! Errors returned by event dispatch.

use crate::core::BoxError;
use crate::listener::ListenerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which user hook failed during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailedHook {
    Guard,
    Action,
}

impl fmt::Display for FailedHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guard => f.write_str("guard"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Errors that can occur while starting a machine or dispatching an event.
///
/// None of these leave the current state changed.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "More than one transition from '{state}' on '{event}' is enabled: {}",
        .candidates.join(", ")
    )]
    AmbiguousTransition {
        state: String,
        event: String,
        candidates: Vec<String>,
    },

    #[error("Transition '{transition}' {hook} failed: {source}")]
    ActionExecution {
        transition: String,
        hook: FailedHook,
        #[source]
        source: BoxError,
        /// Listener failures observed before the hook failed.
        warnings: Vec<ListenerError>,
    },

    #[error("State machine is stopped (in state '{state}')")]
    MachineStopped { state: String },
}
